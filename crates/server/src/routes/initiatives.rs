use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::initiative::{CreateInitiative, Initiative, UpdateInitiative};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use utils::response::ApiResponse;

use super::{DeleteParams, parse_id};
use crate::{
    AppState,
    error::ApiError,
    extractors::{NormalizedJson, NormalizedQuery},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiativeQuery {
    pub team_id: Option<Uuid>,
}

pub async fn get_initiatives(
    State(state): State<AppState>,
    NormalizedQuery(query): NormalizedQuery<InitiativeQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Initiative>>>, ApiError> {
    let store = &state.db().initiatives;
    let initiatives = match query.team_id {
        Some(team_id) => Initiative::find_by_team_id(store, team_id),
        None => Initiative::find_all(store),
    };
    Ok(ResponseJson(ApiResponse::success(initiatives)))
}

pub async fn get_initiative(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Initiative>>, ApiError> {
    let id = parse_id(&id, "Initiative")?;
    let initiative = Initiative::find_by_id(&state.db().initiatives, id)
        .ok_or(ApiError::NotFound("Initiative"))?;
    Ok(ResponseJson(ApiResponse::success(initiative)))
}

pub async fn create_initiative(
    State(state): State<AppState>,
    NormalizedJson(payload): NormalizedJson<CreateInitiative>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Initiative>>), ApiError> {
    let initiative = Initiative::create(&state.db().initiatives, &payload)?;
    info!(initiative_id = %initiative.id, name = %initiative.name, "Initiative created");
    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(initiative)),
    ))
}

pub async fn update_initiative(
    State(state): State<AppState>,
    Path(id): Path<String>,
    NormalizedJson(payload): NormalizedJson<UpdateInitiative>,
) -> Result<ResponseJson<ApiResponse<Initiative>>, ApiError> {
    let id = parse_id(&id, "Initiative")?;
    let initiative = Initiative::update(&state.db().initiatives, id, &payload)?
        .ok_or(ApiError::NotFound("Initiative"))?;
    Ok(ResponseJson(ApiResponse::success(initiative)))
}

pub async fn delete_initiative(
    State(state): State<AppState>,
    Path(id): Path<String>,
    NormalizedQuery(params): NormalizedQuery<DeleteParams>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let id = parse_id(&id, "Initiative")?;
    if !state.db().delete_initiative(id, params.policy)? {
        return Err(ApiError::NotFound("Initiative"));
    }
    info!(initiative_id = %id, policy = %params.policy, "Initiative deleted");
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/initiatives", get(get_initiatives).post(create_initiative))
        .route(
            "/initiatives/{id}",
            get(get_initiative)
                .put(update_initiative)
                .delete(delete_initiative),
        )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use uuid::Uuid;

    use crate::routes::test_support::{app, send};

    #[tokio::test]
    async fn test_crud_lifecycle() {
        let (_, app) = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/initiatives",
            None,
            Some(json!({ "name": "Q3 Launch", "status": "planning" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["status"], "planning");
        assert_eq!(body["data"]["description"], "");
        assert_eq!(body["data"]["tags"], json!([]));
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/api/initiatives/{id}"),
            None,
            Some(json!({ "status": "active" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "active");
        assert_eq!(body["data"]["name"], "Q3 Launch");

        let (status, _) = send(&app, "DELETE", &format!("/api/initiatives/{id}"), None, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = send(&app, "GET", &format!("/api/initiatives/{id}"), None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Initiative not found");
    }

    #[tokio::test]
    async fn test_validation_errors_are_400() {
        let (state, app) = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/initiatives",
            None,
            Some(json!({ "status": "paused" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("Name is required"));
        assert!(state.db().initiatives.is_empty());
    }

    #[tokio::test]
    async fn test_missing_ids_are_404() {
        let (_, app) = app();
        let (status, _) = send(
            &app,
            "PUT",
            "/api/initiatives/missing-id",
            None,
            Some(json!({ "name": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            "DELETE",
            &format!("/api/initiatives/{}", Uuid::new_v4()),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_team_filter() {
        let (_, app) = app();
        let team = Uuid::new_v4();
        send(
            &app,
            "POST",
            "/api/initiatives",
            None,
            Some(json!({ "name": "A", "teamId": team })),
        )
        .await;
        send(&app, "POST", "/api/initiatives", None, Some(json!({ "name": "B" }))).await;

        let (_, body) = send(&app, "GET", &format!("/api/initiatives?team_id={team}"), None, None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["name"], "A");
    }
}
