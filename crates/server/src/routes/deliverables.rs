use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::{
    comment::{Comment, CreateComment},
    deliverable::{CreateDeliverable, Deliverable, UpdateDeliverable},
};
use serde::Deserialize;
use services::services::assignment::AssignDeliverable;
use tracing::info;
use uuid::Uuid;
use utils::response::ApiResponse;

use super::{DeleteParams, parse_id};
use crate::{
    AppState,
    error::ApiError,
    extractors::{ActingUser, NormalizedJson, NormalizedQuery},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverableQuery {
    pub milestone_id: Option<Uuid>,
    pub assignee_id: Option<Uuid>,
}

pub async fn get_deliverables(
    State(state): State<AppState>,
    NormalizedQuery(query): NormalizedQuery<DeliverableQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Deliverable>>>, ApiError> {
    let store = &state.db().deliverables;
    let deliverables = match (query.milestone_id, query.assignee_id) {
        (Some(milestone_id), assignee_id) => Deliverable::find_by_milestone_id(store, milestone_id)
            .into_iter()
            .filter(|d| assignee_id.is_none_or(|assignee| d.assignee_id == Some(assignee)))
            .collect(),
        (None, Some(assignee_id)) => Deliverable::find_by_assignee_id(store, assignee_id),
        (None, None) => Deliverable::find_all(store),
    };
    Ok(ResponseJson(ApiResponse::success(deliverables)))
}

pub async fn get_deliverable(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Deliverable>>, ApiError> {
    let id = parse_id(&id, "Deliverable")?;
    let deliverable = Deliverable::find_by_id(&state.db().deliverables, id)
        .ok_or(ApiError::NotFound("Deliverable"))?;
    Ok(ResponseJson(ApiResponse::success(deliverable)))
}

pub async fn create_deliverable(
    State(state): State<AppState>,
    NormalizedJson(payload): NormalizedJson<CreateDeliverable>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Deliverable>>), ApiError> {
    let deliverable = Deliverable::create(&state.db().deliverables, &payload)?;
    info!(
        deliverable_id = %deliverable.id,
        milestone_id = %deliverable.milestone_id,
        "Deliverable created"
    );
    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(deliverable)),
    ))
}

pub async fn update_deliverable(
    State(state): State<AppState>,
    Path(id): Path<String>,
    NormalizedJson(payload): NormalizedJson<UpdateDeliverable>,
) -> Result<ResponseJson<ApiResponse<Deliverable>>, ApiError> {
    let id = parse_id(&id, "Deliverable")?;
    let deliverable = Deliverable::update(&state.db().deliverables, id, &payload)?
        .ok_or(ApiError::NotFound("Deliverable"))?;
    Ok(ResponseJson(ApiResponse::success(deliverable)))
}

pub async fn delete_deliverable(
    State(state): State<AppState>,
    Path(id): Path<String>,
    NormalizedQuery(params): NormalizedQuery<DeleteParams>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let id = parse_id(&id, "Deliverable")?;
    if !state.db().delete_deliverable(id, params.policy)? {
        return Err(ApiError::NotFound("Deliverable"));
    }
    info!(deliverable_id = %id, policy = %params.policy, "Deliverable deleted");
    Ok(ResponseJson(ApiResponse::success(())))
}

/// POST /api/deliverables/{id}/assign
pub async fn assign_deliverable(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ActingUser(actor_id): ActingUser,
    NormalizedJson(payload): NormalizedJson<AssignDeliverable>,
) -> Result<ResponseJson<ApiResponse<Deliverable>>, ApiError> {
    let id = parse_id(&id, "Deliverable")?;
    let deliverable = state
        .assignments()
        .assign(id, payload.assignee_id, actor_id)?;
    Ok(ResponseJson(ApiResponse::success(deliverable)))
}

/// GET /api/deliverables/{id}/comments
pub async fn get_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Vec<Comment>>>, ApiError> {
    let id = parse_id(&id, "Deliverable")?;
    let comments = state.comments().list(id)?;
    Ok(ResponseJson(ApiResponse::success(comments)))
}

/// POST /api/deliverables/{id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ActingUser(author_id): ActingUser,
    NormalizedJson(payload): NormalizedJson<CreateComment>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Comment>>), ApiError> {
    let id = parse_id(&id, "Deliverable")?;
    let comment = state.comments().post(id, author_id, &payload)?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(comment))))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/deliverables", get(get_deliverables).post(create_deliverable))
        .route(
            "/deliverables/{id}",
            get(get_deliverable)
                .put(update_deliverable)
                .delete(delete_deliverable),
        )
        .route("/deliverables/{id}/assign", post(assign_deliverable))
        .route(
            "/deliverables/{id}/comments",
            get(get_comments).post(create_comment),
        )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use db::models::user::{CreateUser, User};
    use serde_json::json;
    use utils::casing::KeyCase;
    use uuid::Uuid;

    use crate::routes::test_support::{app, app_with, send};

    #[tokio::test]
    async fn test_missing_milestone_id() {
        let (state, app) = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/deliverables",
            None,
            Some(json!({ "name": "Endpoints" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .contains("Milestone ID is required")
        );
        assert!(state.db().deliverables.is_empty());
    }

    #[tokio::test]
    async fn test_defaults_and_snake_case_body() {
        let (_, app) = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/deliverables",
            None,
            Some(json!({
                "milestone_id": Uuid::new_v4(),
                "name": "Endpoints",
                "jira_issue_key": "ROAD-1",
                "custom_fields": { "estimate": 3 }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["status"], "todo");
        assert_eq!(body["data"]["priority"], "medium");
        assert_eq!(body["data"]["jiraIssueKey"], "ROAD-1");
        assert_eq!(body["data"]["customFields"]["estimate"], 3);
    }

    #[tokio::test]
    async fn test_custom_field_keys_are_kept_verbatim() {
        let fields = json!({ "sprint_goal": "ship", "release_v2": true, "ownerTeam": "core" });
        for key_case in [KeyCase::Camel, KeyCase::Snake] {
            let (_, app) = app_with(key_case);
            let (status, body) = send(
                &app,
                "POST",
                "/api/deliverables",
                None,
                Some(json!({
                    "milestoneId": Uuid::new_v4(),
                    "name": "Endpoints",
                    "customFields": fields
                })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);

            let fields_key = match key_case {
                KeyCase::Camel => "customFields",
                KeyCase::Snake => "custom_fields",
            };
            assert_eq!(body["data"][fields_key], fields);

            let id = body["data"]["id"].as_str().unwrap().to_string();
            let (status, body) =
                send(&app, "GET", &format!("/api/deliverables/{id}"), None, None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["data"][fields_key], fields);
        }
    }

    #[tokio::test]
    async fn test_assign_and_comment_flow() {
        let (state, app) = app();
        let db = state.db();
        let dana = User::create(&db.users, &CreateUser::new("Dana", "dana@example.com")).unwrap();
        let lee = User::create(&db.users, &CreateUser::new("Lee", "lee@example.com")).unwrap();

        let (_, body) = send(
            &app,
            "POST",
            "/api/deliverables",
            None,
            Some(json!({ "milestoneId": Uuid::new_v4(), "name": "Endpoints" })),
        )
        .await;
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            "POST",
            &format!("/api/deliverables/{id}/assign"),
            None,
            Some(json!({ "assigneeId": lee.id })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/deliverables/{id}/assign"),
            Some(dana.id),
            Some(json!({ "assignee_id": lee.id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["assigneeId"], lee.id.to_string());

        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/deliverables/{id}/comments"),
            Some(dana.id),
            Some(json!({ "content": "  @lee can you review?  " })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["content"], "@lee can you review?");

        let (_, body) = send(
            &app,
            "GET",
            &format!("/api/deliverables/{id}/comments"),
            None,
            None,
        )
        .await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (_, body) = send(&app, "GET", "/api/notifications", Some(lee.id), None).await;
        let kinds: Vec<_> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["type"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(kinds.len(), 2);
        assert!(kinds.contains(&"task_assigned".to_string()));
        assert!(kinds.contains(&"mention".to_string()));
    }

    #[tokio::test]
    async fn test_comment_on_missing_deliverable() {
        let (_, app) = app();
        let (status, _) = send(
            &app,
            "POST",
            &format!("/api/deliverables/{}/comments", Uuid::new_v4()),
            Some(Uuid::new_v4()),
            Some(json!({ "content": "hi" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
