use axum::{
    Router,
    extract::State,
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::favorite::{Favorite, ToggleFavorite};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;
use utils::response::ApiResponse;

use crate::{
    AppState,
    error::ApiError,
    extractors::{ActingUser, NormalizedJson, NormalizedQuery},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteQuery {
    pub team_id: Option<Uuid>,
}

#[derive(Debug, Serialize, TS)]
pub struct FavoriteState {
    pub favorited: bool,
}

pub async fn get_favorites(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
    NormalizedQuery(query): NormalizedQuery<FavoriteQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Favorite>>>, ApiError> {
    let favorites = Favorite::find_by_user_id(&state.db().favorites, user_id, query.team_id);
    Ok(ResponseJson(ApiResponse::success(favorites)))
}

pub async fn toggle_favorite(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
    NormalizedJson(payload): NormalizedJson<ToggleFavorite>,
) -> Result<ResponseJson<ApiResponse<FavoriteState>>, ApiError> {
    let favorited = Favorite::toggle(&state.db().favorites, user_id, &payload);
    Ok(ResponseJson(ApiResponse::success(FavoriteState { favorited })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/favorites", get(get_favorites))
        .route("/favorites/toggle", post(toggle_favorite))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use uuid::Uuid;

    use crate::routes::test_support::{app, send};

    #[tokio::test]
    async fn test_toggle_round_trip() {
        let (_, app) = app();
        let user = Uuid::new_v4();
        let payload = json!({ "entity_type": "project", "entity_id": Uuid::new_v4() });

        let (status, body) =
            send(&app, "POST", "/api/favorites/toggle", Some(user), Some(payload.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["favorited"], true);

        let (_, body) = send(&app, "GET", "/api/favorites", Some(user), None).await;
        assert_eq!(body["data"][0]["entityType"], "project");

        let (_, body) =
            send(&app, "POST", "/api/favorites/toggle", Some(user), Some(payload)).await;
        assert_eq!(body["data"]["favorited"], false);
    }

    #[tokio::test]
    async fn test_invalid_entity_type() {
        let (_, app) = app();
        let (status, _) = send(
            &app,
            "POST",
            "/api/favorites/toggle",
            Some(Uuid::new_v4()),
            Some(json!({ "entityType": "task", "entityId": Uuid::new_v4() })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
