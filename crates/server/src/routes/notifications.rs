use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::notification::Notification;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utils::response::ApiResponse;

use super::parse_id;
use crate::{
    AppState,
    error::ApiError,
    extractors::{ActingUser, NormalizedQuery},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Serialize, TS)]
pub struct NotificationCount {
    pub count: usize,
}

pub async fn get_notifications(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
    NormalizedQuery(query): NormalizedQuery<NotificationQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Notification>>>, ApiError> {
    let notifications = state.notifications().list(user_id, query.unread_only);
    Ok(ResponseJson(ApiResponse::success(notifications)))
}

pub async fn get_unread_count(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
) -> Result<ResponseJson<ApiResponse<NotificationCount>>, ApiError> {
    let count = state.notifications().unread_count(user_id);
    Ok(ResponseJson(ApiResponse::success(NotificationCount { count })))
}

pub async fn mark_read(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Notification>>, ApiError> {
    let id = parse_id(&id, "Notification")?;
    let notification = state
        .notifications()
        .mark_read(user_id, id)
        .ok_or(ApiError::NotFound("Notification"))?;
    Ok(ResponseJson(ApiResponse::success(notification)))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
) -> Result<ResponseJson<ApiResponse<NotificationCount>>, ApiError> {
    let count = state.notifications().mark_all_read(user_id);
    Ok(ResponseJson(ApiResponse::success(NotificationCount { count })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(get_notifications))
        .route("/notifications/unread-count", get(get_unread_count))
        .route("/notifications/read-all", post(mark_all_read))
        .route("/notifications/{id}/read", post(mark_read))
}
