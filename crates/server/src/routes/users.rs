use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::user::{CreateUser, UpdateUser, User};
use tracing::info;
use utils::response::ApiResponse;

use super::parse_id;
use crate::{AppState, error::ApiError, extractors::NormalizedJson};

pub async fn get_users(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<User>>>, ApiError> {
    Ok(ResponseJson(ApiResponse::success(User::find_all(
        &state.db().users,
    ))))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<User>>, ApiError> {
    let id = parse_id(&id, "User")?;
    let user = User::find_by_id(&state.db().users, id).ok_or(ApiError::NotFound("User"))?;
    Ok(ResponseJson(ApiResponse::success(user)))
}

pub async fn create_user(
    State(state): State<AppState>,
    NormalizedJson(payload): NormalizedJson<CreateUser>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<User>>), ApiError> {
    let user = User::create(&state.db().users, &payload)?;
    info!(user_id = %user.id, "User created");
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(user))))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    NormalizedJson(payload): NormalizedJson<UpdateUser>,
) -> Result<ResponseJson<ApiResponse<User>>, ApiError> {
    let id = parse_id(&id, "User")?;
    let user = User::update(&state.db().users, id, &payload)?.ok_or(ApiError::NotFound("User"))?;
    Ok(ResponseJson(ApiResponse::success(user)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(get_users).post(create_user))
        .route("/users/{id}", get(get_user).put(update_user))
}
