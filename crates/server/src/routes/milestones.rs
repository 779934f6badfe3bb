use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::milestone::{CreateMilestone, Milestone, UpdateMilestone};
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
pub struct MilestoneQuery {
    pub project_id: Option<Uuid>,
}

pub async fn get_milestones(
    State(state): State<AppState>,
    NormalizedQuery(query): NormalizedQuery<MilestoneQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Milestone>>>, ApiError> {
    let store = &state.db().milestones;
    let milestones = match query.project_id {
        Some(project_id) => Milestone::find_by_project_id(store, project_id),
        None => Milestone::find_all(store),
    };
    Ok(ResponseJson(ApiResponse::success(milestones)))
}

pub async fn get_milestone(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Milestone>>, ApiError> {
    let id = parse_id(&id, "Milestone")?;
    let milestone = Milestone::find_by_id(&state.db().milestones, id)
        .ok_or(ApiError::NotFound("Milestone"))?;
    Ok(ResponseJson(ApiResponse::success(milestone)))
}

pub async fn create_milestone(
    State(state): State<AppState>,
    NormalizedJson(payload): NormalizedJson<CreateMilestone>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Milestone>>), ApiError> {
    let milestone = Milestone::create(&state.db().milestones, &payload)?;
    info!(milestone_id = %milestone.id, project_id = %milestone.project_id, "Milestone created");
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(milestone))))
}

pub async fn update_milestone(
    State(state): State<AppState>,
    Path(id): Path<String>,
    NormalizedJson(payload): NormalizedJson<UpdateMilestone>,
) -> Result<ResponseJson<ApiResponse<Milestone>>, ApiError> {
    let id = parse_id(&id, "Milestone")?;
    let milestone = Milestone::update(&state.db().milestones, id, &payload)?
        .ok_or(ApiError::NotFound("Milestone"))?;
    Ok(ResponseJson(ApiResponse::success(milestone)))
}

pub async fn delete_milestone(
    State(state): State<AppState>,
    Path(id): Path<String>,
    NormalizedQuery(params): NormalizedQuery<DeleteParams>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let id = parse_id(&id, "Milestone")?;
    if !state.db().delete_milestone(id, params.policy)? {
        return Err(ApiError::NotFound("Milestone"));
    }
    info!(milestone_id = %id, policy = %params.policy, "Milestone deleted");
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/milestones", get(get_milestones).post(create_milestone))
        .route(
            "/milestones/{id}",
            get(get_milestone)
                .put(update_milestone)
                .delete(delete_milestone),
        )
}
