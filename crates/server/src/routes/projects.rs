use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::project::{CreateProject, Project, UpdateProject};
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
pub struct ProjectQuery {
    pub initiative_id: Option<Uuid>,
    pub lead_id: Option<Uuid>,
}

pub async fn get_projects(
    State(state): State<AppState>,
    NormalizedQuery(query): NormalizedQuery<ProjectQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Project>>>, ApiError> {
    let store = &state.db().projects;
    let projects = match (query.initiative_id, query.lead_id) {
        (Some(initiative_id), lead_id) => Project::find_by_initiative_id(store, initiative_id)
            .into_iter()
            .filter(|p| lead_id.is_none_or(|lead| p.lead_id == Some(lead)))
            .collect(),
        (None, Some(lead_id)) => Project::find_by_lead_id(store, lead_id),
        (None, None) => Project::find_all(store),
    };
    Ok(ResponseJson(ApiResponse::success(projects)))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let id = parse_id(&id, "Project")?;
    let project =
        Project::find_by_id(&state.db().projects, id).ok_or(ApiError::NotFound("Project"))?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub async fn create_project(
    State(state): State<AppState>,
    NormalizedJson(payload): NormalizedJson<CreateProject>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Project>>), ApiError> {
    let project = Project::create(&state.db().projects, &payload)?;
    info!(
        project_id = %project.id,
        initiative_id = %project.initiative_id,
        "Project created"
    );
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(project))))
}

pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    NormalizedJson(payload): NormalizedJson<UpdateProject>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let id = parse_id(&id, "Project")?;
    let project = Project::update(&state.db().projects, id, &payload)?
        .ok_or(ApiError::NotFound("Project"))?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    NormalizedQuery(params): NormalizedQuery<DeleteParams>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let id = parse_id(&id, "Project")?;
    if !state.db().delete_project(id, params.policy)? {
        return Err(ApiError::NotFound("Project"));
    }
    info!(project_id = %id, policy = %params.policy, "Project deleted");
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(get_projects).post(create_project))
        .route(
            "/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
}
