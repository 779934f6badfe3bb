use axum::{Router, middleware::from_fn_with_state};
use db::cascade::DeletePolicy;
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::casing::recase_response};

pub mod comments;
pub mod deliverables;
pub mod favorites;
pub mod health;
pub mod initiatives;
pub mod milestones;
pub mod notifications;
pub mod projects;
pub mod teams;
pub mod users;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(health::router())
        .merge(initiatives::router())
        .merge(projects::router())
        .merge(milestones::router())
        .merge(deliverables::router())
        .merge(comments::router())
        .merge(users::router())
        .merge(teams::router())
        .merge(notifications::router())
        .merge(favorites::router());

    Router::new()
        .nest("/api", api)
        .layer(from_fn_with_state(state.clone(), recase_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Path ids that do not parse cannot name a record, so they are reported as
/// not found rather than as a malformed request.
pub(crate) fn parse_id(raw: &str, entity: &'static str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(entity))
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DeleteParams {
    #[serde(default)]
    pub policy: DeletePolicy,
}
