use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{delete, get},
};
use db::models::{
    entity_type::EntityType,
    team::{AddTeamMember, CreateTeam, Team, TeamMember},
    team_vocabulary::{CreateVocabularyEntry, TeamLabel, TeamPriority, TeamStatus},
};
use tracing::info;
use uuid::Uuid;
use utils::response::ApiResponse;

use super::parse_id;
use crate::{AppState, error::ApiError, extractors::NormalizedJson};

/// Resolves a team path id to an existing team.
fn team_id(state: &AppState, raw: &str) -> Result<Uuid, ApiError> {
    let id = parse_id(raw, "Team")?;
    Team::find_by_id(&state.db().teams, id)
        .map(|team| team.id)
        .ok_or(ApiError::NotFound("Team"))
}

fn entity_type(raw: &str) -> Result<EntityType, ApiError> {
    raw.parse().map_err(|_| {
        ApiError::BadRequest(format!(
            "Invalid entity type: {raw}. Must be one of: initiative, project, milestone, deliverable"
        ))
    })
}

pub async fn get_teams(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Team>>>, ApiError> {
    Ok(ResponseJson(ApiResponse::success(Team::find_all(
        &state.db().teams,
    ))))
}

pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Team>>, ApiError> {
    let id = parse_id(&id, "Team")?;
    let team = Team::find_by_id(&state.db().teams, id).ok_or(ApiError::NotFound("Team"))?;
    Ok(ResponseJson(ApiResponse::success(team)))
}

pub async fn create_team(
    State(state): State<AppState>,
    NormalizedJson(payload): NormalizedJson<CreateTeam>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Team>>), ApiError> {
    let team = Team::create(&state.db().teams, &payload)?;
    info!(team_id = %team.id, name = %team.name, "Team created");
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(team))))
}

pub async fn get_members(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Vec<TeamMember>>>, ApiError> {
    let team_id = team_id(&state, &id)?;
    Ok(ResponseJson(ApiResponse::success(
        TeamMember::find_by_team_id(&state.db().team_members, team_id),
    )))
}

pub async fn add_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    NormalizedJson(payload): NormalizedJson<AddTeamMember>,
) -> Result<ResponseJson<ApiResponse<TeamMember>>, ApiError> {
    let team_id = team_id(&state, &id)?;
    let member = TeamMember::add(&state.db().team_members, team_id, &payload)?;
    info!(team_id = %team_id, user_id = %member.user_id, role = %member.role, "Team member set");
    Ok(ResponseJson(ApiResponse::success(member)))
}

pub async fn remove_member(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(String, String)>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let team_id = team_id(&state, &id)?;
    let user_id = parse_id(&user_id, "Team member")?;
    if !TeamMember::remove(&state.db().team_members, team_id, user_id) {
        return Err(ApiError::NotFound("Team member"));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

/// GET /api/teams/{id}/statuses/{entity_type}
/// Custom statuses in position order, or the built-in ones.
pub async fn get_statuses(
    State(state): State<AppState>,
    Path((id, kind)): Path<(String, String)>,
) -> Result<ResponseJson<ApiResponse<Vec<String>>>, ApiError> {
    let team_id = team_id(&state, &id)?;
    let kind = entity_type(&kind)?;
    Ok(ResponseJson(ApiResponse::success(
        TeamStatus::effective_statuses(&state.db().team_statuses, team_id, kind),
    )))
}

pub async fn create_status(
    State(state): State<AppState>,
    Path((id, kind)): Path<(String, String)>,
    NormalizedJson(payload): NormalizedJson<CreateVocabularyEntry>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<TeamStatus>>), ApiError> {
    let team_id = team_id(&state, &id)?;
    let kind = entity_type(&kind)?;
    let status = TeamStatus::create(&state.db().team_statuses, team_id, kind, &payload)?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(status))))
}

pub async fn get_labels(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Vec<TeamLabel>>>, ApiError> {
    let team_id = team_id(&state, &id)?;
    Ok(ResponseJson(ApiResponse::success(TeamLabel::find_by_team_id(
        &state.db().team_labels,
        team_id,
    ))))
}

pub async fn create_label(
    State(state): State<AppState>,
    Path(id): Path<String>,
    NormalizedJson(payload): NormalizedJson<CreateVocabularyEntry>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<TeamLabel>>), ApiError> {
    let team_id = team_id(&state, &id)?;
    let label = TeamLabel::create(&state.db().team_labels, team_id, &payload)?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(label))))
}

pub async fn get_priorities(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Vec<String>>>, ApiError> {
    let team_id = team_id(&state, &id)?;
    Ok(ResponseJson(ApiResponse::success(
        TeamPriority::effective_priorities(&state.db().team_priorities, team_id),
    )))
}

pub async fn create_priority(
    State(state): State<AppState>,
    Path(id): Path<String>,
    NormalizedJson(payload): NormalizedJson<CreateVocabularyEntry>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<TeamPriority>>), ApiError> {
    let team_id = team_id(&state, &id)?;
    let priority = TeamPriority::create(&state.db().team_priorities, team_id, &payload)?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(priority))))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/teams", get(get_teams).post(create_team))
        .route("/teams/{id}", get(get_team))
        .route("/teams/{id}/members", get(get_members).post(add_member))
        .route("/teams/{id}/members/{user_id}", delete(remove_member))
        .route(
            "/teams/{id}/statuses/{entity_type}",
            get(get_statuses).post(create_status),
        )
        .route("/teams/{id}/labels", get(get_labels).post(create_label))
        .route(
            "/teams/{id}/priorities",
            get(get_priorities).post(create_priority),
        )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use uuid::Uuid;

    use crate::routes::test_support::{app, send};

    async fn create_team(app: &axum::Router) -> String {
        let (status, body) =
            send(app, "POST", "/api/teams", None, Some(json!({ "name": "Platform" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_members_upsert_role() {
        let (_, app) = app();
        let team = create_team(&app).await;
        let user = Uuid::new_v4();

        for role in ["member", "admin"] {
            let (status, _) = send(
                &app,
                "POST",
                &format!("/api/teams/{team}/members"),
                None,
                Some(json!({ "userId": user, "role": role })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (_, body) = send(&app, "GET", &format!("/api/teams/{team}/members"), None, None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["role"], "admin");

        let (status, _) = send(
            &app,
            "DELETE",
            &format!("/api/teams/{team}/members/{user}"),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_statuses_default_then_custom() {
        let (_, app) = app();
        let team = create_team(&app).await;

        let (_, body) = send(
            &app,
            "GET",
            &format!("/api/teams/{team}/statuses/deliverable"),
            None,
            None,
        )
        .await;
        assert_eq!(
            body["data"],
            json!(["todo", "in-progress", "in-review", "done", "blocked"])
        );

        send(
            &app,
            "POST",
            &format!("/api/teams/{team}/statuses/deliverable"),
            None,
            Some(json!({ "name": "Backlog", "color": "#999" })),
        )
        .await;
        let (_, body) = send(
            &app,
            "GET",
            &format!("/api/teams/{team}/statuses/deliverable"),
            None,
            None,
        )
        .await;
        assert_eq!(body["data"], json!(["Backlog"]));

        let (status, _) = send(
            &app,
            "GET",
            &format!("/api/teams/{team}/statuses/task"),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_team_is_404() {
        let (_, app) = app();
        let (status, _) = send(
            &app,
            "GET",
            &format!("/api/teams/{}/labels", Uuid::new_v4()),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_duplicate_label() {
        let (_, app) = app();
        let team = create_team(&app).await;
        let uri = format!("/api/teams/{team}/labels");
        let (status, _) = send(&app, "POST", &uri, None, Some(json!({ "name": "Bug" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _) = send(&app, "POST", &uri, None, Some(json!({ "name": "bug" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
