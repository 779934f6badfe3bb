use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::delete,
};
use serde::Serialize;
use tracing::info;
use ts_rs::TS;
use utils::response::ApiResponse;

use super::parse_id;
use crate::{AppState, error::ApiError};

#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct DeletedComments {
    pub removed: usize,
}

/// DELETE /api/comments/{id}
/// Removes the comment together with its replies.
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<DeletedComments>>, ApiError> {
    let id = parse_id(&id, "Comment")?;
    let removed = state.comments().delete(id)?;
    info!(comment_id = %id, removed, "Comment deleted");
    Ok(ResponseJson(ApiResponse::success(DeletedComments { removed })))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/comments/{id}", delete(delete_comment))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use db::models::{
        comment::{Comment, CreateComment},
        deliverable::{CreateDeliverable, Deliverable},
    };
    use uuid::Uuid;

    use crate::routes::test_support::{app, send};

    #[tokio::test]
    async fn test_delete_thread() {
        let (state, app) = app();
        let db = state.db();
        let deliverable = Deliverable::create(
            &db.deliverables,
            &CreateDeliverable::new(Uuid::new_v4(), "Endpoints"),
        )
        .unwrap();
        let root = Comment::create(
            &db.comments,
            deliverable.id,
            Uuid::new_v4(),
            &CreateComment {
                content: "root".into(),
                parent_id: None,
            },
        )
        .unwrap();
        Comment::create(
            &db.comments,
            deliverable.id,
            Uuid::new_v4(),
            &CreateComment {
                content: "reply".into(),
                parent_id: Some(root.id),
            },
        )
        .unwrap();

        let (status, body) =
            send(&app, "DELETE", &format!("/api/comments/{}", root.id), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["removed"], 2);

        let (status, _) =
            send(&app, "DELETE", &format!("/api/comments/{}", root.id), None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
