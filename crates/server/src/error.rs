use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::{cascade::DeleteError, validation::ValidationError};
use services::services::{assignment::AssignmentError, comments::CommentError};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Delete(#[from] DeleteError),
    #[error(transparent)]
    Comment(#[from] CommentError),
    #[error(transparent)]
    Assignment(#[from] AssignmentError),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Missing X-User-Id header")]
    MissingUser,
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MissingUser | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Delete(DeleteError::HasChildren { .. }) => StatusCode::CONFLICT,
            ApiError::Comment(err) => match err {
                CommentError::DeliverableNotFound | CommentError::CommentNotFound => {
                    StatusCode::NOT_FOUND
                }
                CommentError::UnknownUser(_) | CommentError::Validation(_) => {
                    StatusCode::BAD_REQUEST
                }
            },
            ApiError::Assignment(err) => match err {
                AssignmentError::DeliverableNotFound => StatusCode::NOT_FOUND,
                AssignmentError::UnknownUser(_) | AssignmentError::Validation(_) => {
                    StatusCode::BAD_REQUEST
                }
            },
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ApiResponse::<()>::error(&message))).into_response()
    }
}
