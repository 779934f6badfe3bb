use axum::{
    body::{Body, to_bytes},
    extract::{Request, State},
    http::header::{CONTENT_LENGTH, CONTENT_TYPE},
    middleware::Next,
    response::Response,
};
use tracing::warn;
use utils::casing::KeyCase;

use crate::{AppState, extractors::OPAQUE_FIELDS};

/// Re-cases JSON response bodies when the server is configured for
/// snake_case. Stored records stay camelCase either way, and user-defined
/// keys under [`OPAQUE_FIELDS`] are left as stored.
pub async fn recase_response(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    let key_case = state.config().key_case;
    if key_case == KeyCase::Camel || !is_json(&response) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "Failed to buffer response body for re-casing");
            return Response::from_parts(parts, Body::empty());
        }
    };

    let Ok(value) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
        return Response::from_parts(parts, Body::from(bytes));
    };
    match serde_json::to_vec(&key_case.apply_preserving(&value, OPAQUE_FIELDS)) {
        Ok(recased) => {
            parts.headers.remove(CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(recased))
        }
        Err(e) => {
            warn!(error = %e, "Failed to re-encode response body");
            Response::from_parts(parts, Body::from(bytes))
        }
    }
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}
