//! Request extractors that accept either key convention.
//!
//! Bodies and query strings are camel-cased before they reach the payload
//! types, so `{"milestone_id": ...}` and `{"milestoneId": ...}` deserialize
//! the same way. The contents of [`OPAQUE_FIELDS`] are user data and keep
//! their keys as sent.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use utils::casing::{KeyCase, camel_key};
use uuid::Uuid;

use crate::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Fields whose nested keys belong to the user and are never re-cased.
pub const OPAQUE_FIELDS: &[&str] = &["customFields"];

/// JSON body with keys normalised to camelCase.
pub struct NormalizedJson<T>(pub T);

impl<S, T> FromRequest<S> for NormalizedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        serde_json::from_value(KeyCase::Camel.apply_preserving(&value, OPAQUE_FIELDS))
            .map(NormalizedJson)
            .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {e}")))
    }
}

/// Query string with keys normalised to camelCase.
pub struct NormalizedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for NormalizedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts.uri.query().unwrap_or_default();
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw)
            .map_err(|e| ApiError::BadRequest(format!("Invalid query string: {e}")))?;
        let camelized: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(key, value)| (camel_key(&key), value))
            .collect();
        let encoded = serde_urlencoded::to_string(&camelized)
            .map_err(|e| ApiError::BadRequest(format!("Invalid query string: {e}")))?;
        serde_urlencoded::from_str(&encoded)
            .map(NormalizedQuery)
            .map_err(|e| ApiError::BadRequest(format!("Invalid query string: {e}")))
    }
}

/// The user a request acts as, from the `X-User-Id` header.
#[derive(Debug, Clone, Copy)]
pub struct ActingUser(pub Uuid);

impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or(ApiError::MissingUser)?;
        header
            .to_str()
            .ok()
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .map(ActingUser)
            .ok_or_else(|| ApiError::BadRequest("Invalid X-User-Id header".to_string()))
    }
}
