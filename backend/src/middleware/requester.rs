use axum::{
    extract::{FromRequestParts, Query},
    http::{request::Parts, StatusCode},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

/// The `username` query parameter of a teacher-only request. Presence is
/// checked here; whether the username is a known teacher is decided by the
/// service's authorizer.
#[derive(Debug, Clone)]
pub struct Requester(pub String);

#[derive(Deserialize)]
struct RequesterQuery {
    username: Option<String>,
}

impl<S> FromRequestParts<S> for Requester
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<RequesterQuery>::try_from_uri(&parts.uri).map_err(|_| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid query string" })),
            )
        })?;

        query
            .username
            .filter(|u| !u.trim().is_empty())
            .map(Requester)
            .ok_or((StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" }))))
    }
}
