use axum::{extract::FromRequestParts, http::StatusCode};
use http::request::Parts;

const X_USER_ID: &str = "x-user-id";

/// Caller identity as asserted by the upstream auth proxy.
/// Authentication itself is external; the proxy strips any client supplied
/// `x-user-id` before setting its own.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub user_id: String,
}

impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(X_USER_ID)
            .and_then(|value| value.to_str().ok())
            .filter(|user_id| !user_id.is_empty())
            .map(|user_id| AuthedUser {
                user_id: user_id.to_string(),
            })
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
