use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use super::tokens::Principal;
use crate::hr::error::ServiceError;

/// Resolves a bearer token to the caller it was issued to.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, token: &str) -> Result<Principal, ServiceError>;
}

/// Rejects requests without a valid bearer token and attaches the [`Principal`] otherwise.
pub async fn require_bearer(
    State(authenticator): State<Arc<dyn Authenticator>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .filter(|value| value.starts_with("Bearer"))
        .ok_or_else(|| unauthorized("Not authorized, no authorization header"))?;

    let token = header
        .split(' ')
        .nth(1)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| unauthorized("Not authorized, no token provided"))?;

    let principal = authenticator.authenticate(token)?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

fn unauthorized(message: &str) -> ServiceError {
    ServiceError::Unauthorized(message.to_string())
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or_else(|| unauthorized("Not authorized, no authorization header"))
    }
}
