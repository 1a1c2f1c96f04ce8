use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;

use super::service::AuthService;
use crate::hr::domain::{LoginRequest, RegistrationRequest};
use crate::hr::error::ServiceError;
use crate::hr::form::SubmittedForm;
use crate::hr::repository::CredentialRepository;

/// Public registration and login endpoints.
pub fn auth_router<C>(service: Arc<AuthService<C>>) -> Router
where
    C: CredentialRepository + 'static,
{
    Router::new()
        .route("/auth/register", post(register_handler::<C>))
        .route("/auth/login", post(login_handler::<C>))
        .with_state(service)
}

pub(crate) async fn register_handler<C>(
    State(service): State<Arc<AuthService<C>>>,
    form: SubmittedForm,
) -> Result<Response, ServiceError>
where
    C: CredentialRepository + 'static,
{
    let request: RegistrationRequest = form.payload()?;
    let credential = service.register(request)?;
    let payload = json!({
        "message": "Registered successfully",
        "success": true,
        "code": 201,
        "data": credential,
    });
    Ok((StatusCode::CREATED, Json(payload)).into_response())
}

pub(crate) async fn login_handler<C>(
    State(service): State<Arc<AuthService<C>>>,
    form: SubmittedForm,
) -> Result<Response, ServiceError>
where
    C: CredentialRepository + 'static,
{
    let request: LoginRequest = form.payload()?;
    let outcome = service.login(request)?;
    let payload = json!({
        "message": "You're logged in",
        "code": 200,
        "success": true,
        "data": outcome.credential,
        "accessToken": outcome.tokens.access_token,
        "refreshToken": outcome.tokens.refresh_token,
    });
    Ok((StatusCode::OK, Json(payload)).into_response())
}
