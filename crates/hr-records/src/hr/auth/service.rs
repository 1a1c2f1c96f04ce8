use std::sync::Arc;

use chrono::Duration;

use super::middleware::Authenticator;
use super::password::CredentialHasher;
use super::tokens::{Principal, TokenPair, TokenSigner};
use crate::config::AuthConfig;
use crate::hr::domain::{Credential, LoginRequest, RecordId, RegistrationRequest};
use crate::hr::error::ServiceError;
use crate::hr::repository::{CredentialRepository, RepositoryError};
use crate::hr::validation::{validate_login, validate_registration};

/// Account registration, login, and bearer token checks.
pub struct AuthService<C> {
    credentials: Arc<C>,
    hasher: Arc<dyn CredentialHasher>,
    signer: Arc<dyn TokenSigner>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

/// Successful login: the stored account plus its freshly issued tokens.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub credential: Credential,
    pub tokens: TokenPair,
}

impl<C> AuthService<C>
where
    C: CredentialRepository + 'static,
{
    pub fn new(
        credentials: Arc<C>,
        hasher: Arc<dyn CredentialHasher>,
        signer: Arc<dyn TokenSigner>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            credentials,
            hasher,
            signer,
            access_ttl: config.access_token_ttl,
            refresh_ttl: config.refresh_token_ttl,
        }
    }

    /// Create an account. The returned credential carries the password hash.
    pub fn register(&self, request: RegistrationRequest) -> Result<Credential, ServiceError> {
        validate_registration(&request)?;

        let password = request.password.unwrap_or_default();
        if request.confirm_password.as_deref() != Some(password.as_str()) {
            return Err(ServiceError::bad_request("Passwords do not match"));
        }

        let email = request.email.unwrap_or_default();
        if self.credentials.find_by_email(&email)?.is_some() {
            return Err(ServiceError::bad_request("Email already exists"));
        }

        let credential = Credential {
            id: RecordId::generate(),
            full_name: request.full_name.unwrap_or_default(),
            email,
            password: self.hasher.hash(&password)?,
        };

        let stored = self
            .credentials
            .insert(credential)
            .map_err(|err| match err {
                RepositoryError::Conflict(_) => ServiceError::bad_request("Email already exists"),
                other => other.into(),
            })?;
        tracing::info!(user_id = %stored.id, "account registered");
        Ok(stored)
    }

    /// Check the password of an existing account and issue access and refresh tokens.
    pub fn login(&self, request: LoginRequest) -> Result<LoginOutcome, ServiceError> {
        validate_login(&request)?;

        let email = request.email.unwrap_or_default();
        let password = request.password.unwrap_or_default();

        let Some(credential) = self.credentials.find_by_email(&email)? else {
            return Err(ServiceError::bad_request("User does not exist"));
        };

        if !self.hasher.verify(&password, &credential.password)? {
            tracing::warn!(user_id = %credential.id, "login rejected");
            return Err(ServiceError::bad_request("Email or password are incorrect"));
        }

        let principal = Principal::from_credential(&credential);
        let tokens = TokenPair {
            access_token: self.signer.sign(&principal, self.access_ttl)?,
            refresh_token: self.signer.sign(&principal, self.refresh_ttl)?,
        };

        tracing::info!(user_id = %credential.id, "login succeeded");
        Ok(LoginOutcome { credential, tokens })
    }

    pub fn authenticate(&self, token: &str) -> Result<Principal, ServiceError> {
        self.signer.verify(token).map_err(|err| {
            tracing::debug!(error = %err, "bearer token rejected");
            ServiceError::Unauthorized("Not authorized, token failed".to_string())
        })
    }
}

impl<C> Authenticator for AuthService<C>
where
    C: CredentialRepository + 'static,
{
    fn authenticate(&self, token: &str) -> Result<Principal, ServiceError> {
        AuthService::authenticate(self, token)
    }
}
