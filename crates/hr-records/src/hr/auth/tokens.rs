use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::hr::domain::Credential;

/// Authenticated caller attached to protected requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
    pub email: String,
}

impl Principal {
    pub fn from_credential(credential: &Credential) -> Self {
        Self {
            user_id: credential.id.to_string(),
            email: credential.email.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    user_id: String,
    email: String,
    /// Issued at (Unix timestamp seconds)
    iat: i64,
    /// Expiration (Unix timestamp seconds)
    exp: i64,
}

/// Issues and checks time-bounded bearer tokens.
pub trait TokenSigner: Send + Sync {
    fn sign(&self, principal: &Principal, ttl: Duration) -> Result<String, TokenError>;
    fn verify(&self, token: &str) -> Result<Principal, TokenError>;
}

/// HS256 tokens keyed by a shared server secret.
#[derive(Clone)]
pub struct JwtSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl TokenSigner for JwtSigner {
    fn sign(&self, principal: &Principal, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            user_id: principal.user_id.clone(),
            email: principal.email.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| TokenError::Signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Principal, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|err| TokenError::Invalid(err.to_string()))?;
        Ok(Principal {
            user_id: data.claims.user_id,
            email: data.claims.email,
        })
    }
}

/// Access and refresh tokens handed out at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    Signing(String),
    #[error("token rejected: {0}")]
    Invalid(String),
}
