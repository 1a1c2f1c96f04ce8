//! Account registration, login, and bearer token verification.

pub mod middleware;
pub mod password;
pub mod router;
pub mod service;
pub mod tokens;

pub use middleware::{require_bearer, Authenticator};
pub use password::{Argon2Hasher, CredentialHasher, HashError};
pub use router::auth_router;
pub use service::{AuthService, LoginOutcome};
pub use tokens::{JwtSigner, Principal, TokenError, TokenPair, TokenSigner};
