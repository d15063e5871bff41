//! Authentication core: password hashing, credential verification and
//! access token issuance.

mod credential_verifier;
mod password_hasher;
mod token_service;
mod user_store;

pub use credential_verifier::CredentialVerifier;
pub use password_hasher::PasswordHasher;
pub use token_service::{AccessClaims, TokenConfig, TokenError, TokenService};
pub use user_store::UserStore;
