//! Shared types for the API layer: context, authenticated user, and
//! credential primitives.

use std::sync::Arc;

use crate::state::AppState;

use super::error::ApiError;

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub state: Arc<AppState>,
}

impl ApiContext {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

/// Authenticated user context, injected into request extensions by the
/// auth middleware after successful token validation.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl UserContext {
    /// Role gate. Admins pass every gate.
    pub fn require_role(&self, required: &str) -> Result<(), ApiError> {
        if self.role == required || self.role == "admin" {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

/// Hash a bearer token with SHA-256, base64 encoded for storage.
pub fn hash_token(token: &str) -> String {
    use base64::Engine;
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// Generate a random bearer token (URL-safe base64, 32 bytes of entropy).
pub fn generate_token() -> String {
    use base64::Engine;
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

pub fn generate_salt() -> String {
    use base64::Engine;
    let bytes: [u8; 16] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

const PBKDF2_ROUNDS: u32 = 100_000;

/// Derive a password hash with PBKDF2-HMAC-SHA256.
pub fn hash_password(password: &str, salt: &str) -> String {
    use base64::Engine;
    let mut derived = [0u8; 32];
    pbkdf2::pbkdf2_hmac::<sha2::Sha256>(
        password.as_bytes(),
        salt.as_bytes(),
        PBKDF2_ROUNDS,
        &mut derived,
    );
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(derived)
}

pub fn verify_password(password: &str, salt: &str, stored_hash: &str) -> bool {
    hash_password(password, salt) == stored_hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_gate_admits_exact_role_and_admin() {
        let clinician = UserContext {
            id: "u1".into(),
            email: "c@example.com".into(),
            role: "clinician".into(),
        };
        assert!(clinician.require_role("clinician").is_ok());
        assert!(clinician.require_role("patient").is_err());

        let admin = UserContext {
            id: "u2".into(),
            email: "a@example.com".into(),
            role: "admin".into(),
        };
        assert!(admin.require_role("clinician").is_ok());
        assert!(admin.require_role("patient").is_ok());
    }

    #[test]
    fn tokens_are_unique_and_hash_deterministically() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert_eq!(hash_token(&a), hash_token(&a));
        assert_ne!(hash_token(&a), hash_token(&b));
    }

    #[test]
    fn password_verification_round_trips() {
        let salt = generate_salt();
        let hash = hash_password("correct horse", &salt);
        assert!(verify_password("correct horse", &salt, &hash));
        assert!(!verify_password("wrong horse", &salt, &hash));
    }
}
