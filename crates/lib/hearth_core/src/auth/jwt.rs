//! Session token issuance and verification (HS256 JWT).

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::{debug, info};

use super::AuthError;
use crate::models::auth::SessionClaims;

/// Session token lifetime: 24 hours.
pub const SESSION_TOKEN_EXPIRY_SECS: i64 = 24 * 60 * 60;

/// Issues and verifies signed, time-limited session claims.
///
/// The secret is fixed at construction; a service built with another secret
/// rejects every token issued here.
#[derive(Clone)]
pub struct SessionTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl fmt::Debug for SessionTokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl SessionTokenService {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::seconds(SESSION_TOKEN_EXPIRY_SECS),
        }
    }

    /// Token lifetime in seconds.
    pub fn expires_in(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Issue a token for `subject_id` expiring 24h from now.
    pub fn issue(&self, subject_id: &str, email: &str, role: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        self.issue_at(subject_id, email, role, now, now + self.ttl)
    }

    fn issue_at(
        &self,
        subject_id: &str,
        email: &str,
        role: &str,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = SessionClaims {
            sub: subject_id.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenError(format!("jwt encode: {e}")))
    }

    /// Verify a token, returning its claims.
    ///
    /// Bad signatures, malformed tokens and expired claims all fail with
    /// `Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "session token rejected");
                AuthError::Unauthorized("Invalid or expired token".into())
            })
    }
}

/// Resolve the JWT secret: env var `JWT_SECRET` → `AUTH_SECRET` → persisted file.
pub fn resolve_jwt_secret() -> String {
    if let Ok(secret) = std::env::var("JWT_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    if let Ok(secret) = std::env::var("AUTH_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    let secret_path = jwt_secret_path();
    if let Ok(existing) = std::fs::read_to_string(&secret_path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Some(parent) = secret_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = std::fs::write(&secret_path, &secret);
    info!(path = %secret_path.display(), "generated new JWT secret");
    secret
}

/// Path to the persisted JWT secret file.
fn jwt_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hearth")
        .join("jwt-secret")
}
