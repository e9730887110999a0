use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config;
use crate::models::{AccountRole, SystemAccount};

/// The authenticated caller, as extracted from a verified token by the
/// hosting layer. Services only ever see this, never the token itself.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub account_id: i32,
    pub role: AccountRole,
}

impl Identity {
    /// Ownership rule: admins manage everything, everyone else only what
    /// they created.
    pub fn can_manage(&self, owner_id: i32) -> bool {
        self.role == AccountRole::Admin || self.account_id == owner_id
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub id: i32,
    pub email: String,
    pub role: String,
    pub jti: String,
    pub iss: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(account: &SystemAccount, role: AccountRole) -> Self {
        let now = Utc::now();
        let security = &config::config().security;
        let exp = (now + Duration::hours(security.jwt_expiry_hours as i64)).timestamp();

        Self {
            sub: account.id.to_string(),
            id: account.id,
            email: account.email.clone(),
            role: role.as_str().to_string(),
            jti: Uuid::new_v4().to_string(),
            iss: security.jwt_issuer.clone(),
            aud: security.jwt_audience.clone(),
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidSecret,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT secret"),
        }
    }
}

impl std::error::Error for JwtError {}

pub fn generate_jwt(claims: Claims) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, &claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// The authentication-issuer seam: "produce a signed token for an account
/// and role". Swappable so the domain core never depends on the signing
/// mechanics.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, account: &SystemAccount, role: AccountRole) -> Result<String, JwtError>;
}

#[derive(Debug, Default)]
pub struct JwtIssuer;

impl TokenIssuer for JwtIssuer {
    fn issue(&self, account: &SystemAccount, role: AccountRole) -> Result<String, JwtError> {
        generate_jwt(Claims::new(account, role))
    }
}

/// Deterministic SHA-256 digest, hex-encoded. Stored passwords and login
/// attempts go through the same function and compare as strings.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn hashing_is_deterministic_and_fixed_length() {
        let a = hash_password("secret123");
        let b = hash_password("secret123");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, hash_password("secret124"));
    }

    #[test]
    fn issued_token_has_three_segments() {
        let account = testing::account(7, "ann", "ann@example.com");
        let token = JwtIssuer.issue(&account, AccountRole::Staff).unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn admin_manages_everything_staff_only_their_own() {
        let admin = Identity {
            account_id: 1,
            role: AccountRole::Admin,
        };
        let staff = Identity {
            account_id: 2,
            role: AccountRole::Staff,
        };
        assert!(admin.can_manage(99));
        assert!(staff.can_manage(2));
        assert!(!staff.can_manage(3));
    }
}
