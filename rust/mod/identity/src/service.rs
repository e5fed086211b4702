//! Credential checks and JWT issuance.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tradedesk_core::{new_id, ServiceError};

use crate::password::verify_password;

/// A user allowed to sign in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserEntry {
    pub email: String,
    #[serde(default)]
    pub name: String,
    /// argon2id PHC string.
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub users: Vec<UserEntry>,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub expire_secs: u64,
}

/// JWT claims payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject: the user's email.
    pub sub: String,
    /// Display name.
    pub name: String,
    /// Session id.
    pub sid: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

/// Login response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// The signed-in user, as returned by `/auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentUser {
    pub email: String,
    pub name: String,
}

impl From<&Claims> for CurrentUser {
    fn from(claims: &Claims) -> Self {
        Self {
            email: claims.sub.clone(),
            name: claims.name.clone(),
        }
    }
}

pub struct IdentityService {
    users: Vec<UserEntry>,
    expire_secs: u64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl IdentityService {
    pub fn new(config: IdentityConfig) -> Self {
        Self {
            users: config.users,
            expire_secs: config.expire_secs,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    fn find_user(&self, email: &str) -> Option<&UserEntry> {
        let email = email.trim();
        self.users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
    }

    /// Check credentials and issue a token.
    ///
    /// Unknown email and wrong password produce the same error.
    pub fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ServiceError> {
        let user = match self.find_user(email) {
            Some(u) if verify_password(password, &u.password_hash) => u,
            _ => {
                warn!("failed sign-in for {}", email);
                return Err(ServiceError::Unauthorized("invalid email or password".into()));
            }
        };

        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user.email.clone(),
            name: if user.name.is_empty() { user.email.clone() } else { user.name.clone() },
            sid: new_id(),
            iat: now,
            exp: now + self.expire_secs as i64,
        };
        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::Internal(format!("JWT encode failed: {}", e)))?;

        info!("{} signed in (session {})", claims.sub, claims.sid);
        Ok(LoginResponse {
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_in: self.expire_secs,
        })
    }

    /// Decode and validate a bearer token.
    pub fn verify_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| ServiceError::Unauthorized(format!("invalid token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::hash_password;

    fn test_service() -> IdentityService {
        IdentityService::new(IdentityConfig {
            users: vec![UserEntry {
                email: "owner@tradedesk.in".into(),
                name: "Owner".into(),
                password_hash: hash_password("open-sesame").unwrap(),
            }],
            jwt_secret: "test-secret".into(),
            expire_secs: 3600,
        })
    }

    #[test]
    fn login_issues_verifiable_token() {
        let svc = test_service();
        let resp = svc.login("owner@tradedesk.in", "open-sesame").unwrap();
        assert_eq!(resp.token_type, "Bearer");
        assert_eq!(resp.expires_in, 3600);

        let claims = svc.verify_token(&resp.access_token).unwrap();
        assert_eq!(claims.sub, "owner@tradedesk.in");
        assert_eq!(claims.name, "Owner");
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.sid.len(), 32);
    }

    #[test]
    fn email_match_ignores_case() {
        let svc = test_service();
        assert!(svc.login("  Owner@TradeDesk.in", "open-sesame").is_ok());
    }

    #[test]
    fn bad_credentials_rejected() {
        let svc = test_service();
        let wrong_pw = svc.login("owner@tradedesk.in", "nope").unwrap_err();
        let unknown = svc.login("who@tradedesk.in", "open-sesame").unwrap_err();
        assert_eq!(wrong_pw, unknown);
        assert_eq!(wrong_pw.error_code(), "UNAUTHENTICATED");
    }

    #[test]
    fn token_from_other_secret_rejected() {
        let svc = test_service();
        let other = IdentityService::new(IdentityConfig {
            users: svc.users.clone(),
            jwt_secret: "another-secret".into(),
            expire_secs: 60,
        });
        let token = other.login("owner@tradedesk.in", "open-sesame").unwrap().access_token;
        assert!(matches!(svc.verify_token(&token), Err(ServiceError::Unauthorized(_))));
        assert!(svc.verify_token("garbage").is_err());
    }
}
