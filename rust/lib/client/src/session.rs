//! Identity collaborator: signs in against `/auth/login` and publishes
//! the signed-in user to observers.

use serde::{Deserialize, Serialize};
use tokio::sync::{watch, RwLock};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::token::TokenSource;

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub email: String,
    pub name: String,
}

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
    expires_in: u64,
}

struct Active {
    access_token: String,
    /// Absolute expiry (seconds since epoch). None for restored tokens.
    expires_at: Option<i64>,
}

/// Email/password session against one server.
///
/// Observers get the current user through [`Session::subscribe`]; the
/// session is also the [`TokenSource`] for resource clients.
pub struct Session {
    http: reqwest::Client,
    base_url: String,
    active: RwLock<Option<Active>>,
    user_tx: watch::Sender<Option<CurrentUser>>,
}

impl Session {
    pub fn new(base_url: impl Into<String>) -> Self {
        let (user_tx, _) = watch::channel(None);
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            active: RwLock::new(None),
            user_tx,
        }
    }

    /// Sign in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<CurrentUser, ApiError> {
        let url = format!("{}/auth/login", self.base_url);
        let resp = self
            .http
            .post(&url)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(match ApiError::from_response(resp).await {
                ApiError::Server { message, .. } => ApiError::Auth(format!("sign-in failed: {}", message)),
                other => other,
            });
        }

        let lr: LoginResponse = resp
            .json()
            .await
            .map_err(|e| ApiError::Decode(format!("login response: {}", e)))?;

        let user = self.fetch_me(&lr.access_token).await?;
        // Expire 30s early to avoid edge-case races.
        let expires_at = chrono::Utc::now().timestamp() + lr.expires_in as i64 - 30;
        self.activate(lr.access_token, Some(expires_at), user.clone()).await;
        info!("signed in as {}", user.email);
        Ok(user)
    }

    /// Resume a session from a previously issued token.
    pub async fn restore(&self, token: &str) -> Result<CurrentUser, ApiError> {
        let user = self.fetch_me(token).await?;
        self.activate(token.to_string(), None, user.clone()).await;
        debug!("restored session for {}", user.email);
        Ok(user)
    }

    pub async fn sign_out(&self) {
        *self.active.write().await = None;
        self.user_tx.send_replace(None);
        info!("signed out");
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.user_tx.borrow().clone()
    }

    /// Observe sign-in and sign-out. The receiver starts at the current value.
    pub fn subscribe(&self) -> watch::Receiver<Option<CurrentUser>> {
        self.user_tx.subscribe()
    }

    /// Bearer token of the active session, for persisting between runs.
    pub async fn access_token(&self) -> Option<String> {
        self.active.read().await.as_ref().map(|a| a.access_token.clone())
    }

    async fn activate(&self, access_token: String, expires_at: Option<i64>, user: CurrentUser) {
        *self.active.write().await = Some(Active { access_token, expires_at });
        self.user_tx.send_replace(Some(user));
    }

    async fn fetch_me(&self, token: &str) -> Result<CurrentUser, ApiError> {
        let url = format!("{}/auth/me", self.base_url);
        let resp = self.http.get(&url).bearer_auth(token).send().await?;
        if !resp.status().is_success() {
            return Err(match ApiError::from_response(resp).await {
                ApiError::Server { message, .. } => ApiError::Auth(message),
                other => other,
            });
        }
        resp.json()
            .await
            .map_err(|e| ApiError::Decode(format!("me response: {}", e)))
    }
}

#[async_trait::async_trait]
impl TokenSource for Session {
    async fn token(&self) -> Result<Option<String>, ApiError> {
        let guard = self.active.read().await;
        let active = guard
            .as_ref()
            .ok_or_else(|| ApiError::Auth("not signed in".into()))?;
        if let Some(expires_at) = active.expires_at {
            if chrono::Utc::now().timestamp() >= expires_at {
                return Err(ApiError::Auth("session expired; sign in again".into()));
            }
        }
        Ok(Some(active.access_token.clone()))
    }
}
