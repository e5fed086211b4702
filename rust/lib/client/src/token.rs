use crate::error::ApiError;

/// Pluggable token provider. Called before every API request.
///
/// Returns `Ok(None)` to skip the Authorization header (anonymous).
#[async_trait::async_trait]
pub trait TokenSource: Send + Sync + 'static {
    async fn token(&self) -> Result<Option<String>, ApiError>;
}

/// Anonymous requests, for the public endpoints.
pub struct NoAuth;

#[async_trait::async_trait]
impl TokenSource for NoAuth {
    async fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(None)
    }
}
