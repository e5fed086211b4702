use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tradedesk_core::{ListResult, ServiceError};
use tradedesk_records::{Collection, Entity};

use crate::error::ApiError;
use crate::token::TokenSource;

/// Type-safe CRUD client for one master collection.
///
/// API path: `{base_url}/masters/{E::PATH}`.
pub struct ResourceClient<E: Entity> {
    http: reqwest::Client,
    base_url: String,
    token_source: Arc<dyn TokenSource>,
    _phantom: PhantomData<E>,
}

impl<E: Entity> ResourceClient<E> {
    pub fn new(base_url: impl Into<String>, token_source: Arc<dyn TokenSource>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token_source,
            _phantom: PhantomData,
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/masters/{}", self.base_url, E::PATH)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url(), id)
    }

    /// Build a request with auth header.
    async fn authed(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, ApiError> {
        match self.token_source.token().await? {
            Some(token) => Ok(builder.bearer_auth(token)),
            None => Ok(builder),
        }
    }

    /// Parse an API response, mapping HTTP errors to `ApiError`.
    async fn parse<R: DeserializeOwned>(resp: reqwest::Response) -> Result<R, ApiError> {
        if !resp.status().is_success() {
            return Err(ApiError::from_response(resp).await);
        }
        resp.json::<R>()
            .await
            .map_err(|e| ApiError::Decode(format!("response body: {}", e)))
    }

    /// List all records.
    pub async fn list(&self) -> Result<ListResult<E>, ApiError> {
        let req = self.authed(self.http.get(self.collection_url())).await?;
        Self::parse(req.send().await?).await
    }

    pub async fn get(&self, id: &str) -> Result<E, ApiError> {
        let req = self.authed(self.http.get(self.item_url(id))).await?;
        Self::parse(req.send().await?).await
    }

    /// Create a new record. The server assigns the id.
    pub async fn create(&self, item: &E) -> Result<E, ApiError> {
        let req = self.authed(self.http.post(self.collection_url()).json(item)).await?;
        Self::parse(req.send().await?).await
    }

    /// Overwrite the record stored under `item.id()`.
    pub async fn update(&self, item: &E) -> Result<E, ApiError> {
        let req = self.authed(self.http.put(self.item_url(item.id())).json(item)).await?;
        Self::parse(req.send().await?).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let req = self.authed(self.http.delete(self.item_url(id))).await?;
        let resp = req.send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::from_response(resp).await);
        }
        Ok(())
    }
}

#[async_trait]
impl<E: Entity> Collection<E> for ResourceClient<E> {
    async fn list(&self) -> Result<Vec<E>, ServiceError> {
        Ok(ResourceClient::list(self).await?.items)
    }

    async fn create(&self, record: E) -> Result<E, ServiceError> {
        Ok(ResourceClient::create(self, &record).await?)
    }

    async fn update(&self, record: &E) -> Result<E, ServiceError> {
        Ok(ResourceClient::update(self, record).await?)
    }

    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        Ok(ResourceClient::delete(self, id).await?)
    }
}
