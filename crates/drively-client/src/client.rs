//! # DrivelyClient
//!
//! One handle for every backend call the front-end makes.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           DrivelyClient                                 │
//! │                                                                         │
//! │   services::cars   services::reservations   services::ratings          │
//! │   services::membership                      services::promotions       │
//! │          │                  │                        │                  │
//! │          └──────────────────┼────────────────────────┘                  │
//! │                             ▼                                           │
//! │   ┌─────────────────────┐       ┌──────────────────────────────────┐   │
//! │   │   ResponseCache     │◄─────►│  fetch_cached / invalidate       │   │
//! │   │   (moka, TTL)       │       └──────────────────────────────────┘   │
//! │   └─────────────────────┘                      │                        │
//! │                                                ▼                        │
//! │                              ┌──────────────────────────────────┐      │
//! │                              │  HttpTransport (reqwest)         │      │
//! │                              └──────────────────────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The client is `Send + Sync`; share it behind an `Arc`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use crate::cache::{CacheKey, ResponseCache};
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::transport::HttpTransport;

/// Typed client for the Drively REST API.
pub struct DrivelyClient {
    pub(crate) transport: HttpTransport,
    pub(crate) cache: ResponseCache,
}

impl DrivelyClient {
    /// Builds a client from an already loaded configuration.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let transport = HttpTransport::new(&config)?;
        let cache = ResponseCache::new(config.cache_ttl(), config.cache.max_entries);

        info!(
            base_url = %transport.base_url(),
            cache = cache.is_enabled(),
            "Drively client ready"
        );

        Ok(DrivelyClient { transport, cache })
    }

    /// Loads configuration (file, then environment) and builds a client.
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        Self::new(ClientConfig::load(config_path)?)
    }

    /// Replaces the bearer token. Cached reads belong to the previous
    /// session, so they are dropped.
    pub async fn set_token(&self, token: Option<String>) {
        let signed_in = token.is_some();
        self.transport.set_token(token).await;
        self.cache.clear().await;
        info!(signed_in, "Session token changed");
    }

    pub async fn is_signed_in(&self) -> bool {
        self.transport.has_token().await
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    // =========================================================================
    // Shared Helpers
    // =========================================================================

    /// GET through the cache. A response that raced an invalidation is
    /// returned but not stored.
    pub(crate) async fn fetch_cached<T>(
        &self,
        key: CacheKey,
        path: &str,
        query: &[(String, String)],
    ) -> ClientResult<T>
    where
        T: DeserializeOwned + Serialize,
    {
        if let Some(hit) = self.cache.get::<T>(&key).await {
            return Ok(hit);
        }

        let generation = self.cache.generation();
        let value: T = self.transport.get(path, query).await?.into_data(path)?;
        self.cache.put_fresh(key, &value, generation).await;
        Ok(value)
    }

    /// GET for list endpoints. A missing `data` reads as an empty list.
    pub(crate) async fn fetch_cached_list<T>(
        &self,
        key: CacheKey,
        path: &str,
        query: &[(String, String)],
    ) -> ClientResult<Vec<T>>
    where
        T: DeserializeOwned + Serialize,
    {
        if let Some(hit) = self.cache.get::<Vec<T>>(&key).await {
            return Ok(hit);
        }

        let generation = self.cache.generation();
        let items: Vec<T> = self
            .transport
            .get::<Vec<T>>(path, query)
            .await?
            .ensure_success()?
            .data
            .unwrap_or_default();
        self.cache.put_fresh(key, &items, generation).await;
        Ok(items)
    }
}
