//! # HTTP Transport
//!
//! The single place requests are built, sent and their failures mapped.
//!
//! ## Request Lifecycle
//! ```text
//! service method
//!      │ path, query, body
//!      ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │ HttpTransport::send                                          │
//! │  1. join base URL + path, attach query                       │
//! │  2. Authorization: Bearer <token>, X-Request-Id: <uuid v4>   │
//! │  3. send with timeout                                        │
//! │  4. non-2xx  → ClientError::from_status(status, body.error)  │
//! │     transport → ConnectionFailed / Timeout                   │
//! │  5. 2xx      → ApiEnvelope<T>                                │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::envelope::{ApiEnvelope, ErrorBody};
use crate::error::{ClientError, ClientResult};

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Owns the HTTP client, base URL and bearer token.
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    timeout_secs: u64,
    token: RwLock<Option<String>>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.api.user_agent.clone())
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(HttpTransport {
            client,
            base_url: config.base_url()?,
            timeout_secs: config.api.timeout_secs,
            token: RwLock::new(config.api.token.clone()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Replaces the bearer token (`None` signs out).
    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    pub async fn has_token(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// `base_url` + `path`, keeping any path prefix on the base.
    pub fn url_for(&self, path: &str) -> ClientResult<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&joined)?)
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> ClientResult<ApiEnvelope<T>> {
        let url = self.url_for(path)?;
        let request = self.client.get(url).query(query);
        self.send(Method::GET, path, request).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<ApiEnvelope<T>> {
        let url = self.url_for(path)?;
        let request = self.client.post(url).json(body);
        self.send(Method::POST, path, request).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<ApiEnvelope<T>> {
        let url = self.url_for(path)?;
        let request = self.client.put(url).json(body);
        self.send(Method::PUT, path, request).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<ApiEnvelope<T>> {
        let url = self.url_for(path)?;
        let request = self.client.delete(url);
        self.send(Method::DELETE, path, request).await
    }

    // =========================================================================
    // Send + Map
    // =========================================================================

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> ClientResult<ApiEnvelope<T>> {
        let request_id = Uuid::new_v4();
        let mut request = request.header(REQUEST_ID_HEADER, request_id.to_string());
        if let Some(token) = self.token.read().await.as_deref() {
            request = request.bearer_auth(token);
        }

        debug!(%method, path, %request_id, "Sending request");

        let response = request.send().await.map_err(|e| self.map_transport_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            let message = ErrorBody::parse(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            warn!(%method, path, %request_id, status = status.as_u16(), %message, "Request failed");
            return Err(ClientError::from_status(status.as_u16(), message));
        }

        debug!(%method, path, %request_id, status = status.as_u16(), "Response received");

        if body.trim().is_empty() {
            return Ok(ApiEnvelope {
                success: true,
                data: None,
                error: None,
                message: None,
                count: None,
                deleted_conflicts: None,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!(%method, path, %request_id, error = %e, "Unexpected response body");
            ClientError::DeserializationFailed(format!("{} {}: {}", method, path, e))
        })
    }

    fn map_transport_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.timeout_secs)
        } else if err.is_decode() {
            ClientError::DeserializationFailed(err.to_string())
        } else {
            ClientError::ConnectionFailed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_keeps_prefix() {
        let transport =
            HttpTransport::new(&ClientConfig::with_base_url("http://localhost:5000/api/v1/")).unwrap();
        assert_eq!(
            transport.url_for("/cars/abc").unwrap().as_str(),
            "http://localhost:5000/api/v1/cars/abc"
        );
        assert_eq!(
            transport.url_for("reservations/my").unwrap().as_str(),
            "http://localhost:5000/api/v1/reservations/my"
        );
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(HttpTransport::new(&ClientConfig::with_base_url("ws://localhost")).is_err());
    }

    #[tokio::test]
    async fn test_token_can_be_replaced() {
        let transport = HttpTransport::new(&ClientConfig::default()).unwrap();
        assert!(!transport.has_token().await);
        transport.set_token(Some("t".to_string())).await;
        assert!(transport.has_token().await);
        transport.set_token(None).await;
        assert!(!transport.has_token().await);
    }
}
