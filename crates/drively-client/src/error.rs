//! # Client Error Types
//!
//! Error types for calls to the Drively REST backend.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     HTTP Status         │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Connection     │  │  400/422 BadRequest     │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  401 Unauthorized       │ │
//! │  │  ConfigLoad/Save│  │                 │  │  403 Forbidden          │ │
//! │  └─────────────────┘  └─────────────────┘  │  404 NotFound           │ │
//! │                                            │  409 Conflict           │ │
//! │  ┌─────────────────┐  ┌─────────────────┐  │  5xx Server             │ │
//! │  │    Protocol     │  │     Domain      │  └─────────────────────────┘ │
//! │  │                 │  │                 │                              │
//! │  │  Deserialization│  │  CoreError from │                              │
//! │  │  EmptyResponse  │  │  drively-core   │                              │
//! │  │  Rejected       │  │                 │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is retried automatically. [`ClientError::is_retryable`] only
//! tells the UI whether to offer a "Try again" button.

use drively_core::CoreError;
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Everything that can go wrong talking to the backend.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// Invalid API base URL.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Could not reach the backend.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    // =========================================================================
    // HTTP Status Errors
    // =========================================================================
    /// 400 or 422.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 401. Missing or expired token.
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    /// 403. Signed in, but the role does not allow this.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 404.
    #[error("Not found: {0}")]
    NotFound(String),

    /// 409. Another change won the race.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 5xx.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Any other non-success status.
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    // =========================================================================
    // Protocol Errors
    // =========================================================================
    /// Response body did not match the expected shape.
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// A successful response carried no `data`.
    #[error("Empty response from {0}")]
    EmptyResponse(String),

    /// The backend answered 2xx with `success: false`.
    #[error("Request rejected: {0}")]
    Rejected(String),

    // =========================================================================
    // Domain Errors
    // =========================================================================
    /// A local rule check failed before anything was sent.
    #[error(transparent)]
    Domain(#[from] CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<drively_core::ValidationError> for ClientError {
    fn from(err: drively_core::ValidationError) -> Self {
        ClientError::Domain(CoreError::Validation(err))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::DeserializationFailed(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Status Mapping
// =============================================================================

impl ClientError {
    /// Maps a non-success HTTP status and the backend's message.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 | 422 => ClientError::BadRequest(message),
            401 => ClientError::Unauthorized(message),
            403 => ClientError::Forbidden(message),
            404 => ClientError::NotFound(message),
            409 => ClientError::Conflict(message),
            500..=599 => ClientError::Server { status, message },
            _ => ClientError::UnexpectedStatus { status, message },
        }
    }

    /// Returns true if the same request may succeed when tried again.
    ///
    /// ## Retryable Errors
    /// - Connection failures
    /// - Timeouts
    /// - 5xx responses
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::ConnectionFailed(_) | ClientError::Timeout(_) | ClientError::Server { .. }
        )
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }

    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::ConnectionFailed(_) | ClientError::Timeout(_) => {
                "Could not reach Drively. Check your connection and try again.".to_string()
            }
            ClientError::Server { .. } => {
                "Something went wrong on our side. Please try again later.".to_string()
            }
            ClientError::Unauthorized(_) => "Please sign in to continue.".to_string(),
            ClientError::Forbidden(_) => "You are not allowed to do that.".to_string(),
            ClientError::NotFound(message)
            | ClientError::BadRequest(message)
            | ClientError::Conflict(message)
            | ClientError::Rejected(message)
                if !message.is_empty() =>
            {
                message.clone()
            }
            ClientError::NotFound(_) => "Not found.".to_string(),
            ClientError::Domain(err) => err.to_string(),
            other => other.to_string(),
        }
    }
}
