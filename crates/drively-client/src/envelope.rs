//! Response envelope shared by every backend endpoint.
//!
//! ```json
//! { "success": true, "count": 2, "data": [ ... ] }
//! { "success": true, "data": { ... }, "deletedConflicts": 3 }
//! { "success": false, "error": "Car is not available" }
//! ```

use serde::Deserialize;

use crate::error::{ClientError, ClientResult};

/// `{ success, data?, error?, message?, count?, deletedConflicts? }`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub deleted_conflicts: Option<usize>,
}

fn default_success() -> bool {
    true
}

impl<T> ApiEnvelope<T> {
    /// The backend's explanation, preferring `error` over `message`.
    pub fn reason(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }

    /// Fails with [`ClientError::Rejected`] when `success` is false.
    pub fn ensure_success(self) -> ClientResult<Self> {
        if self.success {
            Ok(self)
        } else {
            let reason = self.reason().unwrap_or("request was not successful").to_string();
            Err(ClientError::Rejected(reason))
        }
    }

    /// Unwraps `data`, failing when the backend sent none.
    pub fn into_data(self, path: &str) -> ClientResult<T> {
        self.ensure_success()?
            .data
            .ok_or_else(|| ClientError::EmptyResponse(path.to_string()))
    }
}

/// Error body on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    pub(crate) fn parse(body: &str) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        parsed.error.or(parsed.message).filter(|m| !m.is_empty())
    }
}
