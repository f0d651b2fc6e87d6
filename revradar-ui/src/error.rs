//! Error types for revradar-ui
//!
//! One taxonomy for everything that can stop a submission from reaching
//! Success. `Display` carries diagnostic detail for logs; the session shows
//! [`DispatchError::user_message`] instead.

use revradar_common::SchemaError;
use thiserror::Error;

/// Analysis dispatch error
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Query trims to empty, rejected before any request is made
    #[error("Search query is empty")]
    Validation,

    /// Backend could not be reached (connection refused, DNS, timeout)
    #[error("Cannot reach backend at {endpoint}: {reason}")]
    Network { endpoint: String, reason: String },

    /// Backend answered with a non-success status
    #[error("Server error {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Server {
        status: u16,
        /// `detail` string from the response body, if present
        detail: Option<String>,
    },

    /// Success response whose body failed schema validation
    #[error("Malformed analysis response: {0}")]
    Parse(#[from] SchemaError),
}

impl DispatchError {
    /// Message recorded on the session when this error ends a submission
    pub fn user_message(&self) -> String {
        match self {
            DispatchError::Validation => "Please enter a product name to analyze.".to_string(),
            DispatchError::Network { .. } => {
                "Cannot connect to backend: the analysis server is unreachable. \
                 Please check your backend server."
                    .to_string()
            }
            DispatchError::Server {
                detail: Some(detail),
                ..
            } => detail.clone(),
            DispatchError::Server { status, detail: None } => format!("Server error: {}", status),
            DispatchError::Parse(_) => {
                "Failed to analyze product: the server returned an unreadable response.".to_string()
            }
        }
    }

    /// Parse failures are reported as a kind of server error
    pub fn is_server_side(&self) -> bool {
        matches!(self, DispatchError::Server { .. } | DispatchError::Parse(_))
    }
}
