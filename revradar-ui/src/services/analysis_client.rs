//! Analysis service client
//!
//! [`AnalysisBackend`] is the seam to the external analysis service.
//! [`HttpAnalysisBackend`] talks to the real server over HTTP;
//! [`RequestDispatcher`] validates the query and issues exactly one backend
//! call per submission. No retries, no caching.

use crate::config::ClientSettings;
use crate::error::DispatchError;
use async_trait::async_trait;
use revradar_common::{AnalysisResult, Error, SchemaError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const USER_AGENT: &str = concat!("revradar-ui/", env!("CARGO_PKG_VERSION"));
const ANALYZE_PATH: &str = "/analyze";

/// External analysis service
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Analyze reviews for `keyword` (already trimmed and non-empty)
    async fn analyze(&self, keyword: &str) -> Result<AnalysisResult, DispatchError>;
}

/// `POST /analyze` request body
#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    keyword: &'a str,
}

/// Error body shape (`{"detail": ...}`)
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}

/// Root probe response (`GET /`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// HTTP client for the analysis server
pub struct HttpAnalysisBackend {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpAnalysisBackend {
    /// `base_url` must already be normalized (no trailing slash)
    ///
    /// # Errors
    /// `Error::Config` if the HTTP client cannot be built (TLS backend,
    /// invalid client options). No request is attempted.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> revradar_common::Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(client_setup_error)?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
        })
    }

    pub fn from_settings(settings: &ClientSettings) -> revradar_common::Result<Self> {
        Self::new(settings.api_base_url.clone(), settings.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Query the server's root status probe
    pub async fn health(&self) -> Result<HealthStatus, DispatchError> {
        let endpoint = self.endpoint("/");
        let response = self
            .http_client
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| network_error(&endpoint, e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| network_error(&endpoint, e))?;

        if !status.is_success() {
            return Err(DispatchError::Server {
                status: status.as_u16(),
                detail: extract_detail(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| DispatchError::Parse(SchemaError::InvalidJson(e.to_string())))
    }
}

#[async_trait]
impl AnalysisBackend for HttpAnalysisBackend {
    async fn analyze(&self, keyword: &str) -> Result<AnalysisResult, DispatchError> {
        let endpoint = self.endpoint(ANALYZE_PATH);

        tracing::debug!(keyword, endpoint = %endpoint, "Requesting analysis");

        let response = self
            .http_client
            .post(&endpoint)
            .json(&AnalyzeRequest { keyword })
            .send()
            .await
            .map_err(|e| network_error(&endpoint, e))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let detail = extract_detail(&error_text);
            tracing::warn!(
                status = status.as_u16(),
                detail = ?detail,
                "Analysis request rejected by server"
            );
            return Err(DispatchError::Server {
                status: status.as_u16(),
                detail,
            });
        }

        let body = response.text().await.map_err(|e| network_error(&endpoint, e))?;
        let result = AnalysisResult::from_json_str(&body)?;

        tracing::info!(
            keyword,
            rating = result.rating,
            comments = result.comments.len(),
            similar_products = result.similar_products.len(),
            "Analysis received"
        );

        Ok(result)
    }
}

fn client_setup_error(err: reqwest::Error) -> Error {
    Error::Config(format!("HTTP client setup failed: {}", err))
}

fn network_error(endpoint: &str, err: reqwest::Error) -> DispatchError {
    let reason = if err.is_timeout() {
        format!("request timed out: {}", err)
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        err.to_string()
    };

    tracing::warn!(endpoint, reason = %reason, "Analysis backend unreachable");

    DispatchError::Network {
        endpoint: endpoint.to_string(),
        reason,
    }
}

/// Non-empty string `detail` from an error body, if any
pub fn extract_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        Value::String(detail) if !detail.trim().is_empty() => Some(detail),
        _ => None,
    }
}

/// Issues one analysis call per submission
#[derive(Clone)]
pub struct RequestDispatcher {
    backend: Arc<dyn AnalysisBackend>,
}

impl RequestDispatcher {
    pub fn new(backend: Arc<dyn AnalysisBackend>) -> Self {
        Self { backend }
    }

    /// Trimmed keyword, or `Validation` if nothing is left
    pub fn validate_query(query: &str) -> Result<&str, DispatchError> {
        let keyword = query.trim();
        if keyword.is_empty() {
            Err(DispatchError::Validation)
        } else {
            Ok(keyword)
        }
    }

    /// Validate `query` and dispatch it to the backend
    pub async fn submit(&self, query: &str) -> Result<AnalysisResult, DispatchError> {
        let keyword = Self::validate_query(query)?;
        self.backend.analyze(keyword).await
    }
}
