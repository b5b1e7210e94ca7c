use crate::models::{ResultRow, ScanRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors from talking to the scan service
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Scan service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Scan service returned HTTP {status}")]
    Status { status: u16 },

    #[error("Scan failed: {0}")]
    Rejected(String),

    #[error("A scan is already running")]
    AlreadyRunning,
}

/// How a scan that ran to completion turned out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// New results are ready to fetch
    Matches,
    /// The scan ran but nothing matched
    NoResults,
}

/// Body returned by `POST /scan`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,

    #[serde(default)]
    pub no_results: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitResponse {
    pub fn into_outcome(self) -> Result<SubmitOutcome, ScanError> {
        if !self.success {
            return Err(ScanError::Rejected(
                self.error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| "scan service reported failure".to_string()),
            ));
        }

        Ok(if self.no_results {
            SubmitOutcome::NoResults
        } else {
            SubmitOutcome::Matches
        })
    }
}

/// The remote scan service.
///
/// Transport, authentication and retry live behind this trait; callers only
/// see outcomes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScanService: Send + Sync {
    /// Run a scan with the given request.
    async fn submit(&self, request: &ScanRequest) -> Result<SubmitOutcome, ScanError>;

    /// Fetch the full current result set.
    async fn fetch_results(&self) -> Result<Vec<ResultRow>, ScanError>;
}

/// [`ScanService`] over HTTP.
///
/// - `POST {base}/scan` with the request as JSON
/// - `GET {base}/reload` returning a JSON array of rows
pub struct HttpScanClient {
    client: Client,
    base_url: String,
}

impl HttpScanClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, ScanError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        tracing::debug!("Scan client targeting {}", base_url);

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl ScanService for HttpScanClient {
    async fn submit(&self, request: &ScanRequest) -> Result<SubmitOutcome, ScanError> {
        let response = self
            .client
            .post(self.endpoint("scan"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::Status {
                status: status.as_u16(),
            });
        }

        let body: SubmitResponse = response.json().await?;
        body.into_outcome()
    }

    async fn fetch_results(&self) -> Result<Vec<ResultRow>, ScanError> {
        let response = self.client.get(self.endpoint("reload")).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::Status {
                status: status.as_u16(),
            });
        }

        let rows: Vec<ResultRow> = response.json().await?;
        tracing::debug!("Fetched {} result rows", rows.len());
        Ok(rows)
    }
}
