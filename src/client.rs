//! Blocking HTTP client for the analysis API.
//!
//! Each call performs exactly one request on the calling thread and returns
//! once the response has been read. Nothing is retried.

use crate::config::ApiConfig;
use crate::preset::RemotePresets;
use crate::request::{Configuration, Mode};
use crate::response::{AnalysisResponse, DataStatus, ErrorBody, Health};
use crate::suite::Busy;
use curl::easy::{Easy, List};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Fallback message for the auxiliary GET endpoints.
const REQUEST_FAILED: &str = "request failed";

/// Why an analysis request did not produce a response.
///
/// The `Display` text of each variant is the message shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The API rejected the request and said why.
    #[error("{detail}")]
    Api { status: u32, detail: String },
    /// The API rejected the request without a usable reason.
    #[error("{message}")]
    Status { status: u32, message: &'static str },
    /// The request never completed (unreachable host, timeout, ...).
    #[error("{0}")]
    Transport(#[from] curl::Error),
    /// The API answered with a success status but an unreadable body.
    #[error("{0}")]
    Decode(#[from] serde_json::Error),
    /// The configuration was rejected before anything was sent.
    #[error("{0}")]
    InvalidConfig(String),
    /// The page already has a request in flight.
    #[error(transparent)]
    Busy(#[from] Busy),
}

impl ClientError {
    /// HTTP status for failures reported by the API.
    pub fn status(&self) -> Option<u32> {
        match self {
            ClientError::Api { status, .. } | ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure happened below the API (network or decoding).
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::Decode(_))
    }
}

/// Something that can run one analysis.
///
/// The benchmark suite and the pages only depend on this trait, so they can
/// be driven by [`HttpClient`] or by a scripted stand-in.
pub trait Analyze {
    fn submit(
        &self,
        mode: Mode,
        config: &Configuration,
    ) -> Result<AnalysisResponse, ClientError>;
}

impl<T: Analyze + ?Sized> Analyze for &T {
    fn submit(
        &self,
        mode: Mode,
        config: &Configuration,
    ) -> Result<AnalysisResponse, ClientError> {
        (**self).submit(mode, config)
    }
}

/// libcurl-backed client for one API base address.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    connect_timeout: Duration,
    timeout: Option<Duration>,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let api = ApiConfig::default();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            connect_timeout: api.connect_timeout,
            timeout: api.timeout,
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.base_url.as_str())
            .with_connect_timeout(config.connect_timeout)
            .with_timeout(config.timeout)
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Bound the whole request. `None` waits for as long as the backend
    /// takes.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /`
    pub fn health(&self) -> Result<Health, ClientError> {
        self.get_json("/")
    }

    /// `GET /api/status`
    pub fn data_status(&self) -> Result<DataStatus, ClientError> {
        self.get_json("/api/status")
    }

    /// `GET /api/presets`
    pub fn presets(&self) -> Result<RemotePresets, ClientError> {
        self.get_json("/api/presets")
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let (status, body) = self.perform(path, None)?;
        decode(status, &body, REQUEST_FAILED)
    }

    /// Perform one request and return the status code with the raw body.
    fn perform(&self, path: &str, body: Option<&[u8]>) -> Result<(u32, Vec<u8>), ClientError> {
        let url = format!("{}{}", self.base_url, path);

        let mut easy = Easy::new();
        easy.url(&url)?;
        easy.connect_timeout(self.connect_timeout)?;
        if let Some(timeout) = self.timeout {
            easy.timeout(timeout)?;
        }

        let mut headers = List::new();
        headers.append("Accept: application/json")?;
        match body {
            Some(body) => {
                headers.append("Content-Type: application/json")?;
                easy.post(true)?;
                easy.post_fields_copy(body)?;
            }
            None => easy.get(true)?,
        }
        easy.http_headers(headers)?;

        let mut response = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                response.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        tracing::debug!(%url, status, bytes = response.len(), "response received");

        Ok((status, response))
    }
}

impl Analyze for HttpClient {
    fn submit(
        &self,
        mode: Mode,
        config: &Configuration,
    ) -> Result<AnalysisResponse, ClientError> {
        let body = serde_json::to_vec(&config.body(mode))?;
        tracing::debug!(
            mode = %mode,
            body = %String::from_utf8_lossy(&body),
            "submitting analysis"
        );

        let (status, response) = self.perform(mode.path(), Some(&body))?;
        decode(status, &response, mode.failure_message())
    }
}

/// Decode a success body, or classify a failure status.
fn decode<T: DeserializeOwned>(
    status: u32,
    body: &[u8],
    fallback: &'static str,
) -> Result<T, ClientError> {
    if (200..300).contains(&status) {
        return Ok(serde_json::from_slice(body)?);
    }

    let detail = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message());

    match detail {
        Some(detail) => Err(ClientError::Api { status, detail }),
        None => Err(ClientError::Status {
            status,
            message: fallback,
        }),
    }
}
