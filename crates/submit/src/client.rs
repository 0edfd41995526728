//! Rejection endpoint client.
//!
//! Blocking reqwest client; one multipart POST per submission, never retried.

use reqwest::blocking::multipart::{Form, Part};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use std::time::Duration;
use tracing::{info, warn};
use umbral_core::TransactionRecord;
use umbral_report::XLSX_MIME;

use crate::config::RejectionConfig;
use crate::error::SubmitError;
use crate::payload::{build_rows, to_xlsx};

pub const FILE_PART: &str = "file";

/// What the endpoint said about an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub status: u16,
    pub body: String,
    pub rows: usize,
}

#[derive(Debug, Clone)]
pub struct RejectionClient {
    http: reqwest::blocking::Client,
    endpoint: Url,
    config: RejectionConfig,
}

impl RejectionClient {
    /// Validates the endpoint and static headers and builds the HTTP client.
    pub fn new(config: RejectionConfig) -> Result<Self, SubmitError> {
        let endpoint = parse_endpoint(&config.endpoint_url)?;

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| SubmitError::InvalidHeader(name.clone()))?;
            let header_value =
                HeaderValue::from_str(value).map_err(|_| SubmitError::InvalidHeader(name.clone()))?;
            headers.insert(header_name, header_value);
        }

        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("umbral/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(config.timeout_ms))
            .default_headers(headers)
            .build()
            .map_err(SubmitError::Client)?;

        Ok(Self {
            http,
            endpoint,
            config,
        })
    }

    /// Posts the rejection payload for `selected`.
    ///
    /// Only a 2xx answer is success. Any other status comes back as
    /// [`SubmitError::Rejected`] with the response body untouched.
    pub fn submit(&self, selected: &[&TransactionRecord]) -> Result<SubmissionReceipt, SubmitError> {
        if selected.is_empty() {
            return Err(SubmitError::EmptySelection);
        }

        let rows = build_rows(selected, &self.config);
        let payload = to_xlsx(&rows)?;
        let part = Part::bytes(payload)
            .file_name(self.config.attachment_name.clone())
            .mime_str(XLSX_MIME)
            .map_err(SubmitError::Client)?;
        let form = Form::new().part(FILE_PART, part);

        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            warn!(
                endpoint = %self.endpoint,
                status = status.as_u16(),
                rows = rows.len(),
                "Rejection request refused"
            );
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!(
            endpoint = %self.endpoint,
            status = status.as_u16(),
            rows = rows.len(),
            "Rejection request accepted"
        );
        Ok(SubmissionReceipt {
            status: status.as_u16(),
            body,
            rows: rows.len(),
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> SubmitError {
        if err.is_timeout() {
            warn!(endpoint = %self.endpoint, timeout_ms = self.config.timeout_ms, "Rejection request timed out");
            SubmitError::Timeout {
                timeout_ms: self.config.timeout_ms,
            }
        } else {
            warn!(endpoint = %self.endpoint, error = %err, "Rejection request failed");
            SubmitError::Transport(err)
        }
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, SubmitError> {
    let invalid = |reason: String| SubmitError::InvalidEndpoint {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}
