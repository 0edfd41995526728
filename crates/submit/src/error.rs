use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("No records selected for rejection")]
    EmptySelection,

    #[error("Invalid rejection endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("Invalid rejection header '{0}'")]
    InvalidHeader(String),

    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Cannot build rejection payload: {0}")]
    Payload(#[from] rust_xlsxwriter::XlsxError),

    #[error("Rejection request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("Rejection request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Rejection endpoint answered HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}
