use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_ATTACHMENT_NAME: &str = "rechazo.xlsx";

/// Endpoint and payload settings for rejection requests.
///
/// The default endpoint is empty and fails URL validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RejectionConfig {
    pub endpoint_url: String,
    pub rejection_code: String,
    pub rejection_description: String,
    pub timeout_ms: u64,
    /// Static headers sent with every request, e.g. an API key.
    pub headers: BTreeMap<String, String>,
    pub attachment_name: String,
}

impl Default for RejectionConfig {
    fn default() -> Self {
        Self {
            endpoint_url: String::new(),
            rejection_code: String::new(),
            rejection_description: String::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            headers: BTreeMap::new(),
            attachment_name: DEFAULT_ATTACHMENT_NAME.to_string(),
        }
    }
}
