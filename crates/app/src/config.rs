use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use umbral_core::Threshold;
use umbral_import::ColumnSchema;
use umbral_report::TemplateLayout;
use umbral_submit::RejectionConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Everything the pipeline needs, read once at startup.
///
/// ```toml
/// threshold = 30000
///
/// [schema]
/// name = "payout"
/// version = 1
///
/// [due_diligence]
/// template_path = "plantillas/Formato_Due_Diligence_Template.xlsx"
/// table_origin = "A13"
///
/// [rejection]
/// endpoint_url = "https://api.example.com/rechazos"
/// rejection_code = "R01"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub threshold: Threshold,
    pub schema: ColumnSchema,
    pub due_diligence: TemplateLayout,
    pub rejection: RejectionConfig,
}

impl AppConfig {
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        info!(
            path = %path.display(),
            threshold = %config.threshold.amount(),
            schema = %config.schema,
            "Loaded configuration"
        );
        Ok(config)
    }
}
