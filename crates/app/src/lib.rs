pub mod config;
pub mod error;
pub mod logging;
pub mod session;

pub use config::{AppConfig, ConfigError};
pub use error::CommandError;
pub use session::{FailedFile, Session, UploadSummary};

pub use umbral_core::{Money, RecordId, Threshold, TransactionRecord};
pub use umbral_import::Upload;
pub use umbral_report::RenderedReport;
pub use umbral_submit::SubmissionReceipt;
