pub mod client;
pub mod config;
pub mod error;
pub mod payload;

pub use client::{RejectionClient, SubmissionReceipt};
pub use config::RejectionConfig;
pub use error::SubmitError;
pub use payload::{build_rows, to_xlsx, RejectionRow};
