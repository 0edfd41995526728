pub mod amount;
pub mod csv;
pub mod error;
pub mod normalize;
pub mod schema;
pub mod source;

pub use amount::{parse_amount, parse_amount_text};
pub use error::ImportError;
pub use normalize::{normalize_batch, BatchOutcome, FileFailure, Normalizer, Upload};
pub use schema::{ColumnSchema, Field};
pub use source::{read_path, read_upload, read_workbook, RawCell, RawRow, SourceFile};
