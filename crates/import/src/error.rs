use thiserror::Error;

use crate::schema::Field;

/// Reasons a single source file contributes no records.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("Workbook has no worksheets")]
    NoWorksheet,
    #[error("Unsupported file type: '{0}'")]
    UnsupportedFormat(String),
    #[error("Row {line}: schema needs {required} columns, found {found}")]
    ColumnOutOfRange {
        line: usize,
        required: usize,
        found: usize,
    },
    #[error("Column {column} ({field}): expected header '{expected}', found '{found}'")]
    HeaderMismatch {
        field: Field,
        column: usize,
        expected: String,
        found: String,
    },
    #[error("Header row {0} not found before data")]
    MissingHeader(usize),
}
