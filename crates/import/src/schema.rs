use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ImportError;
use crate::source::RawRow;

/// The record fields a schema maps from source columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    DocumentType,
    DocumentNumber,
    HolderName,
    Reference,
    Amount,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::DocumentType => write!(f, "document_type"),
            Field::DocumentNumber => write!(f, "document_number"),
            Field::HolderName => write!(f, "holder_name"),
            Field::Reference => write!(f, "reference"),
            Field::Amount => write!(f, "amount"),
        }
    }
}

/// Fixed positional layout of a payout export, identified by name and
/// version so a mapping failure points at the layout that was assumed.
///
/// Column indices are 0-based and absolute (column A is 0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSchema {
    pub name: String,
    pub version: u32,
    /// Rows at the top of the sheet that are not data.
    pub header_rows: usize,
    pub document_type: usize,
    pub document_number: usize,
    pub holder_name: usize,
    pub reference: usize,
    pub amount: usize,
    /// Labels the last header row must carry, in field order. Empty disables
    /// the check.
    pub expected_headers: Vec<String>,
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self {
            name: "payout".to_string(),
            version: 1,
            header_rows: 1,
            document_type: 0,
            document_number: 1,
            holder_name: 2,
            reference: 3,
            amount: 4,
            expected_headers: ["DOCUMENTO", "NUMERO_DOCUMENTO", "NOMBRE", "REFERENCIA", "MONTO"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl fmt::Display for ColumnSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{}", self.name, self.version)
    }
}

impl ColumnSchema {
    pub fn columns(&self) -> [(Field, usize); 5] {
        [
            (Field::DocumentType, self.document_type),
            (Field::DocumentNumber, self.document_number),
            (Field::HolderName, self.holder_name),
            (Field::Reference, self.reference),
            (Field::Amount, self.amount),
        ]
    }

    pub fn required_width(&self) -> usize {
        self.columns()
            .iter()
            .map(|(_, col)| col + 1)
            .max()
            .unwrap_or_default()
    }

    pub fn expects_header(&self) -> bool {
        self.header_rows > 0 && !self.expected_headers.is_empty()
    }

    /// True when every mapped cell of the row is empty.
    pub fn is_blank(&self, row: &RawRow) -> bool {
        self.columns()
            .iter()
            .all(|(_, col)| row.cell(*col).map_or(true, |c| c.is_empty()))
    }

    pub fn check_width(&self, row: &RawRow) -> Result<(), ImportError> {
        let required = self.required_width();
        if row.width() < required {
            return Err(ImportError::ColumnOutOfRange {
                line: row.line,
                required,
                found: row.width(),
            });
        }
        Ok(())
    }

    /// Compares the header row's labels at the mapped positions against
    /// `expected_headers`, ignoring case and surrounding whitespace.
    pub fn verify_header(&self, row: &RawRow) -> Result<(), ImportError> {
        for ((field, column), expected) in self.columns().iter().zip(&self.expected_headers) {
            let found = row.cell(*column).map(|c| c.to_text()).unwrap_or_default();
            if !found.trim().eq_ignore_ascii_case(expected.trim()) {
                return Err(ImportError::HeaderMismatch {
                    field: *field,
                    column: *column,
                    expected: expected.clone(),
                    found: found.trim().to_string(),
                });
            }
        }
        Ok(())
    }
}
