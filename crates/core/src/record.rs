use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Position of a record within one upload batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One payout row after positional mapping.
///
/// `document_number` and `reference` are identifiers, not quantities: they
/// are kept exactly as the source spelled them, leading zeros included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: RecordId,
    /// Identity document class, e.g. `RUC` or `DNI`.
    pub document_type: String,
    pub document_number: String,
    pub holder_name: String,
    pub reference: String,
    /// `None` when the source cell could not be read as an amount.
    pub amount: Option<Money>,
    pub source_file: String,
}
