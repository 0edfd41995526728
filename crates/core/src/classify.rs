use serde::{Deserialize, Serialize};
use tracing::debug;

use super::money::Money;
use super::record::TransactionRecord;

/// Regulatory reporting threshold, in major currency units.
pub const DEFAULT_THRESHOLD: i64 = 30_000;

/// Exclusive lower bound: a record is observed when its amount is strictly
/// greater than this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Threshold(Money);

impl Default for Threshold {
    fn default() -> Self {
        Threshold(Money::from_major(DEFAULT_THRESHOLD))
    }
}

impl Threshold {
    pub fn new(amount: Money) -> Self {
        Threshold(amount)
    }

    pub fn amount(self) -> Money {
        self.0
    }

    /// Missing amounts never exceed the threshold.
    pub fn is_exceeded_by(self, record: &TransactionRecord) -> bool {
        matches!(record.amount, Some(amount) if amount > self.0)
    }
}

/// Returns the records whose amount exceeds `threshold`, in input order.
pub fn classify(records: &[TransactionRecord], threshold: Threshold) -> Vec<TransactionRecord> {
    let observed: Vec<TransactionRecord> = records
        .iter()
        .filter(|r| threshold.is_exceeded_by(r))
        .cloned()
        .collect();
    debug!(
        total = records.len(),
        observed = observed.len(),
        threshold = %threshold.amount(),
        "classified batch"
    );
    observed
}
