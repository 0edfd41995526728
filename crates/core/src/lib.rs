pub mod classify;
pub mod money;
pub mod record;
pub mod selection;

pub use classify::{classify, Threshold, DEFAULT_THRESHOLD};
pub use money::Money;
pub use record::{RecordId, TransactionRecord};
pub use selection::{SelectionError, SelectionTracker, DEFAULT_SELECTED};
