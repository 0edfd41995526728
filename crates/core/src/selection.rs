use std::collections::HashMap;
use thiserror::Error;

use super::record::{RecordId, TransactionRecord};

/// Records start unselected; the operator opts each one in.
pub const DEFAULT_SELECTED: bool = false;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Record {0} is not in the observed set")]
    UnknownRecord(RecordId),
}

/// Per-record inclusion flags over one classified set.
///
/// The tracker owns the records it tracks, so a selected record is always a
/// member of the classified set it was built from.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    records: Vec<TransactionRecord>,
    flags: Vec<bool>,
    positions: HashMap<RecordId, usize>,
}

impl SelectionTracker {
    pub fn new(classified: Vec<TransactionRecord>) -> Self {
        let positions = classified
            .iter()
            .enumerate()
            .map(|(pos, r)| (r.id, pos))
            .collect();
        let flags = vec![DEFAULT_SELECTED; classified.len()];
        Self {
            records: classified,
            flags,
            positions,
        }
    }

    pub fn select(&mut self, id: RecordId, selected: bool) -> Result<(), SelectionError> {
        let pos = self.position(id)?;
        self.flags[pos] = selected;
        Ok(())
    }

    /// Flips the flag and returns its new value.
    pub fn toggle(&mut self, id: RecordId) -> Result<bool, SelectionError> {
        let pos = self.position(id)?;
        self.flags[pos] = !self.flags[pos];
        Ok(self.flags[pos])
    }

    pub fn select_all(&mut self, selected: bool) {
        self.flags.iter_mut().for_each(|f| *f = selected);
    }

    pub fn is_selected(&self, id: RecordId) -> Result<bool, SelectionError> {
        self.position(id).map(|pos| self.flags[pos])
    }

    /// Selected records, in classified order.
    pub fn selected_subset(&self) -> Vec<&TransactionRecord> {
        self.entries()
            .filter_map(|(record, selected)| selected.then_some(record))
            .collect()
    }

    /// Every tracked record paired with its flag, in classified order.
    pub fn entries(&self) -> impl Iterator<Item = (&TransactionRecord, bool)> {
        self.records.iter().zip(self.flags.iter().copied())
    }

    pub fn classified(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn selected_count(&self) -> usize {
        self.flags.iter().filter(|f| **f).count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, id: RecordId) -> Result<usize, SelectionError> {
        self.positions
            .get(&id)
            .copied()
            .ok_or(SelectionError::UnknownRecord(id))
    }
}
