//! One operator session: the state a UI drives between uploads.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};
use umbral_core::{classify, RecordId, SelectionTracker, TransactionRecord};
use umbral_import::{normalize_batch, FileFailure, Upload};
use umbral_report::{render_due_diligence, render_evidence, RenderedReport};
use umbral_submit::{RejectionClient, SubmissionReceipt};

use crate::config::AppConfig;
use crate::error::CommandError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    pub file: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadSummary {
    /// Records normalized across all readable files.
    pub records: usize,
    /// Records above the threshold.
    pub observed: usize,
    pub failures: Vec<FailedFile>,
}

pub struct Session {
    config: AppConfig,
    client: RejectionClient,
    tracker: SelectionTracker,
    failures: Vec<FileFailure>,
}

impl Session {
    pub fn new(config: AppConfig) -> Result<Self, CommandError> {
        let client = RejectionClient::new(config.rejection.clone())?;
        Ok(Self {
            config,
            client,
            tracker: SelectionTracker::default(),
            failures: Vec::new(),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Replaces the current batch, and with it every selection flag.
    pub fn upload(&mut self, uploads: impl IntoIterator<Item = Upload>) -> UploadSummary {
        let outcome = normalize_batch(uploads, &self.config.schema);
        let observed = classify(&outcome.records, self.config.threshold);

        let summary = UploadSummary {
            records: outcome.records.len(),
            observed: observed.len(),
            failures: outcome
                .failures
                .iter()
                .map(|f| FailedFile {
                    file: f.file.clone(),
                    message: f.error.to_string(),
                })
                .collect(),
        };
        info!(
            records = summary.records,
            observed = summary.observed,
            failed_files = summary.failures.len(),
            threshold = %self.config.threshold.amount(),
            "Batch uploaded"
        );

        self.tracker = SelectionTracker::new(observed);
        self.failures = outcome.failures;
        summary
    }

    pub fn classified(&self) -> &[TransactionRecord] {
        self.tracker.classified()
    }

    pub fn failures(&self) -> &[FileFailure] {
        &self.failures
    }

    /// Each classified record with its selection flag, in display order.
    pub fn rows(&self) -> impl Iterator<Item = (&TransactionRecord, bool)> {
        self.tracker.entries()
    }

    pub fn select(&mut self, id: RecordId, selected: bool) -> Result<(), CommandError> {
        Ok(self.tracker.select(id, selected)?)
    }

    pub fn toggle(&mut self, id: RecordId) -> Result<bool, CommandError> {
        Ok(self.tracker.toggle(id)?)
    }

    pub fn select_all(&mut self, selected: bool) {
        self.tracker.select_all(selected);
    }

    pub fn is_selected(&self, id: RecordId) -> Result<bool, CommandError> {
        Ok(self.tracker.is_selected(id)?)
    }

    pub fn selected(&self) -> Vec<&TransactionRecord> {
        self.tracker.selected_subset()
    }

    /// `None` while there is nothing to export.
    pub fn render_evidence(&self) -> Result<Option<RenderedReport>, CommandError> {
        self.render_evidence_on(today())
    }

    pub fn render_evidence_on(&self, date: NaiveDate) -> Result<Option<RenderedReport>, CommandError> {
        if self.tracker.is_empty() {
            return Ok(None);
        }
        Ok(Some(render_evidence(self.classified(), date)?))
    }

    /// `None` while there is nothing to export.
    pub fn render_due_diligence(&self) -> Result<Option<RenderedReport>, CommandError> {
        self.render_due_diligence_on(today())
    }

    pub fn render_due_diligence_on(
        &self,
        date: NaiveDate,
    ) -> Result<Option<RenderedReport>, CommandError> {
        if self.tracker.is_empty() {
            return Ok(None);
        }
        let report = render_due_diligence(&self.config.due_diligence, self.classified(), date)
            .inspect_err(|e| warn!(error = %e, "Due diligence render failed"))?;
        Ok(Some(report))
    }

    /// Sends the selected records for rejection. `None` when nothing is
    /// selected. Selection flags are left as they were whatever the outcome.
    pub fn submit_rejection(&self) -> Result<Option<SubmissionReceipt>, CommandError> {
        let selected = self.selected();
        if selected.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.client.submit(&selected)?))
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYOUT_CSV: &str = "DOCUMENTO,NUMERO_DOCUMENTO,NOMBRE,REFERENCIA,MONTO\n\
        RUC,20612550264,Motoservice SAC,253506686395,39500.90\n\
        DNI,00123456,Ana Quispe,X,5000\n\
        RUC,20598765432,Distribuidora Norte,253506686396,45000\n";

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.rejection.endpoint_url = "http://127.0.0.1:9/rechazos".to_string();
        config
    }

    fn session_with_batch() -> Session {
        let mut session = Session::new(config()).unwrap();
        session.upload([Upload::new("payout.csv", PAYOUT_CSV.as_bytes().to_vec())]);
        session
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    // ── construction ──────────────────────────────────────────────────────────

    #[test]
    fn unconfigured_endpoint_is_refused() {
        let err = Session::new(AppConfig::default()).err().unwrap();
        assert!(err.message.contains("Invalid rejection endpoint"));
    }

    // ── upload ────────────────────────────────────────────────────────────────

    #[test]
    fn upload_reports_counts() {
        let mut session = Session::new(config()).unwrap();
        let summary = session.upload([
            Upload::new("payout.csv", PAYOUT_CSV.as_bytes().to_vec()),
            Upload::new("notes.pdf", b"%PDF-1.4".to_vec()),
        ]);

        assert_eq!(summary.records, 3);
        assert_eq!(summary.observed, 2);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].file, "notes.pdf");
        assert_eq!(session.failures().len(), 1);

        let refs: Vec<_> = session.classified().iter().map(|r| r.reference.as_str()).collect();
        assert_eq!(refs, ["253506686395", "253506686396"]);
    }

    #[test]
    fn new_upload_discards_previous_selection() {
        let mut session = session_with_batch();
        session.select_all(true);
        assert_eq!(session.selected().len(), 2);

        session.upload([Upload::new("payout.csv", PAYOUT_CSV.as_bytes().to_vec())]);
        assert!(session.selected().is_empty());
        assert_eq!(session.classified().len(), 2);
    }

    // ── selection ─────────────────────────────────────────────────────────────

    #[test]
    fn records_start_unselected() {
        let session = session_with_batch();
        assert!(session.rows().all(|(_, selected)| !selected));
    }

    #[test]
    fn select_and_toggle_by_id() {
        let mut session = session_with_batch();
        let first = session.classified()[0].id;
        let second = session.classified()[1].id;

        session.select(first, true).unwrap();
        assert!(session.toggle(second).unwrap());
        assert!(!session.toggle(second).unwrap());

        let selected: Vec<_> = session.selected().iter().map(|r| r.id).collect();
        assert_eq!(selected, [first]);
        assert!(session.is_selected(first).unwrap());
    }

    #[test]
    fn unknown_id_is_an_error() {
        let mut session = session_with_batch();
        let err = session.select(RecordId(999), true).unwrap_err();
        assert!(err.message.contains("#999"));
    }

    // ── disabled outputs ──────────────────────────────────────────────────────

    #[test]
    fn nothing_to_render_or_submit_before_upload() {
        let session = Session::new(config()).unwrap();
        assert!(session.render_evidence_on(date()).unwrap().is_none());
        assert!(session.render_due_diligence_on(date()).unwrap().is_none());
        assert!(session.submit_rejection().unwrap().is_none());
    }

    #[test]
    fn nothing_selected_means_no_submission() {
        let session = session_with_batch();
        assert!(session.submit_rejection().unwrap().is_none());
    }

    #[test]
    fn evidence_export_covers_classified_set() {
        let session = session_with_batch();
        let report = session.render_evidence_on(date()).unwrap().unwrap();
        assert_eq!(report.file_name, "Evidencias_Clientes_Observados_16.10.26.xlsx");
        assert!(!report.bytes.is_empty());
    }
}
