pub mod cell;
pub mod due_diligence;
pub mod error;
pub mod evidence;

pub use cell::{CellRef, InvalidCellRef};
pub use due_diligence::{render_due_diligence, TemplateLayout};
pub use error::ReportError;
pub use evidence::render_evidence;

use chrono::NaiveDate;

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// An in-memory xlsx document ready to be downloaded or attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// `Prefix_dd.mm.yy.xlsx`
pub fn dated_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}_{}.xlsx", date.format("%d.%m.%y"))
}
