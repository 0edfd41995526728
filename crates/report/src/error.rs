use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Due diligence template not found: {}", .0.display())]
    TemplateMissing(PathBuf),

    #[error("Cannot read template {}: {source}", path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("Template {} has no worksheets", .0.display())]
    EmptyTemplate(PathBuf),

    #[error("Spreadsheet writer error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}
