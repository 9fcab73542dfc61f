use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a single report.
///
/// Composite-field parse failures are not represented here: those records are
/// dropped from the paired series and counted instead.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("the file '{}' was not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("the file '{}' is empty", .0.display())]
    EmptyFile(PathBuf),

    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("there was a parsing error: {0}")]
    Malformed(#[from] csv::Error),

    #[error("row {row}: invalid {column} value '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("CSV file must contain columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },
}

impl ReportError {
    /// True for failures raised while reading the source file.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            ReportError::FileNotFound(_)
                | ReportError::EmptyFile(_)
                | ReportError::Io { .. }
                | ReportError::Malformed(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
