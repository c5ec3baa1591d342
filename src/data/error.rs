use thiserror::Error;

/// Per-file failure of the sweep pipeline. None of these abort a batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SweepError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Could not parse file: {0}")]
    ParseError(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Could not export file: {0}")]
    ExportError(String),
}

pub type Result<T> = std::result::Result<T, SweepError>;

impl From<csv::Error> for SweepError {
    fn from(err: csv::Error) -> Self {
        SweepError::ParseError(err.to_string())
    }
}

impl From<calamine::XlsxError> for SweepError {
    fn from(err: calamine::XlsxError) -> Self {
        SweepError::ParseError(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for SweepError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        SweepError::ExportError(err.to_string())
    }
}
