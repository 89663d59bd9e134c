//! Spreadsheet errors

use thiserror::Error;

/// Result type for spreadsheet operations
pub type SheetResult<T> = Result<T, SheetError>;

/// Errors raised while reading or writing spreadsheets
#[derive(Error, Debug)]
pub enum SheetError {
    /// File could not be opened or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Workbook could not be parsed
    #[error("workbook error: {0}")]
    Workbook(String),

    /// CSV could not be parsed or written
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook could not be written
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// The workbook has no worksheet
    #[error("workbook has no worksheet")]
    NoWorksheet,

    /// The sheet has no header row
    #[error("sheet is empty")]
    Empty,

    /// File extension or format name is not supported
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Required columns were not found in the header row
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

impl From<calamine::Error> for SheetError {
    fn from(error: calamine::Error) -> Self {
        Self::Workbook(error.to_string())
    }
}

impl From<SheetError> for venue_core::Error {
    fn from(error: SheetError) -> Self {
        match error {
            SheetError::MissingColumns(columns) => {
                Self::validation("file", format!("missing required columns: {}", columns.join(", ")))
            }
            SheetError::UnsupportedFormat(format) => {
                Self::validation("format", format!("unsupported format: {format}"))
            }
            SheetError::Io(error) => Self::Io(error),
            other => Self::Spreadsheet(other.to_string()),
        }
    }
}
