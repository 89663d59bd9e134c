//! Spreadsheet import and export for the venue admin console
//!
//! Imports read the first worksheet of an xlsx/xls workbook, or a CSV file,
//! into [`SheetRows`]. Exports turn JSON rows into xlsx or CSV bytes.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod error;
pub mod format;
pub mod reader;
pub mod writer;

pub use error::{SheetError, SheetResult};
pub use format::{ExportFormat, SheetFormat};
pub use reader::{SheetRow, SheetRows, employee_drafts, read_rows, read_rows_from_bytes};
pub use writer::{MAX_CELL_CHARS, TRUNCATION_MARKER, export_dashboard, export_records};
