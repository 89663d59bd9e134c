//! Command line tools for the venue admin console
//!
//! Table exports, spreadsheet employee imports and dashboard numbers without
//! going through the HTTP server.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod commands;
pub mod error;

pub use commands::{
    ExportSummary, ImportOutcome, config_problems, config_toml, export_table, fetch_kpis,
    import_employees, parse_table, render_import, render_kpis, resolve_format, table_rows,
};
pub use error::{CliError, Result};
