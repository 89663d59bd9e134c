//! Command implementations shared by the `venue-admin` binary and its tests

use crate::error::{CliError, Result};
use chrono::Utc;
use serde_json::Value;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use venue_backend::{
    BackendClient, BackendResult, DashboardStore, EndpointsClient, Provisioner, ProvisioningPlan,
    ProvisioningReport, Repository, SelectQuery,
};
use venue_core::pagination::PageWindow;
use venue_core::types::{
    Corporate, CronReport, DashboardKpis, Invoice, Lead, Offer, PromoCode, Record, Restaurant,
    Store, SubscriptionPlan, User,
};
use venue_core::utils::export_filename;
use venue_core::{Config, Table};
use venue_sheets::{ExportFormat, employee_drafts, export_records, read_rows};

/// Resolve a table from its REST name or its admin page name
///
/// # Errors
///
/// Returns [`CliError::UnknownTable`] for anything else.
pub fn parse_table(name: &str) -> Result<Table> {
    let name = name.trim().to_ascii_lowercase();
    let table = match name.as_str() {
        "corporates" => Some(Table::Corporate),
        "promo-codes" | "promo_codes" => Some(Table::Promos),
        "subscriptions" => Some(Table::Subscription),
        "invoices" => Some(Table::Invoice),
        "recycle-bin" => Some(Table::RecycleBin),
        "cron-reports" => Some(Table::CronReports),
        other => Table::from_name(other),
    };
    table.ok_or(CliError::UnknownTable(name))
}

async fn record_rows<T: Record>(
    client: &BackendClient,
    search: Option<&str>,
    batch_size: u32,
) -> BackendResult<Vec<Value>> {
    Repository::<T>::new(client.clone())
        .export_rows(search, batch_size)
        .await
}

/// Every row of `table` matching `search`, fetched `batch_size` at a time
///
/// # Errors
///
/// Returns an error if any page request fails.
pub async fn table_rows(
    client: &BackendClient,
    table: Table,
    search: Option<&str>,
    batch_size: u32,
) -> BackendResult<Vec<Value>> {
    match table {
        Table::Users => record_rows::<User>(client, search, batch_size).await,
        Table::Restaurants => record_rows::<Restaurant>(client, search, batch_size).await,
        Table::Stores => record_rows::<Store>(client, search, batch_size).await,
        Table::Corporate => record_rows::<Corporate>(client, search, batch_size).await,
        Table::Promos => record_rows::<PromoCode>(client, search, batch_size).await,
        Table::Subscription => record_rows::<SubscriptionPlan>(client, search, batch_size).await,
        Table::Offers => record_rows::<Offer>(client, search, batch_size).await,
        Table::Invoice => record_rows::<Invoice>(client, search, batch_size).await,
        Table::Leads => record_rows::<Lead>(client, search, batch_size).await,
        Table::CronReports => record_rows::<CronReport>(client, search, batch_size).await,
        Table::RecycleBin => {
            if search.is_some() {
                warn!("Search is ignored for the recycle bin");
            }
            let query = SelectQuery::page(PageWindow::request(1, batch_size)).order("deleted_at.desc");
            client.select_all(table, &query, batch_size).await
        }
    }
}

/// What an export wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// File written
    pub path: PathBuf,
    /// Rows in the file
    pub rows: usize,
}

/// Export format from the flag, else the configured default
///
/// # Errors
///
/// Returns an error for an unknown format name.
pub fn resolve_format(config: &Config, flag: Option<&str>) -> Result<ExportFormat> {
    Ok(flag.unwrap_or(config.export.format.as_str()).parse()?)
}

/// Download a table into a spreadsheet
///
/// Without `out`, the file lands in the working directory under a
/// timestamped name.
///
/// # Errors
///
/// Returns an error if the rows cannot be fetched or the file cannot be written.
pub async fn export_table(
    config: &Config,
    table: Table,
    format: ExportFormat,
    search: Option<&str>,
    out: Option<&Path>,
) -> Result<ExportSummary> {
    let client = BackendClient::new(&config.backend)?;
    let search = search.map(str::trim).filter(|s| !s.is_empty());
    let rows = table_rows(&client, table, search, config.export.batch_size).await?;
    let bytes = export_records(&rows, format)?;

    let path = out.map_or_else(
        || PathBuf::from(export_filename(table.name(), format.extension(), &Utc::now())),
        Path::to_path_buf,
    );
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?;

    info!(%table, rows = rows.len(), path = %path.display(), "Exported table");
    Ok(ExportSummary {
        path,
        rows: rows.len(),
    })
}

/// Result of an employee import
#[derive(Debug, Clone)]
pub enum ImportOutcome {
    /// Nothing was created
    DryRun(ProvisioningPlan),
    /// Accounts were created and attached
    Provisioned(ProvisioningReport),
}

/// Provision a corporate's employees from a spreadsheet on disk
///
/// # Errors
///
/// Returns an error if the sheet cannot be read, lacks required columns,
/// the batch overflows the corporate's seats, or a call fails.
pub async fn import_employees(
    config: &Config,
    corporate_id: &str,
    file: &Path,
    plan: Option<&str>,
    dry_run: bool,
) -> Result<ImportOutcome> {
    let path = file.to_path_buf();
    let drafts = tokio::task::spawn_blocking(move || read_rows(&path).and_then(|sheet| employee_drafts(&sheet)))
        .await
        .map_err(|e| CliError::configuration(format!("Reading {} failed: {e}", file.display())))??;
    if drafts.is_empty() {
        return Err(venue_core::Error::validation("file", "the sheet has no employee rows").into());
    }
    info!(corporate = corporate_id, rows = drafts.len(), dry_run, "Importing employees");

    let backend = BackendClient::new(&config.backend)?;
    let endpoints = EndpointsClient::new(&config.endpoints)?;
    let provisioner = Provisioner::new(backend, endpoints, &config.provisioning);

    if dry_run {
        let plan = provisioner.dry_run(corporate_id, &drafts, plan).await?;
        return Ok(ImportOutcome::DryRun(plan));
    }
    let report = provisioner.provision(corporate_id, &drafts, plan).await?;
    Ok(ImportOutcome::Provisioned(report))
}

/// Human-readable summary of an import
#[must_use]
pub fn render_import(outcome: &ImportOutcome) -> String {
    let mut out = String::new();
    let rejected = match outcome {
        ImportOutcome::DryRun(plan) => {
            let _ = writeln!(out, "Would create {} employee(s)", plan.to_create.len());
            for employee in &plan.to_create {
                let _ = writeln!(out, "  + {} <{}> ({})", employee.name, employee.email, employee.plan);
            }
            if let Some(seats) = plan.remaining_seats {
                let _ = writeln!(out, "Seats remaining: {seats}");
            }
            if !plan.fits_seats() {
                let _ = writeln!(out, "Batch does not fit in the remaining seats");
            }
            skipped_lines(&mut out, &plan.skipped);
            &plan.rejected
        }
        ImportOutcome::Provisioned(report) => {
            let _ = writeln!(out, "Created {} employee(s), {} failed", report.created, report.failed);
            for failure in &report.errors {
                let _ = writeln!(
                    out,
                    "  ! {}: {}",
                    failure.email.as_deref().unwrap_or("unknown"),
                    failure.message
                );
            }
            if let Some(error) = &report.attach_error {
                let _ = writeln!(out, "Created users were not added to the corporate: {error}");
            }
            if !report.unattached.is_empty() {
                let _ = writeln!(out, "Unattached users: {}", report.unattached.join(", "));
            }
            skipped_lines(&mut out, &report.skipped);
            &report.rejected
        }
    };
    for error in rejected {
        let _ = writeln!(out, "  x {error}");
    }
    out
}

fn skipped_lines(out: &mut String, skipped: &[String]) {
    if skipped.is_empty() {
        return;
    }
    let _ = writeln!(out, "Already on the account: {}", skipped.join(", "));
}

/// Fresh dashboard numbers
///
/// # Errors
///
/// Returns an error if any count fails.
pub async fn fetch_kpis(config: &Config) -> Result<DashboardKpis> {
    let client = BackendClient::new(&config.backend)?;
    Ok(DashboardStore::new().refresh(&client).await?)
}

/// Dashboard numbers as a two-column table
#[must_use]
pub fn render_kpis(kpis: &DashboardKpis) -> String {
    let rows = [
        ("Users", kpis.users),
        ("Restaurants", kpis.restaurants),
        ("Stores", kpis.stores),
        ("Corporates", kpis.corporates),
        ("Active promo codes", kpis.active_promo_codes),
        ("Subscriptions", kpis.subscriptions),
        ("Leads", kpis.leads),
    ];
    let mut out = String::new();
    for (label, value) in rows {
        let _ = writeln!(out, "{label:<20}{value:>8}");
    }
    out
}

const REDACTED: &str = "********";

/// Resolved configuration as TOML with keys masked
///
/// # Errors
///
/// Returns an error if the configuration cannot be serialized.
pub fn config_toml(config: &Config) -> Result<String> {
    let mut shown = config.clone();
    if !shown.backend.anon_key.is_empty() {
        shown.backend.anon_key = REDACTED.to_string();
    }
    if shown.backend.service_key.is_some() {
        shown.backend.service_key = Some(REDACTED.to_string());
    }
    if shown.endpoints.admin_key.is_some() {
        shown.endpoints.admin_key = Some(REDACTED.to_string());
    }
    toml::to_string_pretty(&shown)
        .map_err(|e| CliError::configuration(format!("Failed to serialize configuration: {e}")))
}

/// Problems that would stop the server or the commands from working
#[must_use]
pub fn config_problems(config: &Config) -> Vec<String> {
    let mut problems = Vec::new();
    if config.backend.url.trim().is_empty() {
        problems.push("backend.url is not set".to_string());
    }
    if config.backend.anon_key.trim().is_empty() {
        problems.push("backend.anon_key is not set".to_string());
    }
    if config.endpoints.base_url.trim().is_empty() {
        problems.push("endpoints.base_url is not set".to_string());
    }
    if config.pagination.default_limit > config.pagination.max_limit {
        problems.push("pagination.default_limit exceeds pagination.max_limit".to_string());
    }
    if config.export.batch_size == 0 {
        problems.push("export.batch_size must be positive".to_string());
    }
    if config.export.format.parse::<ExportFormat>().is_err() {
        problems.push(format!("export.format {} is not xlsx or csv", config.export.format));
    }
    problems
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("restaurants", Table::Restaurants)]
    #[case("promo-codes", Table::Promos)]
    #[case("promos", Table::Promos)]
    #[case("Corporates", Table::Corporate)]
    #[case("recycle_bin", Table::RecycleBin)]
    #[case("cron-reports", Table::CronReports)]
    fn test_parse_table(#[case] name: &str, #[case] expected: Table) {
        assert_eq!(parse_table(name).unwrap(), expected);
    }

    #[test]
    fn test_parse_table_unknown() {
        assert!(matches!(parse_table("menus"), Err(CliError::UnknownTable(name)) if name == "menus"));
    }

    #[test]
    fn test_render_kpis_aligns_columns() {
        let kpis = DashboardKpis {
            users: 1200,
            leads: 7,
            ..DashboardKpis::default()
        };
        let text = render_kpis(&kpis);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], format!("{:<20}{:>8}", "Users", 1200));
        assert!(lines.iter().all(|line| line.len() == 28));
    }

    #[test]
    fn test_config_toml_masks_keys() {
        let mut config = Config::default();
        config.backend.anon_key = "anon-secret".to_string();
        config.backend.service_key = Some("service-secret".to_string());
        config.endpoints.admin_key = Some("admin-secret".to_string());

        let text = config_toml(&config).unwrap();

        assert!(!text.contains("secret"));
        assert!(text.contains(REDACTED));
    }

    #[test]
    fn test_config_problems() {
        let mut config = Config::default();
        config.backend.url = "https://project.example.co".to_string();
        config.backend.anon_key = "anon".to_string();
        config.endpoints.base_url = "https://admin.example.co".to_string();
        assert_eq!(config_problems(&config), Vec::<String>::new());

        config.export.format = "pdf".to_string();
        config.export.batch_size = 0;
        assert_eq!(config_problems(&config).len(), 2);
    }

    #[test]
    fn test_resolve_format_prefers_flag() {
        let config = Config::default();
        assert_eq!(resolve_format(&config, Some("csv")).unwrap(), ExportFormat::Csv);
        assert_eq!(resolve_format(&config, None).unwrap(), ExportFormat::Xlsx);
        assert!(resolve_format(&config, Some("ods")).is_err());
    }

    #[test]
    fn test_render_import_names_unattached_users() {
        let report = ProvisioningReport {
            created: 1,
            unattached: vec!["u-a".to_string()],
            attach_error: Some("add employees returned 500: corporate locked".to_string()),
            ..ProvisioningReport::default()
        };

        let text = render_import(&ImportOutcome::Provisioned(report));

        assert!(text.starts_with("Created 1 employee(s), 0 failed"));
        assert!(text.contains("not added to the corporate: add employees returned 500"));
        assert!(text.contains("Unattached users: u-a"));
    }
}
