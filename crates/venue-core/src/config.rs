//! Configuration management for venue-admin

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Admin API server configuration
    pub server: ServerConfig,

    /// Backend-as-a-service configuration
    pub backend: BackendConfig,

    /// Privileged REST endpoint configuration
    pub endpoints: EndpointsConfig,

    /// Pagination defaults
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Search input behaviour
    #[serde(default)]
    pub search: SearchConfig,

    /// Employee provisioning rules
    #[serde(default)]
    pub provisioning: ProvisioningConfig,

    /// Spreadsheet export defaults
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum accepted upload size in bytes (spreadsheet imports)
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: usize,

    /// CORS allowed origins
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

/// Backend-as-a-service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,

    /// Public (anon) key sent as `apikey`
    #[serde(default)]
    pub anon_key: String,

    /// Service key used as bearer token when present
    #[serde(default)]
    pub service_key: Option<String>,

    /// Database schema exposed by the REST layer
    #[serde(default = "default_schema")]
    pub schema: String,

    /// Storage bucket for uploaded images and documents
    #[serde(default = "default_bucket")]
    pub storage_bucket: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub timeout_seconds: u64,
}

/// Privileged REST endpoints (user creation, provisioning, spotlight)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Base URL of the API exposing `/api/...`
    pub base_url: String,

    /// Admin key sent as `x-admin-key`
    #[serde(default)]
    pub admin_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub timeout_seconds: u64,
}

/// Pagination defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Rows per page when the request does not say
    #[serde(default = "default_page_limit")]
    pub default_limit: u32,

    /// Upper bound on rows per page
    #[serde(default = "default_max_page_limit")]
    pub max_limit: u32,
}

/// Search input behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Debounce delay applied to search input, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

/// Employee provisioning rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningConfig {
    /// Minimum password length for new employee accounts
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,

    /// Plan used when neither the row nor the request names one
    #[serde(default)]
    pub default_plan: Option<String>,

    /// Copy rows into `recycle_bin` before deleting them
    #[serde(default = "default_recycle_on_delete")]
    pub recycle_on_delete: bool,
}

/// Spreadsheet export defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Default export format (`xlsx` or `csv`)
    #[serde(default = "default_export_format")]
    pub format: String,

    /// Directory the CLI writes exports to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Rows fetched per request while exporting a whole table
    #[serde(default = "default_export_batch")]
    pub batch_size: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or text)
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Log to file
    #[serde(default)]
    pub file: Option<PathBuf>,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8080
}

const fn default_max_upload_size() -> usize {
    10 * 1024 * 1024
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_schema() -> String {
    "public".to_string()
}

fn default_bucket() -> String {
    "images".to_string()
}

const fn default_request_timeout() -> u64 {
    30
}

const fn default_page_limit() -> u32 {
    10
}

const fn default_max_page_limit() -> u32 {
    100
}

const fn default_debounce_ms() -> u64 {
    500
}

const fn default_min_password_length() -> usize {
    6
}

const fn default_recycle_on_delete() -> bool {
    true
}

fn default_export_format() -> String {
    "xlsx".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("exports")
}

const fn default_export_batch() -> u32 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_page_limit(),
            max_limit: default_max_page_limit(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            min_password_length: default_min_password_length(),
            default_plan: None,
            recycle_on_delete: default_recycle_on_delete(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: default_export_format(),
            output_dir: default_output_dir(),
            batch_size: default_export_batch(),
        }
    }
}

impl SearchConfig {
    /// Get debounce delay as Duration
    #[must_use]
    pub const fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl PaginationConfig {
    /// Requested page size, defaulted and capped
    #[must_use]
    pub fn effective_limit(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit.max(1))
    }
}

impl Config {
    /// Load configuration from `config.*` in the working directory and
    /// `VENUE_*` environment variables (`VENUE_SERVER__PORT=9000`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or parsed.
    pub fn load() -> crate::Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, optionally from an explicit file
    ///
    /// Values already present in [`Config::default`] act as the base layer,
    /// so a file only needs the keys it changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a value has the wrong type.
    pub fn load_from(path: Option<&Path>) -> crate::Result<Self> {
        let defaults = config::Config::try_from(&Self::default()).map_err(|e| {
            crate::Error::Configuration {
                message: e.to_string(),
            }
        })?;

        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let config = config::Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("VENUE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| crate::Error::Configuration {
                message: e.to_string(),
            })?;

        config
            .try_deserialize()
            .map_err(|e| crate::Error::Configuration {
                message: e.to_string(),
            })
    }

    /// Socket address string the admin server binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_size: default_max_upload_size(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        // Fall back to the variable names the hosted backend's tooling uses
        Self {
            url: std::env::var("VENUE_BACKEND_URL")
                .or_else(|_| std::env::var("SUPABASE_URL"))
                .unwrap_or_else(|_| "http://localhost:54321".to_string()),
            anon_key: std::env::var("SUPABASE_ANON_KEY").unwrap_or_default(),
            service_key: std::env::var("SUPABASE_SERVICE_ROLE_KEY").ok(),
            schema: default_schema(),
            storage_bucket: default_bucket(),
            timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("VENUE_API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            admin_key: std::env::var("VENUE_ADMIN_KEY").ok(),
            timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            backend: BackendConfig::default(),
            endpoints: EndpointsConfig::default(),
            pagination: PaginationConfig::default(),
            search: SearchConfig::default(),
            provisioning: ProvisioningConfig::default(),
            export: ExportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
