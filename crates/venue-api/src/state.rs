//! Application state management

use std::sync::Arc;
use venue_backend::{BackendClient, DashboardStore, EndpointsClient, Provisioner, Repository};
use venue_core::{Config, Record, context_error, context_error::Result};
use venue_sheets::ExportFormat;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Table client for the backend
    pub backend: BackendClient,
    /// Privileged REST endpoints
    pub endpoints: EndpointsClient,
    /// Employee and corporate provisioning
    pub provisioner: Provisioner,
    /// Cached dashboard numbers
    pub dashboard: DashboardStore,
}

impl AppState {
    /// Create new application state
    ///
    /// # Errors
    ///
    /// Returns an error if either client cannot be built from the configuration.
    pub fn new(config: Config) -> Result<Self> {
        let backend = BackendClient::new(&config.backend)
            .map_err(|e| context_error!("Invalid backend configuration: {}", e))?;
        let endpoints = EndpointsClient::new(&config.endpoints)
            .map_err(|e| context_error!("Invalid endpoints configuration: {}", e))?;
        let provisioner = Provisioner::new(backend.clone(), endpoints.clone(), &config.provisioning);

        Ok(Self {
            config,
            backend,
            endpoints,
            provisioner,
            dashboard: DashboardStore::new(),
        })
    }

    /// Wrap in an `Arc` for the router
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Typed access to the table behind `T`
    #[must_use]
    pub fn repository<T: Record>(&self) -> Repository<T> {
        Repository::new(self.backend.clone())
    }

    /// Export format used when a request names none
    #[must_use]
    pub fn default_export_format(&self) -> ExportFormat {
        self.config.export.format.parse().unwrap_or_default()
    }

    /// Check if the application is properly configured
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn validate(&self) -> Result<()> {
        if self.config.pagination.default_limit > self.config.pagination.max_limit {
            return Err(context_error!(
                "pagination.default_limit ({}) exceeds pagination.max_limit ({})",
                self.config.pagination.default_limit,
                self.config.pagination.max_limit
            ));
        }
        if self.config.export.format.parse::<ExportFormat>().is_err() {
            return Err(context_error!(
                "Unknown export format: {}",
                self.config.export.format
            ));
        }
        if self.config.export.batch_size == 0 {
            return Err(context_error!("export.batch_size must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.backend.url = "http://127.0.0.1:54321".to_string();
        config.backend.anon_key = "anon".to_string();
        config.endpoints.base_url = "http://127.0.0.1:3000".to_string();
        config
    }

    #[test]
    fn test_state_from_config() {
        let state = AppState::new(test_config()).unwrap();
        assert_eq!(state.backend.base_url(), "http://127.0.0.1:54321");
        assert_eq!(state.default_export_format(), ExportFormat::Xlsx);
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_missing_endpoints_url_is_rejected() {
        let mut config = test_config();
        config.endpoints.base_url = String::new();
        let error = AppState::new(config).unwrap_err();
        assert!(error.to_string().contains("endpoints"));
    }

    #[test]
    fn test_validate_catches_inverted_limits() {
        let mut config = test_config();
        config.pagination.default_limit = 500;
        config.pagination.max_limit = 100;
        let state = AppState::new(config).unwrap();
        assert!(state.validate().is_err());
    }

    #[test]
    fn test_validate_catches_unknown_export_format() {
        let mut config = test_config();
        config.export.format = "pdf".to_string();
        let state = AppState::new(config).unwrap();
        assert!(state.validate().is_err());
        assert_eq!(state.default_export_format(), ExportFormat::Xlsx);
    }
}
