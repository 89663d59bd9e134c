//! Backend access for the venue admin console
//!
//! [`BackendClient`] speaks to the backend's table API and storage,
//! [`EndpointsClient`] to the privileged `/api/...` endpoints. Everything else
//! is built on those two.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod client;
pub mod dashboard;
pub mod endpoints;
pub mod error;
pub mod provisioning;
pub mod repository;
pub mod search;

pub use client::{BackendClient, SelectQuery};
pub use dashboard::DashboardStore;
pub use endpoints::EndpointsClient;
pub use error::{BackendError, BackendResult};
pub use provisioning::{Provisioner, ProvisioningPlan, ProvisioningReport};
pub use repository::Repository;
pub use search::SearchDebouncer;
