//! Shared dashboard state

use crate::client::BackendClient;
use crate::error::BackendResult;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;
use venue_core::types::{AdminProfile, DashboardKpis, Table};

#[derive(Debug, Default)]
struct DashboardState {
    kpis: DashboardKpis,
    profile: Option<AdminProfile>,
    refreshed_at: Option<DateTime<Utc>>,
}

/// Cached dashboard numbers and the signed-in admin, cheap to clone
#[derive(Debug, Clone, Default)]
pub struct DashboardStore {
    inner: Arc<RwLock<DashboardState>>,
}

impl DashboardStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current KPIs
    #[must_use]
    pub fn kpis(&self) -> DashboardKpis {
        self.inner.read().kpis
    }

    /// When the KPIs were last recomputed
    #[must_use]
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.inner.read().refreshed_at
    }

    /// Signed-in administrator
    #[must_use]
    pub fn profile(&self) -> Option<AdminProfile> {
        self.inner.read().profile.clone()
    }

    /// Replace the signed-in administrator
    pub fn set_profile(&self, profile: Option<AdminProfile>) {
        self.inner.write().profile = profile;
    }

    /// Replace the KPIs
    pub fn set_kpis(&self, kpis: DashboardKpis) {
        let mut state = self.inner.write();
        state.kpis = kpis;
        state.refreshed_at = Some(Utc::now());
    }

    /// Recompute every KPI with count queries
    ///
    /// The cached values are left untouched when any count fails.
    ///
    /// # Errors
    ///
    /// Returns the first failing count.
    pub async fn refresh(&self, client: &BackendClient) -> BackendResult<DashboardKpis> {
        let (users, restaurants, stores, corporates, active_promo_codes, subscriptions, leads) = tokio::try_join!(
            client.count(Table::Users, &[]),
            client.count(Table::Restaurants, &[]),
            client.count(Table::Stores, &[]),
            client.count(Table::Corporate, &[]),
            client.count(Table::Promos, &[("is_active", "eq.true")]),
            client.count(Table::Subscription, &[]),
            client.count(Table::Leads, &[]),
        )?;

        let kpis = DashboardKpis {
            users,
            restaurants,
            stores,
            corporates,
            active_promo_codes,
            subscriptions,
            leads,
        };
        self.set_kpis(kpis);
        info!(?kpis, "Dashboard refreshed");
        Ok(kpis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clones_share_state() {
        let store = DashboardStore::new();
        let other = store.clone();
        assert!(store.refreshed_at().is_none());

        other.set_kpis(DashboardKpis {
            users: 12,
            ..DashboardKpis::default()
        });
        other.set_profile(Some(AdminProfile {
            id: "a1".to_string(),
            name: "Root".to_string(),
            email: "root@venue.test".to_string(),
            role: Some("super_admin".to_string()),
        }));

        assert_eq!(store.kpis().users, 12);
        assert!(store.refreshed_at().is_some());
        assert_eq!(store.profile().map(|p| p.id), Some("a1".to_string()));

        store.set_profile(None);
        assert!(other.profile().is_none());
    }
}
