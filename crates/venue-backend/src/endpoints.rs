//! Client for the privileged REST endpoints
//!
//! User creation and deletion, corporate employee lists, spotlight cards and
//! home-screen hero offers are served by a separate API rather than the
//! table layer, because they touch the auth service.

use crate::error::{BackendError, BackendResult, ensure_success};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn};
use venue_core::config::EndpointsConfig;
use venue_core::serde_helpers::option_id;
use venue_core::types::{Employee, HomeHeroOffer, RecordId, Spotlight};

/// Namespace for deriving idempotency keys
const IDEMPOTENCY_NAMESPACE: uuid::Uuid = uuid::Uuid::from_u128(0x6f1c_2a7e_93d4_4b1a_9e55_0c8a_7d21_f3b6);

/// Account to create through `/api/auth/create-user`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    /// Login email
    pub email: String,
    /// Initial password; the endpoint generates one when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Display name
    pub name: String,
    /// Phone number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Role stored on the profile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Subscription plan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_plan: Option<String>,
    /// Owning corporate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corporate_id: Option<String>,
}

/// Account returned by the create-user endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedUser {
    /// Auth user id
    #[serde(default, alias = "user_id", deserialize_with = "option_id::deserialize")]
    pub id: Option<RecordId>,
    /// Login email
    #[serde(default)]
    pub email: String,
}

/// Per-user failure inside a bulk creation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkFailure {
    /// Email the failure belongs to, when the endpoint says
    #[serde(default)]
    pub email: Option<String>,
    /// Reason
    #[serde(default, alias = "error")]
    pub message: String,
}

/// Response of a bulk creation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkCreateResponse {
    /// Accounts created
    #[serde(default)]
    pub created: usize,
    /// Accounts that failed
    #[serde(default)]
    pub failed: usize,
    /// Created accounts
    #[serde(default)]
    pub users: Vec<CreatedUser>,
    /// Failures
    #[serde(default)]
    pub errors: Vec<BulkFailure>,
}

/// `Idempotency-Key` for a bulk creation: stable for the same corporate and email set
#[must_use]
pub fn idempotency_key<S: AsRef<str>>(corporate_id: &str, emails: &[S]) -> String {
    let mut emails: Vec<String> = emails
        .iter()
        .map(|e| e.as_ref().trim().to_lowercase())
        .collect();
    emails.sort();
    emails.dedup();
    let name = format!("{corporate_id}:{}", emails.join(","));
    uuid::Uuid::new_v5(&IDEMPOTENCY_NAMESPACE, name.as_bytes()).to_string()
}

/// Client for the `/api/...` endpoints
#[derive(Debug, Clone)]
pub struct EndpointsClient {
    http: Client,
    base_url: String,
    admin_key: Option<String>,
}

impl EndpointsClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot be built.
    pub fn new(config: &EndpointsConfig) -> BackendResult<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(BackendError::configuration("endpoints.base_url is empty"));
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .build()?;

        Ok(Self {
            http,
            base_url,
            admin_key: config.admin_key.clone().filter(|k| !k.is_empty()),
        })
    }

    /// Set the admin key sent as `x-admin-key`
    #[must_use]
    pub fn with_admin_key(mut self, admin_key: impl Into<String>) -> Self {
        self.admin_key = Some(admin_key.into());
        self
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut request = self
            .http
            .request(method, format!("{}/api/{path}", self.base_url));
        if let Some(ref admin_key) = self.admin_key {
            request = request.header("x-admin-key", admin_key);
        }
        request
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, operation: &str) -> BackendResult<T> {
        let response = ensure_success(request.send().await?, operation).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::decode(operation, e))
    }

    async fn send_empty(&self, request: RequestBuilder, operation: &str) -> BackendResult<()> {
        ensure_success(request.send().await?, operation).await?;
        Ok(())
    }

    /// Delete an auth user and its profile
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint rejects the request.
    pub async fn delete_user(&self, user_id: &str) -> BackendResult<()> {
        let request = self
            .request(Method::POST, "delete-user")
            .json(&json!({ "user_id": user_id }));
        self.send_empty(request, "delete user").await?;
        info!(user_id, "Deleted user account");
        Ok(())
    }

    /// Create one auth user with its profile
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint rejects the user.
    pub async fn create_user(&self, user: &NewUser) -> BackendResult<CreatedUser> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Reply {
            Wrapped { user: CreatedUser },
            Bare(CreatedUser),
        }

        let request = self.request(Method::POST, "auth/create-user").json(user);
        let created = match self.send::<Reply>(request, "create user").await? {
            Reply::Wrapped { user } | Reply::Bare(user) => user,
        };
        info!(email = %user.email, id = ?created.id, "Created user");
        Ok(created)
    }

    /// Create many auth users in one call
    ///
    /// The endpoint reports per-user results; a partial failure is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error only when the call itself fails.
    pub async fn create_users_bulk(
        &self,
        users: &[NewUser],
        idempotency_key: Option<&str>,
    ) -> BackendResult<BulkCreateResponse> {
        let mut request = self
            .request(Method::POST, "auth/create-user")
            .json(&json!({ "users": users }));
        if let Some(key) = idempotency_key {
            request = request.header("Idempotency-Key", key);
        }

        let response: BulkCreateResponse = self.send(request, "bulk create users").await?;
        if response.failed > 0 {
            warn!(
                created = response.created,
                failed = response.failed,
                "Bulk user creation partially failed"
            );
        } else {
            info!(created = response.created, "Bulk created users");
        }
        Ok(response)
    }

    /// Append employees to a corporate
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint rejects the request.
    pub async fn add_employees(&self, corporate_id: &str, employees: &[Employee]) -> BackendResult<()> {
        let request = self
            .request(Method::POST, &format!("corporates/{corporate_id}/employees"))
            .json(&json!({ "employees": employees }));
        self.send_empty(request, "add employees").await?;
        info!(corporate_id, count = employees.len(), "Added employees");
        Ok(())
    }

    /// Remove one employee from a corporate
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint rejects the request.
    pub async fn remove_employee(&self, corporate_id: &str, user_id: &str) -> BackendResult<()> {
        let request = self.request(
            Method::DELETE,
            &format!("corporates/{corporate_id}/employees/{user_id}"),
        );
        self.send_empty(request, "remove employee").await?;
        info!(corporate_id, user_id, "Removed employee");
        Ok(())
    }

    /// All spotlight cards
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn list_spotlights(&self) -> BackendResult<Vec<Spotlight>> {
        self.send(self.request(Method::GET, "spotlight"), "list spotlights")
            .await
    }

    /// Create a spotlight card
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint rejects the card.
    pub async fn create_spotlight(&self, spotlight: &Spotlight) -> BackendResult<Spotlight> {
        let request = self.request(Method::POST, "spotlight").json(spotlight);
        self.send(request, "create spotlight").await
    }

    /// Replace a spotlight card
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint rejects the card.
    pub async fn update_spotlight(&self, id: &str, spotlight: &Spotlight) -> BackendResult<Spotlight> {
        let request = self
            .request(Method::PUT, &format!("spotlight/{id}"))
            .json(spotlight);
        self.send(request, "update spotlight").await
    }

    /// Delete a spotlight card
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint rejects the request.
    pub async fn delete_spotlight(&self, id: &str) -> BackendResult<()> {
        let request = self.request(Method::DELETE, &format!("spotlight/{id}"));
        self.send_empty(request, "delete spotlight").await
    }

    /// Hero offers shown on the home screen
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn home_hero_offers(&self) -> BackendResult<Vec<HomeHeroOffer>> {
        self.send(self.request(Method::GET, "homeherooffers"), "list home hero offers")
            .await
    }
}
