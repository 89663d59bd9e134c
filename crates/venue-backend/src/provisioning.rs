//! Corporate employee provisioning
//!
//! Bulk provisioning is two sequential calls: create the auth users, then
//! append the created users to the corporate's employee list. Nothing is
//! rolled back if the second call fails; the report says what happened.

use crate::client::BackendClient;
use crate::endpoints::{BulkFailure, CreatedUser, EndpointsClient, NewUser, idempotency_key};
use crate::error::BackendResult;
use crate::repository::Repository;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};
use validator::Validate;
use venue_core::config::ProvisioningConfig;
use venue_core::employees::{EmployeeDraft, RowError, ValidEmployee, validate_batch};
use venue_core::types::{Corporate, Employee};

/// Role stored on accounts created for corporate employees
pub const EMPLOYEE_ROLE: &str = "corporate_employee";

/// Role stored on the corporate admin login
pub const CORPORATE_ROLE: &str = "corporate";

/// What a batch would do, worked out without any network call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningPlan {
    /// Rows that will be created
    pub to_create: Vec<ValidEmployee>,
    /// Emails already on the corporate
    pub skipped: Vec<String>,
    /// Rows that failed validation
    pub rejected: Vec<RowError>,
    /// Free seats before the batch, `None` when unlimited
    pub remaining_seats: Option<usize>,
}

impl ProvisioningPlan {
    /// Whether the batch fits in the remaining seats
    #[must_use]
    pub fn fits_seats(&self) -> bool {
        self.remaining_seats
            .is_none_or(|available| self.to_create.len() <= available)
    }
}

/// Outcome of a bulk provisioning run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningReport {
    /// Accounts the endpoint created
    pub created: usize,
    /// Accounts the endpoint failed to create
    pub failed: usize,
    /// Emails already on the corporate
    pub skipped: Vec<String>,
    /// Rows rejected before any call
    pub rejected: Vec<RowError>,
    /// Per-user failures reported by the endpoint
    pub errors: Vec<BulkFailure>,
    /// Created users left off the corporate's employee list, by id or email
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unattached: Vec<String>,
    /// Why appending the created users to the corporate failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attach_error: Option<String>,
}

/// Work out which rows of a batch to create for `corporate`
#[must_use]
pub fn plan_batch(
    corporate: &Corporate,
    drafts: &[EmployeeDraft],
    default_plan: Option<&str>,
    min_password: usize,
) -> ProvisioningPlan {
    let validation = validate_batch(drafts, default_plan, min_password);
    let (skipped, to_create): (Vec<_>, Vec<_>) = validation
        .accepted
        .into_iter()
        .partition(|employee| corporate.has_employee_email(&employee.email));

    ProvisioningPlan {
        to_create,
        skipped: skipped.into_iter().map(|e| e.email).collect(),
        rejected: validation.rejected,
        remaining_seats: corporate.remaining_seats(),
    }
}

fn new_user(employee: &ValidEmployee, corporate_id: &str) -> NewUser {
    NewUser {
        email: employee.email.clone(),
        password: employee.password.clone(),
        name: employee.name.clone(),
        phone: Some(employee.phone.clone()),
        role: Some(EMPLOYEE_ROLE.to_string()),
        subscription_plan: Some(employee.plan.clone()),
        corporate_id: Some(corporate_id.to_string()),
    }
}

/// Runs provisioning against the backend and the REST endpoints
#[derive(Debug, Clone)]
pub struct Provisioner {
    corporates: Repository<Corporate>,
    endpoints: EndpointsClient,
    min_password: usize,
    default_plan: Option<String>,
}

impl Provisioner {
    /// Create a provisioner
    #[must_use]
    pub fn new(backend: BackendClient, endpoints: EndpointsClient, config: &ProvisioningConfig) -> Self {
        Self {
            corporates: Repository::new(backend),
            endpoints,
            min_password: config.min_password_length,
            default_plan: config.default_plan.clone(),
        }
    }

    /// Plan used when the request names none: the corporate's, else the configured default
    fn fallback_plan<'a>(&'a self, corporate: &'a Corporate, requested: Option<&'a str>) -> Option<&'a str> {
        requested
            .filter(|p| !p.trim().is_empty())
            .or(corporate.subscription_plan.as_deref())
            .or(self.default_plan.as_deref())
    }

    /// Plan a batch against the stored corporate without creating anything
    ///
    /// # Errors
    ///
    /// Returns an error if the corporate cannot be fetched.
    pub async fn dry_run(
        &self,
        corporate_id: &str,
        drafts: &[EmployeeDraft],
        default_plan: Option<&str>,
    ) -> BackendResult<ProvisioningPlan> {
        let corporate = self.corporates.get(corporate_id).await?;
        let plan = self.fallback_plan(&corporate, default_plan);
        Ok(plan_batch(&corporate, drafts, plan, self.min_password))
    }

    /// Validate, create and attach a batch of employees
    ///
    /// # Errors
    ///
    /// Returns [`venue_core::Error::SeatLimitExceeded`] before any call when
    /// the batch does not fit, or the failure of the create call. A failed
    /// append after users were created is reported in
    /// [`ProvisioningReport::attach_error`] alongside the created counts.
    pub async fn provision(
        &self,
        corporate_id: &str,
        drafts: &[EmployeeDraft],
        default_plan: Option<&str>,
    ) -> BackendResult<ProvisioningReport> {
        let corporate = self.corporates.get(corporate_id).await?;
        let fallback = self.fallback_plan(&corporate, default_plan);
        let plan = plan_batch(&corporate, drafts, fallback, self.min_password);

        if !plan.fits_seats() {
            return Err(venue_core::Error::SeatLimitExceeded {
                requested: plan.to_create.len(),
                available: plan.remaining_seats.unwrap_or_default(),
            }
            .into());
        }

        let mut report = ProvisioningReport {
            skipped: plan.skipped,
            rejected: plan.rejected,
            ..ProvisioningReport::default()
        };
        if plan.to_create.is_empty() {
            info!(corporate_id, "Nothing to provision");
            return Ok(report);
        }

        let users: Vec<NewUser> = plan
            .to_create
            .iter()
            .map(|employee| new_user(employee, corporate_id))
            .collect();
        let key = idempotency_key(corporate_id, &users.iter().map(|u| u.email.as_str()).collect::<Vec<_>>());
        let response = self.endpoints.create_users_bulk(&users, Some(&key)).await?;

        report.created = response.created;
        report.failed = response.failed;
        report.errors = response.errors;

        let (employees, unmatched) = match_created(&plan.to_create, &response.users);
        if !unmatched.is_empty() {
            warn!(corporate_id, users = ?unmatched, "Created users match no submitted row");
            report.unattached = unmatched;
        }
        if !employees.is_empty()
            && let Err(error) = self.endpoints.add_employees(corporate_id, &employees).await
        {
            let orphaned: Vec<String> = employees.iter().map(user_label).collect();
            warn!(corporate_id, users = ?orphaned, %error, "Created users were not added to the corporate");
            report.unattached.extend(orphaned);
            report.attach_error = Some(error.to_string());
        }
        info!(
            corporate_id,
            created = report.created,
            failed = report.failed,
            skipped = report.skipped.len(),
            rejected = report.rejected.len(),
            "Provisioned employees"
        );
        Ok(report)
    }

    /// Create and attach a single employee
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid row or an email already on
    /// the corporate, a seat error when the corporate is full, or the failure
    /// of either call.
    pub async fn add_employee(
        &self,
        corporate_id: &str,
        draft: &EmployeeDraft,
        default_plan: Option<&str>,
    ) -> BackendResult<Employee> {
        let corporate = self.corporates.get(corporate_id).await?;
        let fallback = self.fallback_plan(&corporate, default_plan);
        let plan = plan_batch(&corporate, std::slice::from_ref(draft), fallback, self.min_password);

        if let Some(error) = plan.rejected.first() {
            return Err(venue_core::Error::validation(&error.field, &error.message).into());
        }
        if let Some(email) = plan.skipped.first() {
            return Err(venue_core::Error::validation("email", format!("{email} is already an employee")).into());
        }
        if !plan.fits_seats() {
            return Err(venue_core::Error::SeatLimitExceeded {
                requested: 1,
                available: plan.remaining_seats.unwrap_or_default(),
            }
            .into());
        }

        let Some(valid) = plan.to_create.first() else {
            return Err(venue_core::Error::validation("employee", "row was not accepted").into());
        };
        let created = self.endpoints.create_user(&new_user(valid, corporate_id)).await?;
        let employee = valid.to_employee(created.id);
        self.endpoints
            .add_employees(corporate_id, std::slice::from_ref(&employee))
            .await?;
        Ok(employee)
    }

    /// Detach an employee from a corporate
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint rejects the request.
    pub async fn remove_employee(&self, corporate_id: &str, user_id: &str) -> BackendResult<()> {
        self.endpoints.remove_employee(corporate_id, user_id).await
    }

    /// Create the corporate admin login, then the corporate row pointing at it
    ///
    /// # Errors
    ///
    /// Returns a validation error before any call, or the failure of either
    /// step. A failed insert leaves the login in place.
    pub async fn create_corporate(&self, corporate: &Corporate, password: Option<&str>) -> BackendResult<Corporate> {
        corporate.validate()?;
        if let Some(password) = password
            && password.chars().count() < self.min_password
        {
            return Err(venue_core::Error::validation(
                "password",
                format!("password must be at least {} characters", self.min_password),
            )
            .into());
        }

        let login = self
            .endpoints
            .create_user(&NewUser {
                email: corporate.email.trim().to_lowercase(),
                password: password.map(String::from),
                name: corporate.name.clone(),
                phone: corporate.phone.clone(),
                role: Some(CORPORATE_ROLE.to_string()),
                subscription_plan: corporate.subscription_plan.clone(),
                corporate_id: None,
            })
            .await?;

        let mut row = corporate.clone();
        row.auth_user_id = login.id;
        match self.corporates.create(&row).await {
            Ok(created) => Ok(created),
            Err(error) => {
                warn!(email = %corporate.email, %error, "Corporate insert failed after creating its login");
                Err(error)
            }
        }
    }
}

/// Employee entries for the users the endpoint created, matched by email
///
/// Falls back to response order when the endpoint returns no emails. The
/// second list names created users that match no row.
fn match_created(
    to_create: &[ValidEmployee],
    created: &[CreatedUser],
) -> (Vec<Employee>, Vec<String>) {
    let by_email: HashMap<String, Option<String>> = created
        .iter()
        .filter(|user| !user.email.is_empty())
        .map(|user| (user.email.trim().to_lowercase(), user.id.clone()))
        .collect();

    if by_email.is_empty() && created.len() == to_create.len() {
        let employees = to_create
            .iter()
            .zip(created)
            .map(|(employee, user)| employee.to_employee(user.id.clone()))
            .collect();
        return (employees, Vec::new());
    }

    let employees = to_create
        .iter()
        .filter_map(|employee| {
            by_email
                .get(&employee.email)
                .map(|id| employee.to_employee(id.clone()))
        })
        .collect();
    let unmatched = created
        .iter()
        .filter(|user| {
            let email = user.email.trim().to_lowercase();
            email.is_empty() || !to_create.iter().any(|employee| employee.email == email)
        })
        .map(|user| {
            user.id
                .clone()
                .unwrap_or_else(|| user.email.clone())
        })
        .collect();
    (employees, unmatched)
}

fn user_label(employee: &Employee) -> String {
    employee
        .user_id
        .clone()
        .unwrap_or_else(|| employee.email.clone())
}

impl From<ProvisioningPlan> for ProvisioningReport {
    fn from(plan: ProvisioningPlan) -> Self {
        Self {
            created: 0,
            failed: 0,
            skipped: plan.skipped,
            rejected: plan.rejected,
            errors: Vec::new(),
            unattached: Vec::new(),
            attach_error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn draft(name: &str, email: &str) -> EmployeeDraft {
        EmployeeDraft {
            name: name.to_string(),
            email: email.to_string(),
            phone: "555-0100".to_string(),
            ..EmployeeDraft::default()
        }
    }

    fn corporate(seats: Option<u32>, existing: &[&str]) -> Corporate {
        Corporate {
            id: Some("c1".to_string()),
            name: "Acme".to_string(),
            email: "hr@acme.test".to_string(),
            seats,
            employees: existing
                .iter()
                .map(|email| Employee {
                    email: (*email).to_string(),
                    ..Employee::default()
                })
                .collect(),
            ..Corporate::default()
        }
    }

    #[test]
    fn test_plan_skips_existing_and_rejects_invalid() {
        let drafts = vec![
            draft("Ana", "ana@acme.test"),
            draft("Ben", "BEN@acme.test"),
            draft("", "cy@acme.test"),
        ];
        let plan = plan_batch(&corporate(Some(10), &["ben@acme.test"]), &drafts, Some("basic"), 6);

        assert_eq!(plan.to_create.len(), 1);
        assert_eq!(plan.to_create[0].email, "ana@acme.test");
        assert_eq!(plan.skipped, vec!["ben@acme.test"]);
        assert_eq!(plan.rejected.len(), 1);
        assert_eq!(plan.remaining_seats, Some(9));
        assert!(plan.fits_seats());
    }

    #[test]
    fn test_plan_over_seat_limit() {
        let drafts = vec![draft("Ana", "ana@acme.test"), draft("Ben", "ben@acme.test")];
        let plan = plan_batch(&corporate(Some(2), &["cy@acme.test"]), &drafts, Some("basic"), 6);
        assert!(!plan.fits_seats());

        let unlimited = plan_batch(&corporate(None, &[]), &drafts, Some("basic"), 6);
        assert!(unlimited.fits_seats());
    }

    #[test]
    fn test_match_created_by_email() {
        let plan = plan_batch(
            &corporate(None, &[]),
            &[draft("Ana", "ana@acme.test"), draft("Ben", "ben@acme.test")],
            Some("basic"),
            6,
        );
        let created = vec![CreatedUser {
            id: Some("u2".to_string()),
            email: "Ben@Acme.test".to_string(),
        }];

        let (employees, unmatched) = match_created(&plan.to_create, &created);

        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].email, "ben@acme.test");
        assert_eq!(employees[0].user_id.as_deref(), Some("u2"));
        assert!(unmatched.is_empty());
    }

    #[test]
    fn test_match_created_by_order_without_emails() {
        let plan = plan_batch(&corporate(None, &[]), &[draft("Ana", "ana@acme.test")], Some("basic"), 6);
        let created = vec![CreatedUser {
            id: Some("u1".to_string()),
            email: String::new(),
        }];

        let (employees, unmatched) = match_created(&plan.to_create, &created);
        assert_eq!(employees[0].user_id.as_deref(), Some("u1"));
        assert!(unmatched.is_empty());
    }

    #[test]
    fn test_match_created_names_unmatched_users() {
        let plan = plan_batch(
            &corporate(None, &[]),
            &[draft("Ana", "ana@acme.test"), draft("Ben", "ben@acme.test")],
            Some("basic"),
            6,
        );
        let created = vec![CreatedUser {
            id: Some("u9".to_string()),
            email: String::new(),
        }];

        let (employees, unmatched) = match_created(&plan.to_create, &created);

        assert!(employees.is_empty());
        assert_eq!(unmatched, vec!["u9"]);
    }

    #[test]
    fn test_report_from_plan() {
        let plan = plan_batch(&corporate(None, &["ana@acme.test"]), &[draft("Ana", "ana@acme.test")], Some("basic"), 6);
        let report = ProvisioningReport::from(plan);
        assert_eq!(report.skipped, vec!["ana@acme.test"]);
        assert_eq!(report.created, 0);
    }
}
