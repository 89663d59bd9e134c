//! Bulk employee validation run before any provisioning call

use crate::types::{Employee, RecordId};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use validator::Validate;

/// Default minimum password length for imported employees
pub const DEFAULT_MIN_PASSWORD: usize = 6;

/// One employee row as typed or imported, not yet checked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct EmployeeDraft {
    /// Source row number to report errors against; defaults to the position in the batch
    #[serde(default, skip_serializing)]
    pub row: Option<usize>,
    /// Full name
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    /// Login email
    #[serde(default)]
    #[validate(email(message = "email is not valid"))]
    pub email: String,
    /// Phone number
    #[serde(default)]
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    /// Initial password; the endpoint generates one when absent
    #[serde(default)]
    pub password: Option<String>,
    /// Job title
    #[serde(default)]
    pub designation: Option<String>,
    /// Department
    #[serde(default)]
    pub department: Option<String>,
    /// Company-internal code
    #[serde(default)]
    pub employee_code: Option<String>,
    /// Plan override for this row
    #[serde(default)]
    pub plan: Option<String>,
}

impl EmployeeDraft {
    fn trimmed(&self) -> Self {
        let opt = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
        };
        Self {
            row: self.row,
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: self.phone.trim().to_string(),
            password: self.password.clone(),
            designation: opt(&self.designation),
            department: opt(&self.department),
            employee_code: opt(&self.employee_code),
            plan: opt(&self.plan),
        }
    }
}

/// A row that passed validation, with its plan resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidEmployee {
    /// Source row number
    pub row: usize,
    /// Full name
    pub name: String,
    /// Lowercased email
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Initial password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Job title
    pub designation: Option<String>,
    /// Department
    pub department: Option<String>,
    /// Company-internal code
    pub employee_code: Option<String>,
    /// Resolved plan
    pub plan: RecordId,
}

impl ValidEmployee {
    /// Corporate employee entry for a user created with `user_id`
    #[must_use]
    pub fn to_employee(&self, user_id: Option<RecordId>) -> Employee {
        Employee {
            user_id,
            name: self.name.clone(),
            email: self.email.clone(),
            phone: Some(self.phone.clone()),
            designation: self.designation.clone(),
            department: self.department.clone(),
            employee_code: self.employee_code.clone(),
            plan: Some(self.plan.clone()),
            added_at: Some(Utc::now()),
        }
    }
}

/// Why a row was rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// Source row number
    pub row: usize,
    /// Offending field
    pub field: String,
    /// Human readable reason
    pub message: String,
}

impl RowError {
    /// New row error
    #[must_use]
    pub fn new(row: usize, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            row,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}: {} - {}", self.row, self.field, self.message)
    }
}

/// Outcome of validating one batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchValidation {
    /// Rows ready to provision
    pub accepted: Vec<ValidEmployee>,
    /// Rows that never reach the network
    pub rejected: Vec<RowError>,
}

impl BatchValidation {
    /// Whether every row passed
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Emails of the accepted rows, in order
    #[must_use]
    pub fn emails(&self) -> Vec<&str> {
        self.accepted.iter().map(|e| e.email.as_str()).collect()
    }
}

fn first_violation(draft: &EmployeeDraft) -> Option<(String, String)> {
    let errors = draft.validate().err()?;
    // Report in form order rather than hash order
    ["name", "email", "phone"].into_iter().find_map(|field| {
        errors.field_errors().get(field).and_then(|list| {
            list.first().map(|error| {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| format!("{field} is invalid"), ToString::to_string);
                (field.to_string(), message)
            })
        })
    })
}

/// Validate a batch of drafts
///
/// Checks required fields, email syntax and password length, resolves each
/// row's plan (row value, else `default_plan`) and rejects repeated emails
/// after their first occurrence.
#[must_use]
pub fn validate_batch(
    drafts: &[EmployeeDraft],
    default_plan: Option<&str>,
    min_password: usize,
) -> BatchValidation {
    let default_plan = default_plan.map(str::trim).filter(|p| !p.is_empty());
    let mut seen = HashSet::new();
    let mut result = BatchValidation::default();

    for (index, draft) in drafts.iter().enumerate() {
        let draft = draft.trimmed();
        let row = draft.row.unwrap_or(index + 1);

        if let Some((field, message)) = first_violation(&draft) {
            result.rejected.push(RowError::new(row, field, message));
            continue;
        }

        if let Some(password) = &draft.password
            && password.chars().count() < min_password
        {
            result.rejected.push(RowError::new(
                row,
                "password",
                format!("password must be at least {min_password} characters"),
            ));
            continue;
        }

        let Some(plan) = draft.plan.as_deref().or(default_plan) else {
            result
                .rejected
                .push(RowError::new(row, "plan", "no plan on the row and no default plan"));
            continue;
        };

        if !seen.insert(draft.email.clone()) {
            result.rejected.push(RowError::new(
                row,
                "email",
                format!("{} appears earlier in this batch", draft.email),
            ));
            continue;
        }

        result.accepted.push(ValidEmployee {
            row,
            plan: plan.to_string(),
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            password: draft.password,
            designation: draft.designation,
            department: draft.department,
            employee_code: draft.employee_code,
        });
    }

    result
}
