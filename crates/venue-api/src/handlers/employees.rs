//! Corporate accounts and their employees

use crate::error::{ApiError, ApiResult};
use crate::extractors::ValidatedJson;
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State, multipart::{MultipartError, MultipartRejection}},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;
use venue_backend::{ProvisioningPlan, ProvisioningReport};
use venue_core::employees::{EmployeeDraft, RowError};
use venue_core::types::{Corporate, Employee};
use venue_sheets::{SheetFormat, employee_drafts, read_rows_from_bytes};

/// New corporate plus the password for its admin login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCorporateRequest {
    /// Corporate row
    #[serde(flatten)]
    #[validate(nested)]
    pub corporate: Corporate,
    /// Login password; the endpoint generates one when absent
    #[serde(default)]
    pub password: Option<String>,
}

/// Rows typed into the provisioning form
#[derive(Debug, Clone, Deserialize)]
pub struct ProvisionRequest {
    /// Employee rows
    pub rows: Vec<EmployeeDraft>,
    /// Plan for rows that name none
    #[serde(default)]
    pub default_plan: Option<String>,
    /// Only report what would happen
    #[serde(default)]
    pub dry_run: bool,
}

/// One employee added from the single-entry form
#[derive(Debug, Clone, Deserialize)]
pub struct AddEmployeeRequest {
    /// Employee row
    pub employee: EmployeeDraft,
    /// Plan when the row names none
    #[serde(default)]
    pub default_plan: Option<String>,
}

/// What a batch would do, without passwords
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DryRunResponse {
    /// Emails that would be created
    pub to_create: Vec<String>,
    /// Emails already on the corporate
    pub skipped: Vec<String>,
    /// Rows that failed validation
    pub rejected: Vec<RowError>,
    /// Free seats, `None` when unlimited
    pub remaining_seats: Option<usize>,
    /// Whether the batch fits in the free seats
    pub fits_seats: bool,
}

impl From<ProvisioningPlan> for DryRunResponse {
    fn from(plan: ProvisioningPlan) -> Self {
        Self {
            fits_seats: plan.fits_seats(),
            to_create: plan.to_create.into_iter().map(|e| e.email).collect(),
            skipped: plan.skipped,
            rejected: plan.rejected,
            remaining_seats: plan.remaining_seats,
        }
    }
}

/// Create the corporate admin login, then the corporate row
pub async fn create_corporate(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateCorporateRequest>,
) -> ApiResult<(StatusCode, Json<Corporate>)> {
    let created = state
        .provisioner
        .create_corporate(&request.corporate, request.password.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn run_batch(
    state: &AppState,
    corporate_id: &str,
    drafts: &[EmployeeDraft],
    default_plan: Option<&str>,
    dry_run: bool,
) -> ApiResult<Response> {
    if drafts.is_empty() {
        return Err(ApiError::bad_request("No employee rows supplied"));
    }
    if dry_run {
        let plan = state
            .provisioner
            .dry_run(corporate_id, drafts, default_plan)
            .await?;
        return Ok(Json(DryRunResponse::from(plan)).into_response());
    }

    let report: ProvisioningReport = state
        .provisioner
        .provision(corporate_id, drafts, default_plan)
        .await?;
    Ok(Json(report).into_response())
}

/// Provision employees from typed rows
pub async fn provision(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<ProvisionRequest>, axum::extract::rejection::JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = body?;
    info!(corporate = %id, rows = request.rows.len(), dry_run = request.dry_run, "Provisioning employees");
    run_batch(
        &state,
        &id,
        &request.rows,
        request.default_plan.as_deref(),
        request.dry_run,
    )
    .await
}

fn multipart_error(error: &MultipartError) -> ApiError {
    ApiError::new(error.status(), "INVALID_MULTIPART", error.body_text())
}

/// Provision employees from an uploaded spreadsheet
///
/// Form fields: `file` (xlsx, xls or csv), optional `default_plan` and
/// `dry_run`.
pub async fn import(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Response> {
    let mut multipart =
        multipart.map_err(|e| ApiError::new(e.status(), "INVALID_MULTIPART", e.body_text()))?;

    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut default_plan = None;
    let mut dry_run = false;

    while let Some(field) = multipart.next_field().await.map_err(|e| multipart_error(&e))? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| multipart_error(&e))?;
                upload = Some((filename, bytes.to_vec()));
            }
            "default_plan" => {
                let value = field.text().await.map_err(|e| multipart_error(&e))?;
                default_plan = Some(value.trim().to_string()).filter(|p| !p.is_empty());
            }
            "dry_run" => {
                let value = field.text().await.map_err(|e| multipart_error(&e))?;
                dry_run = matches!(value.trim(), "true" | "1" | "on" | "yes");
            }
            other => debug!(field = other, "Ignoring form field"),
        }
    }

    let Some((filename, bytes)) = upload else {
        return Err(venue_core::Error::validation("file", "a spreadsheet file is required").into());
    };
    let format = SheetFormat::from_path(&filename)?;
    let sheet = read_rows_from_bytes(&bytes, format)?;
    let drafts = employee_drafts(&sheet)?;

    info!(corporate = %id, file = %filename, rows = drafts.len(), dry_run, "Importing employees");
    run_batch(&state, &id, &drafts, default_plan.as_deref(), dry_run).await
}

/// Create and attach a single employee
pub async fn add_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<AddEmployeeRequest>, axum::extract::rejection::JsonRejection>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    let Json(request) = body?;
    let employee = state
        .provisioner
        .add_employee(&id, &request.employee, request.default_plan.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// Detach an employee from a corporate
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path((id, user_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    state.provisioner.remove_employee(&id, &user_id).await?;
    info!(corporate = %id, user = %user_id, "Removed employee");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use venue_core::employees::ValidEmployee;

    #[test]
    fn test_dry_run_response_hides_passwords() {
        let plan = ProvisioningPlan {
            to_create: vec![ValidEmployee {
                row: 1,
                name: "Asha".to_string(),
                email: "asha@acme.test".to_string(),
                phone: "9800000000".to_string(),
                password: Some("secret99".to_string()),
                designation: None,
                department: None,
                employee_code: None,
                plan: "basic".to_string(),
            }],
            skipped: vec![],
            rejected: vec![],
            remaining_seats: Some(0),
        };

        let response = DryRunResponse::from(plan);
        let body = serde_json::to_string(&response).unwrap();

        assert_eq!(response.to_create, vec!["asha@acme.test"]);
        assert!(!response.fits_seats);
        assert!(!body.contains("secret99"));
    }

    #[test]
    fn test_create_corporate_request_flattens() {
        let request: CreateCorporateRequest = serde_json::from_value(json!({
            "name": "Acme",
            "email": "hr@acme.test",
            "seats": 25,
            "password": "hunter22"
        }))
        .unwrap();

        assert_eq!(request.corporate.name, "Acme");
        assert_eq!(request.corporate.seats, Some(25));
        assert_eq!(request.password.as_deref(), Some("hunter22"));
        assert!(request.validate().is_ok());
    }
}
