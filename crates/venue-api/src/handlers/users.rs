//! User accounts managed through the auth endpoints

use crate::error::ApiResult;
use crate::state::AppState;
use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use venue_backend::endpoints::{CreatedUser, NewUser};

/// Account created from the user form
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccountRequest {
    /// Login email
    pub email: String,
    /// Display name
    pub name: String,
    /// Initial password; the endpoint generates one when absent
    #[serde(default)]
    pub password: Option<String>,
    /// Phone number
    #[serde(default)]
    pub phone: Option<String>,
    /// Role stored on the profile
    #[serde(default)]
    pub role: Option<String>,
    /// Subscription plan
    #[serde(default)]
    pub subscription_plan: Option<String>,
}

impl CreateAccountRequest {
    fn into_new_user(self, min_password: usize) -> venue_core::Result<NewUser> {
        let email = self.email.trim().to_lowercase();
        if !validator::ValidateEmail::validate_email(&email) {
            return Err(venue_core::Error::validation("email", "email is not valid"));
        }
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(venue_core::Error::validation("name", "name is required"));
        }
        let password = self.password;
        if let Some(ref password) = password
            && password.chars().count() < min_password
        {
            return Err(venue_core::Error::validation(
                "password",
                format!("password must be at least {min_password} characters"),
            ));
        }

        Ok(NewUser {
            email,
            password,
            name,
            phone: self.phone,
            role: self.role,
            subscription_plan: self.subscription_plan,
            corporate_id: None,
        })
    }
}

/// Create an auth user and its profile
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreatedUser>)> {
    let Json(request) = body?;
    let user = request.into_new_user(state.config.provisioning.min_password_length)?;
    let created = state.endpoints.create_user(&user).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Delete an auth user and its profile
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.endpoints.delete_user(&id).await?;
    info!(user = %id, "Deleted account");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn request(email: &str, password: Option<&str>) -> CreateAccountRequest {
        CreateAccountRequest {
            email: email.to_string(),
            name: " Asha ".to_string(),
            password: password.map(String::from),
            phone: None,
            role: None,
            subscription_plan: None,
        }
    }

    #[test]
    fn test_account_is_normalized() {
        let user = request(" Asha@Acme.test ", Some("longenough"))
            .into_new_user(6)
            .unwrap();
        assert_eq!(user.email, "asha@acme.test");
        assert_eq!(user.name, "Asha");
    }

    #[test]
    fn test_account_rejects_bad_input() {
        assert!(request("not-an-email", None).into_new_user(6).is_err());
        assert!(request("a@acme.test", Some("abc")).into_new_user(6).is_err());
    }

    #[test]
    fn test_account_password_rules() {
        assert!(request("a@acme.test", Some("")).into_new_user(6).is_err());
        assert!(request("a@acme.test", None).into_new_user(6).is_ok());
    }
}
