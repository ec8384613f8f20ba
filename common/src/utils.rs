use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{error::Result, impl_str_conversions_for_enum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "share_permission", rename_all = "lowercase")]
pub enum Permission {
    Read,
    Write,
}

impl Permission {
    /// `Write` covers every operation `Read` does; `Read` covers only itself.
    pub fn dominates(self, required: Permission) -> bool {
        matches!(
            (self, required),
            (Permission::Write, _) | (Permission::Read, Permission::Read)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "share_status", rename_all = "lowercase")]
pub enum ShareStatus {
    Pending,
    Accepted,
    Rejected,
}

impl_str_conversions_for_enum!(Permission, Read => "read", Write => "write");
impl_str_conversions_for_enum!(
    ShareStatus,
    Pending => "pending",
    Accepted => "accepted",
    Rejected => "rejected",
);

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Rejects strings that are empty once surrounding whitespace is removed.
fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

pub fn validated<T: Validate>(input: T) -> Result<T> {
    input.validate()?;
    Ok(input)
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PasswordUpdateRequest {
    pub old_password: String,
    #[validate(length(min = 6, max = 128))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EmailUpdateRequest {
    #[validate(email)]
    pub email: String,
}

/// Fields accepted when creating a wallet. Any owner supplied by the client
/// is ignored; the owner is always the caller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWalletRequest {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: String,
    #[validate(length(min = 1, max = 10), custom(function = "not_blank"))]
    pub code: String,
    pub target: Option<String>,
    #[validate(range(min = 0.0))]
    pub goal: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateWalletRequest {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 10), custom(function = "not_blank"))]
    pub code: Option<String>,
    pub target: Option<String>,
    #[validate(range(min = 0.0))]
    pub goal: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTransactionRequest {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub title: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50), custom(function = "not_blank"))]
    pub kind: String,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub category: String,
    #[serde(default, alias = "desc")]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTransactionRequest {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub title: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50), custom(function = "not_blank"))]
    pub kind: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
    #[serde(alias = "desc")]
    pub description: Option<String>,
    pub status: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ShareRequest {
    pub email: String,
    pub permission: String,
}

#[derive(Debug, Deserialize)]
pub struct ShareResponseRequest {
    pub status: String,
}
