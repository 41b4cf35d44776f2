//! Applicant model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::Request;

/// Applicant: the person filing repair requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Applicant {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Argon2 hash
    #[serde(skip_serializing, default)]
    pub password: String,
    pub photo: Option<String>,
    pub role: Option<String>,
}

/// Applicant together with the requests they filed
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApplicantDetails {
    #[serde(flatten)]
    pub applicant: Applicant,
    pub requests: Vec<Request>,
}

/// Create applicant request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateApplicant {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(email(message = "email is not valid"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    pub photo: Option<String>,
    pub role: Option<String>,
}

/// Update applicant request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateApplicant {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "email is not valid"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: Option<String>,
    pub photo: Option<String>,
    pub role: Option<String>,
}
