//! Manager model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{ids, ServiceCenter};

/// Manager administering at most one service center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Manager {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Argon2 hash
    #[serde(skip_serializing, default)]
    pub password: String,
    pub photo: Option<String>,
    pub service_id: Option<i32>,
}

/// Manager with the service center they run
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ManagerDetails {
    #[serde(flatten)]
    pub manager: Manager,
    pub service: Option<ServiceCenter>,
}

/// Create manager request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateManager {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(email(message = "email is not valid"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    pub photo: Option<String>,
    #[serde(default, deserialize_with = "ids::optional")]
    #[schema(value_type = Option<i32>)]
    pub service_id: Option<i32>,
}

/// Update manager request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateManager {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "email is not valid"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: Option<String>,
    pub photo: Option<String>,
    #[serde(default, deserialize_with = "ids::patch")]
    #[schema(value_type = Option<i32>)]
    pub service_id: Option<Option<i32>>,
}
