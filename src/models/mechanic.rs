//! Mechanic model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{ids, Request, ServiceCenter};

/// Mechanic, optionally attached to one service center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Mechanic {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Argon2 hash
    #[serde(skip_serializing, default)]
    pub password: String,
    pub photo: Option<String>,
    pub service_id: Option<i32>,
}

/// Mechanic with assigned requests and service center
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MechanicDetails {
    #[serde(flatten)]
    pub mechanic: Mechanic,
    pub requests: Vec<Request>,
    pub service: Option<ServiceCenter>,
}

/// Create mechanic request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMechanic {
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

/// Update mechanic request (`serviceId: null` detaches the mechanic)
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMechanic {
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
