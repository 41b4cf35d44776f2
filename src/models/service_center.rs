//! Service center model (a physical repair location)

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{Manager, Mechanic, Request};

/// Repair location, stored in the `services` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCenter {
    pub id: i32,
    pub address: String,
    /// Opening hours, free text
    pub work_time: String,
}

/// Service center with its staff and requests
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ServiceCenterDetails {
    #[serde(flatten)]
    pub service: ServiceCenter,
    pub manager: Option<Manager>,
    pub mechanics: Vec<Mechanic>,
    pub requests: Vec<Request>,
}

/// Create service center request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceCenter {
    #[validate(length(min = 1, message = "address must not be empty"))]
    pub address: String,
    #[validate(length(min = 1, message = "workTime must not be empty"))]
    pub work_time: String,
}

/// Update service center request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceCenter {
    #[validate(length(min = 1, message = "address must not be empty"))]
    pub address: Option<String>,
    #[validate(length(min = 1, message = "workTime must not be empty"))]
    pub work_time: Option<String>,
}

/// Body returned by a successful cascade delete
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceCenterDeleted {
    pub success: bool,
    pub message: String,
    pub deleted: ServiceCenter,
}
