//! Transport (vehicle) model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::Request;

/// Vehicle a request is filed for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Transport {
    pub id: i32,
    /// Vehicle type (car, truck, bus...)
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub serial: String,
    pub model: String,
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransportDetails {
    #[serde(flatten)]
    pub transport: Transport,
    pub requests: Vec<Request>,
}

/// Create transport request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTransport {
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "type must not be empty"))]
    pub kind: String,
    #[validate(length(min = 1, message = "serial must not be empty"))]
    pub serial: String,
    #[validate(length(min = 1, message = "model must not be empty"))]
    pub model: String,
    pub photo: Option<String>,
}

/// Update transport request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTransport {
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "type must not be empty"))]
    pub kind: Option<String>,
    #[validate(length(min = 1, message = "serial must not be empty"))]
    pub serial: Option<String>,
    #[validate(length(min = 1, message = "model must not be empty"))]
    pub model: Option<String>,
    pub photo: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(body: &str) -> UpdateTransport {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn update_accepts_absent_fields() {
        assert!(update("{}").validate().is_ok());
        assert!(update(r#"{"model": "Volvo FH"}"#).validate().is_ok());
    }

    #[test]
    fn update_rejects_blank_fields() {
        assert!(update(r#"{"type": ""}"#).validate().is_err());
        assert!(update(r#"{"serial": ""}"#).validate().is_err());
        assert!(update(r#"{"model": ""}"#).validate().is_err());
    }
}
