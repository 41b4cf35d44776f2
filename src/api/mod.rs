//! API handlers for the service desk REST endpoints

pub mod accounts;
pub mod applicants;
pub mod health;
pub mod managers;
pub mod mechanics;
pub mod openapi;
pub mod requests;
pub mod service_centers;
pub mod transports;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppError, models::account::AccountClaims, AppState};

/// Extractor for the signed-in account from a JWT bearer token
pub struct AuthenticatedUser(pub AccountClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = state.services.accounts.verify_token(token)?;
        Ok(AuthenticatedUser(claims))
    }
}

/// `Json` whose rejection is reported as `{ "error": ... }`
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ValidJson<T>(pub T);

/// `Path` whose rejection is reported as `{ "error": ... }`
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ValidPath<T>(pub T);

/// Plain acknowledgement body
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
