//! Applicant endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::applicant::{Applicant, ApplicantDetails, CreateApplicant, UpdateApplicant},
    AppState,
};

use super::{ValidJson, ValidPath};

/// List applicants with their requests
#[utoipa::path(
    get,
    path = "/applicants",
    tag = "applicants",
    responses(
        (status = 200, description = "List of applicants", body = Vec<ApplicantDetails>)
    )
)]
pub async fn list_applicants(State(state): State<AppState>) -> AppResult<Json<Vec<ApplicantDetails>>> {
    let applicants = state.services.applicants.list().await?;
    Ok(Json(applicants))
}

/// Get applicant by ID
#[utoipa::path(
    get,
    path = "/applicants/{id}",
    tag = "applicants",
    params(("id" = i32, Path, description = "Applicant ID")),
    responses(
        (status = 200, description = "Applicant details", body = ApplicantDetails),
        (status = 404, description = "Applicant not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_applicant(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
) -> AppResult<Json<ApplicantDetails>> {
    let applicant = state.services.applicants.get(id).await?;
    Ok(Json(applicant))
}

/// Register an applicant
#[utoipa::path(
    post,
    path = "/applicants",
    tag = "applicants",
    request_body = CreateApplicant,
    responses(
        (status = 201, description = "Applicant created", body = Applicant),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_applicant(
    State(state): State<AppState>,
    ValidJson(data): ValidJson<CreateApplicant>,
) -> AppResult<(StatusCode, Json<Applicant>)> {
    let created = state.services.applicants.create(data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an applicant
#[utoipa::path(
    put,
    path = "/applicants/{id}",
    tag = "applicants",
    params(("id" = i32, Path, description = "Applicant ID")),
    request_body = UpdateApplicant,
    responses(
        (status = 200, description = "Applicant updated", body = Applicant),
        (status = 404, description = "Applicant not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_applicant(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
    ValidJson(data): ValidJson<UpdateApplicant>,
) -> AppResult<Json<Applicant>> {
    let updated = state.services.applicants.update(id, data).await?;
    Ok(Json(updated))
}

/// Delete an applicant
#[utoipa::path(
    delete,
    path = "/applicants/{id}",
    tag = "applicants",
    params(("id" = i32, Path, description = "Applicant ID")),
    responses(
        (status = 204, description = "Applicant deleted"),
        (status = 404, description = "Applicant not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Applicant still has requests", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_applicant(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
) -> AppResult<StatusCode> {
    state.services.applicants.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
