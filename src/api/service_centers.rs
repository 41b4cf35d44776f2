//! Service center endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::service_center::{
        CreateServiceCenter, ServiceCenter, ServiceCenterDeleted, ServiceCenterDetails,
        UpdateServiceCenter,
    },
    AppState,
};

use super::{ValidJson, ValidPath};

/// List service centers with manager, mechanics and requests
#[utoipa::path(
    get,
    path = "/services",
    tag = "services",
    responses(
        (status = 200, description = "List of service centers", body = Vec<ServiceCenterDetails>)
    )
)]
pub async fn list_service_centers(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ServiceCenterDetails>>> {
    let services = state.services.service_centers.list().await?;
    Ok(Json(services))
}

/// Get service center by ID
#[utoipa::path(
    get,
    path = "/services/{id}",
    tag = "services",
    params(("id" = i32, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service center details", body = ServiceCenterDetails),
        (status = 404, description = "Service not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_service_center(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
) -> AppResult<Json<ServiceCenterDetails>> {
    let service = state.services.service_centers.get(id).await?;
    Ok(Json(service))
}

/// Open a service center
#[utoipa::path(
    post,
    path = "/services",
    tag = "services",
    request_body = CreateServiceCenter,
    responses(
        (status = 201, description = "Service created", body = ServiceCenter),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_service_center(
    State(state): State<AppState>,
    ValidJson(data): ValidJson<CreateServiceCenter>,
) -> AppResult<(StatusCode, Json<ServiceCenter>)> {
    let created = state.services.service_centers.create(data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a service center
#[utoipa::path(
    put,
    path = "/services/{id}",
    tag = "services",
    params(("id" = i32, Path, description = "Service ID")),
    request_body = UpdateServiceCenter,
    responses(
        (status = 200, description = "Service updated", body = ServiceCenter),
        (status = 404, description = "Service not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_service_center(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
    ValidJson(data): ValidJson<UpdateServiceCenter>,
) -> AppResult<Json<ServiceCenter>> {
    let updated = state.services.service_centers.update(id, data).await?;
    Ok(Json(updated))
}

/// Delete a service center together with its mechanics and manager.
///
/// Requests that pointed at the service or at one of its mechanics are kept
/// and unassigned.
#[utoipa::path(
    delete,
    path = "/services/{id}",
    tag = "services",
    params(("id" = i32, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service deleted", body = ServiceCenterDeleted),
        (status = 404, description = "Service not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Concurrent modification, retry", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_service_center(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
) -> AppResult<Json<ServiceCenterDeleted>> {
    let deleted = state.services.service_centers.delete(id).await?;
    Ok(Json(ServiceCenterDeleted {
        success: true,
        message: format!("Service {} deleted with its mechanics and manager", deleted.id),
        deleted,
    }))
}
