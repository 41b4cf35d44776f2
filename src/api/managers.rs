//! Manager endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::manager::{CreateManager, Manager, ManagerDetails, UpdateManager},
    AppState,
};

use super::{ValidJson, ValidPath};

/// List managers with their service center
#[utoipa::path(
    get,
    path = "/managers",
    tag = "managers",
    responses(
        (status = 200, description = "List of managers", body = Vec<ManagerDetails>)
    )
)]
pub async fn list_managers(State(state): State<AppState>) -> AppResult<Json<Vec<ManagerDetails>>> {
    let managers = state.services.managers.list().await?;
    Ok(Json(managers))
}

/// Get manager by ID
#[utoipa::path(
    get,
    path = "/managers/{id}",
    tag = "managers",
    params(("id" = i32, Path, description = "Manager ID")),
    responses(
        (status = 200, description = "Manager details", body = ManagerDetails),
        (status = 404, description = "Manager not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_manager(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
) -> AppResult<Json<ManagerDetails>> {
    let manager = state.services.managers.get(id).await?;
    Ok(Json(manager))
}

/// Create a manager
#[utoipa::path(
    post,
    path = "/managers",
    tag = "managers",
    request_body = CreateManager,
    responses(
        (status = 201, description = "Manager created", body = Manager),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Service not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Service already has a manager", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_manager(
    State(state): State<AppState>,
    ValidJson(data): ValidJson<CreateManager>,
) -> AppResult<(StatusCode, Json<Manager>)> {
    let created = state.services.managers.create(data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a manager
#[utoipa::path(
    put,
    path = "/managers/{id}",
    tag = "managers",
    params(("id" = i32, Path, description = "Manager ID")),
    request_body = UpdateManager,
    responses(
        (status = 200, description = "Manager updated", body = Manager),
        (status = 404, description = "Manager or service not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Service already has a manager", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_manager(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
    ValidJson(data): ValidJson<UpdateManager>,
) -> AppResult<Json<Manager>> {
    let updated = state.services.managers.update(id, data).await?;
    Ok(Json(updated))
}

/// Delete a manager
#[utoipa::path(
    delete,
    path = "/managers/{id}",
    tag = "managers",
    params(("id" = i32, Path, description = "Manager ID")),
    responses(
        (status = 204, description = "Manager deleted"),
        (status = 404, description = "Manager not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_manager(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
) -> AppResult<StatusCode> {
    state.services.managers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
