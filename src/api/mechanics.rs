//! Mechanic endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::mechanic::{CreateMechanic, Mechanic, MechanicDetails, UpdateMechanic},
    AppState,
};

use super::{MessageResponse, ValidJson, ValidPath};

/// List mechanics with their requests and service center
#[utoipa::path(
    get,
    path = "/mechanics",
    tag = "mechanics",
    responses(
        (status = 200, description = "List of mechanics", body = Vec<MechanicDetails>)
    )
)]
pub async fn list_mechanics(State(state): State<AppState>) -> AppResult<Json<Vec<MechanicDetails>>> {
    let mechanics = state.services.mechanics.list().await?;
    Ok(Json(mechanics))
}

/// Get mechanic by ID
#[utoipa::path(
    get,
    path = "/mechanics/{id}",
    tag = "mechanics",
    params(("id" = i32, Path, description = "Mechanic ID")),
    responses(
        (status = 200, description = "Mechanic details", body = MechanicDetails),
        (status = 404, description = "Mechanic not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_mechanic(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
) -> AppResult<Json<MechanicDetails>> {
    let mechanic = state.services.mechanics.get(id).await?;
    Ok(Json(mechanic))
}

/// Hire a mechanic, optionally into a service center
#[utoipa::path(
    post,
    path = "/mechanics",
    tag = "mechanics",
    request_body = CreateMechanic,
    responses(
        (status = 201, description = "Mechanic created", body = Mechanic),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Service not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_mechanic(
    State(state): State<AppState>,
    ValidJson(data): ValidJson<CreateMechanic>,
) -> AppResult<(StatusCode, Json<Mechanic>)> {
    let created = state.services.mechanics.create(data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a mechanic
#[utoipa::path(
    put,
    path = "/mechanics/{id}",
    tag = "mechanics",
    params(("id" = i32, Path, description = "Mechanic ID")),
    request_body = UpdateMechanic,
    responses(
        (status = 200, description = "Mechanic updated", body = Mechanic),
        (status = 404, description = "Mechanic or service not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_mechanic(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
    ValidJson(data): ValidJson<UpdateMechanic>,
) -> AppResult<Json<Mechanic>> {
    let updated = state.services.mechanics.update(id, data).await?;
    Ok(Json(updated))
}

/// Delete a mechanic. Its requests are unassigned first.
#[utoipa::path(
    delete,
    path = "/mechanics/{id}",
    tag = "mechanics",
    params(("id" = i32, Path, description = "Mechanic ID")),
    responses(
        (status = 200, description = "Mechanic deleted", body = MessageResponse),
        (status = 404, description = "Mechanic not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_mechanic(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
) -> AppResult<Json<MessageResponse>> {
    let mechanic = state.services.mechanics.delete(id).await?;
    Ok(Json(MessageResponse {
        message: format!("Mechanic {} deleted", mechanic.id),
    }))
}
