//! Transport endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::transport::{CreateTransport, Transport, TransportDetails, UpdateTransport},
    AppState,
};

use super::{ValidJson, ValidPath};

/// List transports with their requests
#[utoipa::path(
    get,
    path = "/transports",
    tag = "transports",
    responses(
        (status = 200, description = "List of transports", body = Vec<TransportDetails>)
    )
)]
pub async fn list_transports(State(state): State<AppState>) -> AppResult<Json<Vec<TransportDetails>>> {
    let transports = state.services.transports.list().await?;
    Ok(Json(transports))
}

/// Get transport by ID
#[utoipa::path(
    get,
    path = "/transports/{id}",
    tag = "transports",
    params(("id" = i32, Path, description = "Transport ID")),
    responses(
        (status = 200, description = "Transport details", body = TransportDetails),
        (status = 404, description = "Transport not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_transport(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
) -> AppResult<Json<TransportDetails>> {
    let transport = state.services.transports.get(id).await?;
    Ok(Json(transport))
}

/// Register a transport
#[utoipa::path(
    post,
    path = "/transports",
    tag = "transports",
    request_body = CreateTransport,
    responses(
        (status = 201, description = "Transport created", body = Transport),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_transport(
    State(state): State<AppState>,
    ValidJson(data): ValidJson<CreateTransport>,
) -> AppResult<(StatusCode, Json<Transport>)> {
    let created = state.services.transports.create(data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a transport
#[utoipa::path(
    put,
    path = "/transports/{id}",
    tag = "transports",
    params(("id" = i32, Path, description = "Transport ID")),
    request_body = UpdateTransport,
    responses(
        (status = 200, description = "Transport updated", body = Transport),
        (status = 404, description = "Transport not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_transport(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
    ValidJson(data): ValidJson<UpdateTransport>,
) -> AppResult<Json<Transport>> {
    let updated = state.services.transports.update(id, data).await?;
    Ok(Json(updated))
}

/// Delete a transport
#[utoipa::path(
    delete,
    path = "/transports/{id}",
    tag = "transports",
    params(("id" = i32, Path, description = "Transport ID")),
    responses(
        (status = 204, description = "Transport deleted"),
        (status = 404, description = "Transport not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Transport still has requests", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_transport(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
) -> AppResult<StatusCode> {
    state.services.transports.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
