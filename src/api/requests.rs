//! Repair request endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::request::{CreateRequest, RequestDetails, UpdateRequest},
    AppState,
};

use super::{ValidJson, ValidPath};

/// List requests, newest first, with related rows expanded
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    responses(
        (status = 200, description = "List of requests", body = Vec<RequestDetails>)
    )
)]
pub async fn list_requests(State(state): State<AppState>) -> AppResult<Json<Vec<RequestDetails>>> {
    let requests = state.services.requests.list().await?;
    Ok(Json(requests))
}

/// Get request by ID
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request details", body = RequestDetails),
        (status = 404, description = "Request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_request(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
) -> AppResult<Json<RequestDetails>> {
    let request = state.services.requests.get(id).await?;
    Ok(Json(request))
}

/// File a repair request
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    request_body = CreateRequest,
    responses(
        (status = 201, description = "Request created", body = RequestDetails),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Referenced row not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_request(
    State(state): State<AppState>,
    ValidJson(data): ValidJson<CreateRequest>,
) -> AppResult<(StatusCode, Json<RequestDetails>)> {
    let created = state.services.requests.create(data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Partially update a request
///
/// Only the fields present in the body change. `null` clears `mechanicId`,
/// `serviceId` or `closedAt`.
#[utoipa::path(
    put,
    path = "/requests/{id}",
    tag = "requests",
    params(("id" = i32, Path, description = "Request ID")),
    request_body = UpdateRequest,
    responses(
        (status = 200, description = "Request updated", body = RequestDetails),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Request or referenced row not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_request(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
    ValidJson(patch): ValidJson<UpdateRequest>,
) -> AppResult<Json<RequestDetails>> {
    let updated = state.services.requests.update(id, patch).await?;
    Ok(Json(updated))
}

/// Move a request to a new status
///
/// "отклонена" and "завершена" stamp `closedAt`, "новая" clears it, any other
/// status leaves it alone. An explicit `closedAt` in the body wins.
#[utoipa::path(
    put,
    path = "/requests/{id}/status",
    tag = "requests",
    params(("id" = i32, Path, description = "Request ID")),
    request_body = UpdateRequest,
    responses(
        (status = 200, description = "Status changed", body = RequestDetails),
        (status = 400, description = "Missing or invalid status", body = crate::error::ErrorResponse),
        (status = 404, description = "Request or referenced row not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn set_request_status(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
    ValidJson(patch): ValidJson<UpdateRequest>,
) -> AppResult<Json<RequestDetails>> {
    let updated = state.services.requests.set_status(id, patch).await?;
    Ok(Json(updated))
}

/// Delete a request
#[utoipa::path(
    delete,
    path = "/requests/{id}",
    tag = "requests",
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 204, description = "Request deleted"),
        (status = 404, description = "Request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_request(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
) -> AppResult<StatusCode> {
    state.services.requests.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
