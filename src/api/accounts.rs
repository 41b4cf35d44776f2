//! Sign-in and profile endpoints shared by applicants, mechanics and managers

use axum::{extract::State, Json};

use crate::{
    error::{AppError, AppResult},
    models::{
        account::{LoginRequest, LoginResponse, UpdatePhoto},
        AccountKind, Profile,
    },
    AppState,
};

use super::{AuthenticatedUser, ValidJson, ValidPath};

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = state
        .services
        .accounts
        .login(request.kind, &request.email, &request.password)
        .await?;
    Ok(Json(response))
}

/// Profile of the signed-in account
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current account, tagged with its kind"),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn me(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Profile>> {
    let profile = state.services.accounts.profile(claims.kind, claims.sub).await?;
    Ok(Json(profile))
}

/// Get any account's profile
#[utoipa::path(
    get,
    path = "/profiles/{kind}/{id}",
    tag = "auth",
    params(
        ("kind" = AccountKind, Path, description = "applicant, mechanic or manager"),
        ("id" = i32, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Account profile, tagged with its kind"),
        (status = 400, description = "Unknown account kind", body = crate::error::ErrorResponse),
        (status = 404, description = "Account not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    ValidPath((kind, id)): ValidPath<(String, i32)>,
) -> AppResult<Json<Profile>> {
    let profile = state.services.accounts.profile(parse_kind(&kind)?, id).await?;
    Ok(Json(profile))
}

/// Replace or clear an account's photo
#[utoipa::path(
    put,
    path = "/profiles/{kind}/{id}/photo",
    tag = "auth",
    params(
        ("kind" = AccountKind, Path, description = "applicant, mechanic or manager"),
        ("id" = i32, Path, description = "Account ID")
    ),
    request_body = UpdatePhoto,
    responses(
        (status = 200, description = "Updated profile"),
        (status = 400, description = "Unknown account kind", body = crate::error::ErrorResponse),
        (status = 404, description = "Account not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_photo(
    State(state): State<AppState>,
    ValidPath((kind, id)): ValidPath<(String, i32)>,
    ValidJson(data): ValidJson<UpdatePhoto>,
) -> AppResult<Json<Profile>> {
    let profile = state
        .services
        .accounts
        .update_photo(parse_kind(&kind)?, id, data.photo.as_deref())
        .await?;
    Ok(Json(profile))
}

fn parse_kind(raw: &str) -> AppResult<AccountKind> {
    raw.parse().map_err(AppError::Validation)
}
