//! Admin login and password management.

use axum::extract::State;
use axum::routing::{post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::middleware::AuthAdmin;
use crate::auth::password::{hash_password, verify_password, MIN_PASSWORD_LEN};
use crate::error::{ApiError, ApiErrorBody};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/login", post(login))
        .route("/admin/change-password", put(change_password))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

// ---------------------------------------------------------------------------
// POST /api/admin/login
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

#[utoipa::path(
    post,
    path = "/api/admin/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Bad credentials or disabled account", body = ApiErrorBody),
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let admin = state
        .store
        .find_admin(&body.username)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Incorrect username or password"))?;

    if !admin.is_active {
        return Err(ApiError::unauthorized("Account disabled"));
    }

    if !verify_password(&body.password, &admin.password_hash) {
        tracing::info!(username = %admin.username, "admin login failed");
        return Err(ApiError::unauthorized("Incorrect username or password"));
    }

    let issued = state.tokens.issue(&admin.username)?;
    tracing::info!(username = %admin.username, "admin logged in");

    Ok(Json(LoginResponse {
        access_token: issued.token,
        token_type: "bearer".to_string(),
        expires_in: issued.expires_in,
    }))
}

// ---------------------------------------------------------------------------
// PUT /api/admin/change-password
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
}

#[utoipa::path(
    put,
    path = "/api/admin/change-password",
    tag = "Auth",
    security(("bearer" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = SuccessResponse),
        (status = 400, description = "Missing fields, wrong current password, or new password too short", body = ApiErrorBody),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
        (status = 404, description = "Admin not found", body = ApiErrorBody),
    ),
)]
pub async fn change_password(
    AuthAdmin { username }: AuthAdmin,
    State(state): State<AppState>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let (Some(current), Some(new)) = (
        body.current_password.filter(|p| !p.is_empty()),
        body.new_password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::bad_request(
            "current_password and new_password are required",
        ));
    };

    let admin = state
        .store
        .find_admin(&username)
        .await?
        .ok_or_else(|| ApiError::not_found("Admin user not found"))?;

    if !verify_password(&current, &admin.password_hash) {
        return Err(ApiError::bad_request("Current password is incorrect"));
    }

    if new.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "New password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }

    let hash = hash_password(&new)?;
    state.store.update_admin_password(&username, &hash).await?;
    tracing::info!(%username, "admin password changed");

    Ok(Json(SuccessResponse {
        success: true,
        message: "Password changed successfully".to_string(),
    }))
}
