//! Authenticated submission review endpoints.

use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::auth::middleware::AuthAdmin;
use crate::error::{ApiError, ApiErrorBody};
use crate::models::donation::{Donation, ListQuery};
use crate::models::stats::DashboardStats;
use crate::routes::auth::SuccessResponse;
use crate::AppState;

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 1000;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/dashboard-stats", get(dashboard_stats))
        .route("/admin/submissions", get(list_submissions))
        .route("/admin/submissions/{id}", get(get_submission))
        .route("/admin/submissions/{id}/verify", put(verify_submission))
}

// ---------------------------------------------------------------------------
// GET /api/admin/dashboard-stats
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/admin/dashboard-stats",
    tag = "Admin",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current aggregates", body = DashboardStats),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
    ),
)]
pub async fn dashboard_stats(
    _admin: AuthAdmin,
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(state.store.stats().await?))
}

// ---------------------------------------------------------------------------
// GET /api/admin/submissions
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListSubmissionsParams {
    /// Rows to skip. Defaults to 0.
    pub skip: Option<i64>,
    /// Page size, 1 to 1000. Defaults to 100.
    pub limit: Option<i64>,
    /// Only return verified submissions.
    #[serde(default)]
    pub verified_only: bool,
}

impl ListSubmissionsParams {
    fn into_query(self) -> Result<ListQuery, ApiError> {
        let skip = self.skip.unwrap_or(0);
        if skip < 0 {
            return Err(ApiError::bad_request("skip must be greater than or equal to 0"));
        }
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(ApiError::bad_request(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }
        Ok(ListQuery {
            skip,
            limit,
            verified_only: self.verified_only,
        })
    }
}

#[utoipa::path(
    get,
    path = "/api/admin/submissions",
    tag = "Admin",
    security(("bearer" = [])),
    params(ListSubmissionsParams),
    responses(
        (status = 200, description = "Submissions, newest first", body = [Donation]),
        (status = 400, description = "Bad paging parameters", body = ApiErrorBody),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
    ),
)]
pub async fn list_submissions(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    Query(params): Query<ListSubmissionsParams>,
) -> Result<Json<Vec<Donation>>, ApiError> {
    let query = params.into_query()?;
    Ok(Json(state.store.list_donations(query).await?))
}

// ---------------------------------------------------------------------------
// GET /api/admin/submissions/{id}
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/admin/submissions/{id}",
    tag = "Admin",
    security(("bearer" = [])),
    params(
        ("id" = i32, Path, description = "Submission ID"),
    ),
    responses(
        (status = 200, description = "Submission", body = Donation),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
        (status = 404, description = "Submission not found", body = ApiErrorBody),
    ),
)]
pub async fn get_submission(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Donation>, ApiError> {
    state
        .store
        .get_donation(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Submission not found"))
}

// ---------------------------------------------------------------------------
// PUT /api/admin/submissions/{id}/verify
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VerifyParams {
    /// New verification state.
    pub is_verified: bool,
}

#[utoipa::path(
    put,
    path = "/api/admin/submissions/{id}/verify",
    tag = "Admin",
    security(("bearer" = [])),
    params(
        ("id" = i32, Path, description = "Submission ID"),
        VerifyParams,
    ),
    responses(
        (status = 200, description = "Verification state updated", body = SuccessResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
        (status = 404, description = "Submission not found", body = ApiErrorBody),
    ),
)]
pub async fn verify_submission(
    AuthAdmin { username }: AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<VerifyParams>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let donation = state
        .store
        .set_verification(id, params.is_verified, &username, Utc::now())
        .await?
        .ok_or_else(|| ApiError::not_found("Submission not found"))?;

    tracing::info!(
        id,
        is_verified = donation.is_verified,
        verified_by = %username,
        "submission verification changed"
    );

    state.broadcaster.announce_verification(&donation);

    let verb = if donation.is_verified { "verified" } else { "unverified" };
    Ok(Json(SuccessResponse {
        success: true,
        message: format!("Submission {verb} successfully"),
    }))
}
