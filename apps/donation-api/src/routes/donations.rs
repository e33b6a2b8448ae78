//! Public donation intake.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{ApiError, ApiErrorBody};
use crate::validation::{validate_submission, SubmitDonationRequest};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/submit-donation", post(submit_donation))
}

// ---------------------------------------------------------------------------
// POST /api/submit-donation
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitDonationResponse {
    pub success: bool,
    pub id: i32,
    pub transaction_reference: Option<String>,
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/api/submit-donation",
    tag = "Donations",
    request_body = SubmitDonationRequest,
    responses(
        (status = 201, description = "Submission recorded", body = SubmitDonationResponse),
        (status = 400, description = "Validation failed", body = ApiErrorBody),
        (status = 409, description = "Duplicate transaction reference", body = ApiErrorBody),
    ),
)]
pub async fn submit_donation(
    State(state): State<AppState>,
    Json(body): Json<SubmitDonationRequest>,
) -> Result<(StatusCode, Json<SubmitDonationResponse>), ApiError> {
    let new = validate_submission(&body).map_err(ApiError::validation)?;
    let donation = state.store.insert_donation(new).await?;

    tracing::info!(
        id = donation.id,
        reference = ?donation.transaction_reference,
        amount = %donation.amount_donated,
        "donation submitted"
    );

    // Notification is best-effort; the submission already succeeded.
    state.broadcaster.announce_new_donation(&donation);

    Ok((
        StatusCode::CREATED,
        Json(SubmitDonationResponse {
            success: true,
            id: donation.id,
            transaction_reference: donation.transaction_reference,
            message: "Donation confirmation submitted successfully".to_string(),
        }),
    ))
}
