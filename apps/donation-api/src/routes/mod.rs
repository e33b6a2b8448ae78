pub mod admin;
pub mod auth;
pub mod donations;
pub mod health;

use axum::Router;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(crate::gateway::server::router())
        .nest(
            "/api",
            donations::router()
                .merge(auth::router())
                .merge(admin::router()),
        )
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        donations::submit_donation,
        auth::login,
        auth::change_password,
        admin::dashboard_stats,
        admin::list_submissions,
        admin::get_submission,
        admin::verify_submission,
    ),
    components(
        schemas(
            // Error types
            crate::error::ApiErrorBody,
            crate::error::ApiErrorDetail,
            crate::error::FieldError,
            // Models
            crate::models::donation::Donation,
            crate::models::donation::DonationSummary,
            crate::models::donation::VerificationChange,
            crate::models::stats::DashboardStats,
            // Route request/response types
            health::HealthResponse,
            crate::validation::SubmitDonationRequest,
            donations::SubmitDonationResponse,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::ChangePasswordRequest,
            auth::SuccessResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check and live admin connections"),
        (name = "Donations", description = "Public donation intake"),
        (name = "Auth", description = "Admin authentication"),
        (name = "Admin", description = "Submission review"),
    )
)]
pub struct ApiDoc;
