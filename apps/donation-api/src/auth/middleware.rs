//! Bearer token extraction for admin routes.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::AppState;

/// Authenticated admin extracted from the `Authorization: Bearer <jwt>` header.
#[derive(Debug, Clone)]
pub struct AuthAdmin {
    pub username: String,
}

/// Rejection returned when the bearer token is missing or invalid.
pub struct AuthError {
    message: &'static str,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": {
                "code": "UNAUTHORIZED",
                "message": self.message
            }
        });
        let mut resp = (StatusCode::UNAUTHORIZED, Json(body)).into_response();
        resp.headers_mut().insert(
            axum::http::header::WWW_AUTHENTICATE,
            axum::http::HeaderValue::from_static("Bearer"),
        );
        resp
    }
}

impl FromRequestParts<AppState> for AuthAdmin {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError {
                message: "Missing Authorization header",
            })?;

        let token = header.strip_prefix("Bearer ").ok_or(AuthError {
            message: "Invalid Authorization header format",
        })?;

        let username = state.tokens.verify(token).map_err(|_| AuthError {
            message: "Could not validate credentials",
        })?;

        // A token outlives its account if the admin is removed or disabled.
        match state.store.find_admin(&username).await {
            Ok(Some(admin)) if admin.is_active => Ok(AuthAdmin { username }),
            Ok(_) => Err(AuthError {
                message: "Could not validate credentials",
            }),
            Err(e) => {
                tracing::error!(error = %e.message, "admin lookup failed during auth");
                Err(AuthError {
                    message: "Could not validate credentials",
                })
            }
        }
    }
}
