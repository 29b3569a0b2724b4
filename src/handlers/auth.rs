use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::middlewares::AdminUser;
use crate::services::AuthService;
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminResponse {
    pub email: String,
}

// ============ Handlers ============

/// Log in as the admin
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 400, description = "Validation error")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = payload.email.trim();
    if !is_plausible_email(email) {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }
    if payload.password.chars().count() < 4 {
        return Err(AppError::Validation(
            "Password must be at least 4 characters".to_string(),
        ));
    }

    if let Err(e) = AuthService::check_admin(email, &payload.password, &state.config.admin) {
        tracing::warn!(email = %email, "Rejected admin login");
        return Err(e);
    }

    let token = AuthService::generate_token(email, &state.config)?;
    tracing::info!(email = %email, "Admin logged in");

    Ok(Json(AuthResponse { token }))
}

/// Current admin
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current admin", body = AdminResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Auth"
)]
pub async fn me(admin: AdminUser) -> AppResult<Json<AdminResponse>> {
    Ok(Json(AdminResponse { email: admin.email }))
}

/// `local@domain.tld` shape check; the credential comparison does the rest
fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}
