use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::services::{AuthService, Claims};
use crate::state::AppState;

/// The authenticated admin, extracted from the bearer token
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub email: String,
}

impl From<Claims> for AdminUser {
    fn from(claims: Claims) -> Self {
        Self { email: claims.sub }
    }
}

/// Extractor for AdminUser - can be used directly in handlers
/// Example: `async fn handler(admin: AdminUser) -> ... { }`
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Admin gate - validates the JWT and injects AdminUser into request extensions
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)?;

    let claims = AuthService::verify_token(token, &state.config)?;

    request.extensions_mut().insert(AdminUser::from(claims));

    Ok(next.run(request).await)
}
