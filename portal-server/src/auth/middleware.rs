//! Authentication middleware
//!
//! Extracts and validates the bearer token, reloads the employee row and
//! injects [`CurrentEmployee`] into request extensions.
//!
//! Skipped for `OPTIONS` (CORS preflight), non-`/api/` paths and the login
//! steps under `/api/auth/`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::{AppError, ErrorCode};

use super::{CurrentEmployee, JwtError, JwtService};
use crate::db::employees;
use crate::security_log;
use crate::state::AppState;

const PUBLIC_API_ROUTES: &[&str] = &[
    "/api/auth/identify",
    "/api/auth/setup",
    "/api/auth/verify",
];

pub fn is_public_route(path: &str) -> bool {
    !path.starts_with("/api/") || PUBLIC_API_ROUTES.contains(&path)
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS || is_public_route(req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = req.uri().path().to_string());
            return Err(AppError::unauthorized());
        }
    };

    let claims = match state.jwt.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = e.to_string(),
                uri = req.uri().path().to_string()
            );
            return Err(match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            });
        }
    };

    let employee = employees::find_by_id(&state.pool, &claims.sub)
        .await
        .map_err(|e| {
            tracing::error!("Employee lookup during auth failed: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| {
            security_log!("WARN", "auth_employee_gone", employee_id = claims.sub.clone());
            AppError::with_message(ErrorCode::TokenInvalid, "Employee no longer exists")
        })?;

    let capabilities = state.access.capabilities(&employee);
    req.extensions_mut().insert(CurrentEmployee {
        employee,
        capabilities,
        token_expires_at: claims.exp * 1000,
    });

    Ok(next.run(req).await)
}

/// Admin-only route layer; runs after [`require_auth`]
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let current = req
        .extensions()
        .get::<CurrentEmployee>()
        .ok_or_else(AppError::unauthorized)?;
    current.require_admin()?;
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_steps_and_non_api_paths_are_public() {
        assert!(is_public_route("/health"));
        assert!(is_public_route("/api/auth/identify"));
        assert!(is_public_route("/api/auth/verify"));
        assert!(!is_public_route("/api/auth/session"));
        assert!(!is_public_route("/api/executions"));
    }
}
