//! JWT-based session extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use teckel_core::error::CoreError;
use teckel_core::roles::{current_role, Role, Session};

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated session extracted from a Bearer token in the `Authorization`
/// header. Rejects the request with 401 when the header is missing.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub session: Session,
    pub role: Role,
}

impl AuthUser {
    pub fn subject(&self) -> &str {
        &self.session.subject
    }
}

/// Resolved caller of a public-or-admin endpoint.
///
/// No `Authorization` header means [`Role::Anonymous`]. A header carrying an
/// invalid or expired token is rejected with 401 rather than downgraded.
#[derive(Debug, Clone)]
pub struct Caller {
    pub session: Option<Session>,
    pub role: Role,
}

/// Verify the Bearer token of the request, if any.
fn session_from_parts(parts: &Parts, state: &AppState) -> Result<Option<Session>, AppError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let token = header
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

    let claims = validate_token(token, &state.config.jwt).map_err(|e| {
        tracing::debug!(error = %e, "Rejected session token");
        AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
    })?;

    Ok(Some(claims.into_session()))
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = session_from_parts(parts, state)?;
        let role = current_role(session.as_ref());
        Ok(Caller { session, role })
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = session_from_parts(parts, state)?.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing Authorization header".into(),
            ))
        })?;
        let role = current_role(Some(&session));
        Ok(AuthUser { session, role })
    }
}
