//! Bearer-token guard for the admin surface.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use canvass_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Proof of admin access, extracted from a Bearer token in the
/// `Authorization` header and compared against the configured
/// `ADMIN_TOKEN`.
///
/// Use this as an extractor parameter in any handler on the admin surface:
///
/// ```ignore
/// async fn my_handler(_admin: AdminAccess) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AdminAccess;

impl FromRequestParts<AppState> for AdminAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        if token != state.config.admin_token {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid admin token".into(),
            )));
        }

        Ok(AdminAccess)
    }
}
