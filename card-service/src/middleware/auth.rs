use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Basic, Authorization, HeaderMapExt};
use service_core::error::AppError;

use crate::models::Principal;
use crate::services::{Credentials, ServiceError};
use crate::AppState;

/// Resolve HTTP Basic credentials to a [`Principal`] and attach it to the
/// request. Absent, malformed, and unknown credentials are all a 401.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(Authorization(basic)) = req.headers().typed_get::<Authorization<Basic>>() else {
        tracing::debug!("Request without basic credentials");
        return Err(ServiceError::MissingCredentials.into());
    };

    let credentials = Credentials::new(basic.username(), basic.password());
    let principal = state
        .credentials
        .authenticate(credentials)
        .await
        .map_err(|e| {
            tracing::debug!(username = %basic.username(), "Authentication failed");
            e
        })?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Reject principals without the configured role. Runs after [`authenticate`].
pub async fn require_role(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let required = &state.config.auth.required_role;

    let Some(principal) = req.extensions().get::<Principal>() else {
        return Err(ServiceError::MissingCredentials.into());
    };

    if !principal.has_role(required) {
        tracing::debug!(principal = %principal.name, role = %required, "Role check failed");
        return Err(ServiceError::MissingRole(required.clone()).into());
    }

    Ok(next.run(req).await)
}

/// The authenticated caller, for handlers behind [`authenticate`].
pub struct AuthUser(pub Principal);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = parts.extensions.get::<Principal>().ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!(
                "Principal missing from request extensions"
            ))
        })?;

        Ok(AuthUser(principal.clone()))
    }
}
