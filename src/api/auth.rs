use super::error::ApiError;
use super::AppState;
use crate::auth::AuthUser;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

/// Extractor that validates the request's bearer token against the hosted
/// auth service and yields the authenticated user.
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::message("No authorization header"))?;

        let token = header.strip_prefix("Bearer ").unwrap_or(header);
        let user = state.auth.get_user(token).await?;
        Ok(CurrentUser(user))
    }
}
