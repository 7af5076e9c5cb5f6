use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{app_state::AppState, domain::models::UserId, routes::ApiError};

const TOKEN_SCHEMES: [&str; 2] = ["Token", "Bearer"];

/// A custom Axum extractor that resolves the `Authorization: Token <key>`
/// header to the authenticated user. Returns 401 Unauthorized otherwise.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: UserId,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_token)
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

        let id = state
            .authenticator
            .authenticate(token)
            .await
            .map_err(|err| {
                tracing::error!("Token lookup failed: {}", err);
                ApiError::internal("authentication failed")
            })?
            .ok_or_else(|| ApiError::unauthorized("Invalid token"))?;

        Ok(AuthUser { id })
    }
}

fn parse_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();

    let known_scheme = TOKEN_SCHEMES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(scheme));

    (known_scheme && !token.is_empty()).then_some(token)
}
