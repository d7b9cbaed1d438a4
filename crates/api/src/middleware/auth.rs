//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use reelshelf_core::error::CoreError;
use reelshelf_core::types::OwnerId;

use crate::auth::jwt::{validate_token, JwtConfig};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller extracted from the `Authorization: Bearer` header.
///
/// Handlers pass [`AuthUser::owner`] to the movie service; they never see
/// the token itself.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub owner: OwnerId,
}

impl AuthUser {
    /// Resolve the caller from a raw `Authorization` header value.
    pub fn from_header(header: Option<&str>, jwt: &JwtConfig) -> Result<Self, CoreError> {
        let header =
            header.ok_or_else(|| CoreError::Unauthorized("Missing Authorization header".into()))?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            CoreError::Unauthorized("Invalid Authorization format. Expected: Bearer <token>".into())
        })?;

        let claims = validate_token(token.trim(), jwt)
            .map_err(|_| CoreError::Unauthorized("Invalid or expired token".into()))?;

        Ok(AuthUser {
            owner: OwnerId(claims.sub),
        })
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        Ok(AuthUser::from_header(header, &state.config.jwt)?)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::auth::jwt::generate_access_token;

    fn jwt() -> JwtConfig {
        JwtConfig {
            secret: "extractor-test-secret".into(),
            access_token_expiry_mins: 5,
        }
    }

    #[test]
    fn bearer_token_yields_owner() {
        let token = generate_access_token(7, &jwt()).unwrap();
        let user = AuthUser::from_header(Some(&format!("Bearer {token}")), &jwt()).unwrap();
        assert_eq!(user.owner, OwnerId(7));
    }

    #[test]
    fn missing_header_is_unauthorized() {
        assert_matches!(AuthUser::from_header(None, &jwt()), Err(CoreError::Unauthorized(_)));
    }

    #[test]
    fn non_bearer_scheme_is_unauthorized() {
        assert_matches!(
            AuthUser::from_header(Some("Basic dXNlcjpwYXNz"), &jwt()),
            Err(CoreError::Unauthorized(_))
        );
    }

    #[test]
    fn tampered_token_is_unauthorized() {
        let token = generate_access_token(7, &jwt()).unwrap();
        let tampered = format!("Bearer {token}x");
        assert_matches!(
            AuthUser::from_header(Some(&tampered), &jwt()),
            Err(CoreError::Unauthorized(_))
        );
    }
}
