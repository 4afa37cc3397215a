use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::auth::claims::Claims;
use crate::auth::jwt::JwtKeys;
use crate::error::ApiError;
use crate::state::AppState;

/// Extracts and verifies the bearer token, handing decoded claims to the
/// handler. A missing token is 401; a token that fails signature or expiry
/// checks is 403.
pub struct AuthUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.split_once(' ').map(|(_, t)| t))
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Auth("Access token required".into()))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|_| {
            warn!("invalid or expired token");
            ApiError::Forbidden("Invalid or expired token".into())
        })?;

        Ok(AuthUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, Request};

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/auth/profile");
        if let Some(v) = value {
            builder = builder.header(header::AUTHORIZATION, v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let state = AppState::fake();
        let mut parts = parts_with_auth(None);
        match AuthUser::from_request_parts(&mut parts, &state).await {
            Err(ApiError::Auth(msg)) => assert_eq!(msg, "Access token required"),
            other => panic!("expected Auth error, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn scheme_without_token_is_unauthorized() {
        let state = AppState::fake();
        let mut parts = parts_with_auth(Some("Bearer"));
        match AuthUser::from_request_parts(&mut parts, &state).await {
            Err(ApiError::Auth(msg)) => assert_eq!(msg, "Access token required"),
            other => panic!("expected Auth error, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn garbage_token_is_forbidden() {
        let state = AppState::fake();
        let mut parts = parts_with_auth(Some("Bearer definitely-not-a-jwt"));
        match AuthUser::from_request_parts(&mut parts, &state).await {
            Err(ApiError::Forbidden(msg)) => assert_eq!(msg, "Invalid or expired token"),
            other => panic!("expected Forbidden error, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn valid_token_yields_claims() {
        use crate::auth::repo_types::User;
        use time::OffsetDateTime;

        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: 9,
            username: "alice".into(),
            email: "alice@example.com".into(),
            phone: None,
            password_hash: "irrelevant".into(),
            created_at: now,
            updated_at: now,
        };
        let token = keys.sign(&user).expect("sign");

        let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));
        let AuthUser(claims) = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .expect("valid token should extract");
        assert_eq!(claims.sub, 9);
        assert_eq!(claims.username, "alice");
    }
}
