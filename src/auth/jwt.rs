use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::OffsetDateTime;
use tracing::debug;

use crate::auth::claims::Claims;
use crate::auth::repo_types::User;
use crate::config::JwtConfig;
use crate::state::AppState;

/// Signing/verification keys plus the token lifetime, built once from config
/// and injected through state. Handlers never read ambient globals.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig { secret, ttl_hours } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::from_secs(ttl_hours as u64 * 3600),
        }
    }
}

impl JwtKeys {
    /// Mint a token for the given user, stamping issuance and expiry.
    pub fn sign(&self, user: &User) -> anyhow::Result<String> {
        let claims = Claims::new(
            user.id,
            &user.username,
            &user.email,
            OffsetDateTime::now_utc(),
            self.ttl,
        );
        let token = self.encode(&claims)?;
        debug!(user_id = user.id, "jwt signed");
        Ok(token)
    }

    fn encode(&self, claims: &Claims) -> anyhow::Result<String> {
        Ok(encode(&Header::default(), claims, &self.encoding)?)
    }

    /// Decode a token, checking signature and expiry in one step. A bad
    /// signature, a tampered payload, and an elapsed expiry are all the same
    /// error to the caller.
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        debug!(user_id = data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        keys_with_secret("test-secret")
    }

    fn keys_with_secret(secret: &str) -> JwtKeys {
        JwtKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::from_secs(24 * 3600),
        }
    }

    fn make_user() -> User {
        let now = OffsetDateTime::now_utc();
        User {
            id: 42,
            username: "alice".into(),
            email: "alice@example.com".into(),
            phone: None,
            password_hash: "irrelevant".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn sign_then_verify_preserves_claims() {
        let keys = make_keys();
        let user = make_user();
        let token = keys.sign(&user).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let good = keys_with_secret("secret-a");
        let bad = keys_with_secret("secret-b");
        let token = good.sign(&make_user()).expect("sign");
        assert!(bad.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_garbage_token() {
        let keys = make_keys();
        assert!(keys.verify("not.a.jwt").is_err());
    }

    #[test]
    fn verify_rejects_expired_token() {
        let keys = make_keys();
        // Issued two days ago with a 24h ttl, so well past any leeway.
        let issued = OffsetDateTime::now_utc() - time::Duration::days(2);
        let claims = Claims::new(
            42,
            "alice",
            "alice@example.com",
            issued,
            Duration::from_secs(24 * 3600),
        );
        let token = keys.encode(&claims).expect("encode");
        assert!(keys.verify(&token).is_err());
    }
}
