use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};

/// JWT payload used for authentication. Fixed identity fields rather than an
/// open-ended map, so handlers get compile-time field guarantees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,         // user ID
    pub username: String, // username at issuance
    pub email: String,    // email at issuance
    pub iat: usize,       // issued at (unix timestamp)
    pub exp: usize,       // expires at (unix timestamp)
}

impl Claims {
    pub fn new(
        sub: i64,
        username: &str,
        email: &str,
        issued_at: OffsetDateTime,
        ttl: Duration,
    ) -> Self {
        let expires_at = issued_at + TimeDuration::seconds(ttl.as_secs() as i64);
        Self {
            sub,
            username: username.to_string(),
            email: email.to_string(),
            iat: issued_at.unix_timestamp() as usize,
            exp: expires_at.unix_timestamp() as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_is_issuance_plus_ttl() {
        let issued = OffsetDateTime::now_utc();
        let claims = Claims::new(
            7,
            "alice",
            "alice@example.com",
            issued,
            Duration::from_secs(24 * 3600),
        );
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }
}
