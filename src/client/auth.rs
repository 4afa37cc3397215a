use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::debug;

use crate::client::session::{Session, SessionStore, StoredUser};

/// Hard-coded admin gate. This is a client-side check only; the server has
/// no matching authorization on the user listing.
pub const ADMIN_EMAIL: &str = "admin@example.com";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with an error body; its message is surfaced
    /// verbatim, ready for a form banner.
    #[error("{0}")]
    Api(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("not logged in")]
    NoSession,
    #[error(transparent)]
    Session(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
struct RegisterBody<'a> {
    username: &'a str,
    email: &'a str,
    phone: Option<&'a str>,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthPayload {
    token: String,
    user: StoredUser,
}

/// Profile as returned by GET /profile, including the creation time.
#[derive(Debug, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
struct ProfilePayload {
    user: Profile,
}

/// Client-side wrapper over the auth HTTP contract. Successful register and
/// login persist the returned token and user locally; profile reuses the
/// stored token.
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    store: SessionStore,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>, store: SessionStore) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            store,
        }
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        phone: Option<&str>,
        password: &str,
    ) -> Result<Session, ClientError> {
        let response = self
            .http
            .post(format!("{}/register", self.base_url))
            .json(&RegisterBody {
                username,
                email,
                phone,
                password,
            })
            .send()
            .await?;

        let payload: AuthPayload = read_or_api_error(response, "Registration failed").await?;
        let session = Session {
            token: payload.token,
            user: payload.user,
        };
        self.store.save(&session)?;
        debug!(username, "registered and stored session");
        Ok(session)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let response = self
            .http
            .post(format!("{}/login", self.base_url))
            .json(&LoginBody { email, password })
            .send()
            .await?;

        let payload: AuthPayload = read_or_api_error(response, "Login failed").await?;
        let session = Session {
            token: payload.token,
            user: payload.user,
        };
        self.store.save(&session)?;
        debug!(email, "logged in and stored session");
        Ok(session)
    }

    pub async fn profile(&self) -> Result<Profile, ClientError> {
        let token = self.token().ok_or(ClientError::NoSession)?;
        let response = self
            .http
            .get(format!("{}/profile", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;

        let payload: ProfilePayload =
            read_or_api_error(response, "Failed to fetch profile").await?;
        Ok(payload.user)
    }

    /// Purely local: drops the stored session. The token itself stays valid
    /// until it expires, since the server has no revocation path.
    pub fn logout(&self) {
        self.store.clear();
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.load().is_some()
    }

    pub fn current_user(&self) -> Option<StoredUser> {
        self.store.load().map(|s| s.user)
    }

    pub fn token(&self) -> Option<String> {
        self.store.load().map(|s| s.token)
    }

    /// True when the logged-in email matches the hard-coded admin address.
    pub fn is_admin(&self) -> bool {
        self.current_user()
            .map(|u| u.email == ADMIN_EMAIL)
            .unwrap_or(false)
    }
}

/// Decode a success body, or turn an error response into `ClientError::Api`
/// carrying the server's own `error` text when present.
async fn read_or_api_error<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    fallback: &str,
) -> Result<T, ClientError> {
    if response.status().is_success() {
        return Ok(response.json::<T>().await?);
    }
    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| fallback.to_string());
    Err(ClientError::Api(message))
}
