use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, DbTestResponse, LoginRequest, ProfileResponse, ProfileUser, PublicUser,
            RegisterRequest, UsersResponse,
        },
        extractors::AuthUser,
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo,
        repo_types::User,
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/profile", get(profile))
        .route("/auth/users", get(list_users))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    if payload.username.is_empty() || payload.email.is_empty() || payload.password.is_empty() {
        warn!("register missing required fields");
        return Err(ApiError::Validation(
            "Username, email, and password are required".into(),
        ));
    }

    // Friendly duplicate check before the insert. The table's unique
    // constraints still arbitrate concurrent registrations below.
    if User::find_by_username_or_email(&state.db, &payload.username, &payload.email)
        .await?
        .is_some()
    {
        warn!(email = %payload.email, username = %payload.username, "register duplicate identity");
        return Err(ApiError::Conflict("User already exists".into()));
    }

    let hash = hash_password(&payload.password)?;

    let user = match User::create(
        &state.db,
        &payload.username,
        &payload.email,
        payload.phone.as_deref(),
        &hash,
    )
    .await
    {
        Ok(user) => user,
        Err(err) if repo::is_unique_violation(&err) => {
            warn!(email = %payload.email, "register lost uniqueness race");
            return Err(ApiError::Conflict("User already exists".into()));
        }
        Err(err) => return Err(err.into()),
    };

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(&user)?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".into(),
            token,
            user: PublicUser::from(&user),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if payload.email.is_empty() || payload.password.is_empty() {
        warn!("login missing required fields");
        return Err(ApiError::Validation(
            "Email and password are required".into(),
        ));
    }

    // Unknown email and wrong password get the identical message, so a
    // caller cannot enumerate accounts.
    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(user) => user,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::Auth("Invalid email or password".into()));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(ApiError::Auth("Invalid email or password".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(&user)?;

    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        message: "Login successful".into(),
        token,
        user: PublicUser::from(&user),
    }))
}

#[instrument(skip(state, claims))]
pub async fn profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| {
            warn!(user_id = claims.sub, "profile for deleted user");
            ApiError::NotFound("User not found".into())
        })?;

    Ok(Json(ProfileResponse {
        user: ProfileUser::from(&user),
    }))
}

/// Debug-only listing with no access control. Do not expose in production.
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<UsersResponse>, ApiError> {
    let users = User::list_all(&state.db).await?;
    let users: Vec<ProfileUser> = users.iter().map(ProfileUser::from).collect();

    Ok(Json(UsersResponse {
        message: format!("Found {} user(s)", users.len()),
        total_users: users.len(),
        users,
    }))
}

#[instrument(skip(state))]
pub async fn db_test(State(state): State<AppState>) -> Result<Json<DbTestResponse>, ApiError> {
    let (now,): (time::OffsetDateTime,) = sqlx::query_as("SELECT now()")
        .fetch_one(&state.db)
        .await?;

    Ok(Json(DbTestResponse {
        message: "Database connected".into(),
        time: now,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    // The presence checks run before any DB access, so these handlers can be
    // driven against a lazy pool that never connects.

    #[tokio::test]
    async fn register_with_empty_body_is_a_validation_error() {
        let state = AppState::fake();
        let payload: RegisterRequest = serde_json::from_str("{}").unwrap();
        match register(State(state), Json(payload)).await {
            Err(ApiError::Validation(msg)) => {
                assert_eq!(msg, "Username, email, and password are required")
            }
            other => panic!("expected Validation error, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn register_with_any_required_field_absent_is_rejected() {
        let state = AppState::fake();
        let payload: RegisterRequest = serde_json::from_str(
            r#"{"username": "alice", "password": "secret123"}"#,
        )
        .unwrap();
        match register(State(state), Json(payload)).await {
            Err(ApiError::Validation(msg)) => {
                assert_eq!(msg, "Username, email, and password are required")
            }
            other => panic!("expected Validation error, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn login_with_missing_fields_is_a_validation_error() {
        let state = AppState::fake();
        let payload: LoginRequest = serde_json::from_str("{}").unwrap();
        match login(State(state), Json(payload)).await {
            Err(ApiError::Validation(msg)) => {
                assert_eq!(msg, "Email and password are required")
            }
            other => panic!("expected Validation error, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn login_with_empty_password_is_a_validation_error() {
        let state = AppState::fake();
        let payload: LoginRequest =
            serde_json::from_str(r#"{"email": "alice@example.com", "password": ""}"#).unwrap();
        match login(State(state), Json(payload)).await {
            Err(ApiError::Validation(msg)) => {
                assert_eq!(msg, "Email and password are required")
            }
            other => panic!("expected Validation error, got {:?}", other.err()),
        }
    }
}
