use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, ChangePasswordRequest, LoginRequest, RefreshRequest, RegisterRequest,
        },
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, verify_password},
    },
    error::AppError,
    state::AppState,
    users::{
        dto::{normalize_email, normalize_username},
        repo::User,
    },
};

const MIN_PASSWORD_LEN: usize = 6;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/change-password", post(change_password))
}

fn check_new_password(password: &str, confirmation: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if password != confirmation {
        return Err(AppError::Validation("passwords do not match".into()));
    }
    Ok(())
}

fn token_pair(state: &AppState, user: &User) -> Result<(String, String), AppError> {
    let keys = JwtKeys::from_ref(state);
    let access = keys.sign_access(user.id, user.role)?;
    let refresh = keys.sign_refresh(user.id, user.role)?;
    Ok((access, refresh))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let username = normalize_username(&payload.username)?;
    let email = normalize_email(payload.email)?;
    check_new_password(&payload.password, &payload.password_confirmation)?;

    let hash = hash_password(&payload.password)?;

    // A duplicate username or email loses at the unique constraint and comes
    // back as a 409; no pre-check, so concurrent registrations race safely.
    let user = User::create(&state.db, &username, email.as_deref(), &hash).await?;

    let (access_token, refresh_token) = token_pair(&state, &user)?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            access_token,
            refresh_token,
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let identifier = payload.identifier.trim();

    let user = match User::find_by_identifier(&state.db, identifier).await? {
        Some(u) => u,
        None => {
            warn!("login with unknown identifier");
            return Err(AppError::Unauthorized("invalid credentials"));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(AppError::Unauthorized("invalid credentials"));
    }

    let (access_token, refresh_token) = token_pair(&state, &user)?;

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: user.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|_| AppError::Unauthorized("invalid refresh token"))?;

    // Reload the user so a new pair reflects the current role, not the role
    // at the time the refresh token was minted.
    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or(AppError::Unauthorized("user no longer exists"))?;

    let (access_token, refresh_token) = token_pair(&state, &user)?;

    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: user.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    check_new_password(&payload.new_password, &payload.new_password_confirmation)?;

    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::Unauthorized("user no longer exists"))?;

    if !verify_password(&payload.current_password, &user.password_hash)? {
        warn!(user_id = %user.id, "change-password with wrong current password");
        return Err(AppError::Unauthorized("current password is incorrect"));
    }

    let hash = hash_password(&payload.new_password)?;
    User::update_password(&state.db, user.id, &hash).await?;

    info!(user_id = %user.id, "password changed");
    Ok(StatusCode::NO_CONTENT)
}
