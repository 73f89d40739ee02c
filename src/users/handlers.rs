use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::jwt::{AdminUser, AuthUser},
    error::AppError,
    state::AppState,
    users::{
        dto::{PublicUser, UpdateProfileRequest},
        repo::User,
    },
};

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me).put(update_me))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/users/:id", delete(delete_user))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::Unauthorized("user no longer exists"))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<PublicUser>, AppError> {
    let changes = payload.validated()?;

    // Stealing a taken username/email fails on the unique constraint → 409.
    let user = User::update_profile(
        &state.db,
        user_id,
        &changes.username,
        changes.email.as_deref(),
        changes.bio.as_deref(),
    )
    .await?
    .ok_or(AppError::Unauthorized("user no longer exists"))?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(user.into()))
}

/// Cascades: the user's screenings, their recommendations, and coping logs
/// all go with the row.
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if id == admin_id {
        warn!(admin_id = %admin_id, "admin tried to delete own account");
        return Err(AppError::Validation(
            "admins cannot delete their own account".into(),
        ));
    }

    if !User::delete(&state.db, id).await? {
        return Err(AppError::NotFound("user"));
    }

    info!(admin_id = %admin_id, deleted_user_id = %id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
