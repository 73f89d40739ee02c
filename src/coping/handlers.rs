use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::jwt::AuthUser,
    coping::{
        dto::{CopingLogItem, CreateCopingLogRequest},
        repo::CopingLog,
    },
    error::AppError,
    screenings::dto::Pagination,
    state::AppState,
};

pub fn coping_routes() -> Router<AppState> {
    Router::new().route("/coping-logs", post(create_log).get(list_logs))
}

#[instrument(skip(state, payload))]
pub async fn create_log(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateCopingLogRequest>,
) -> Result<(StatusCode, Json<CopingLogItem>), AppError> {
    let new = payload.validated()?;
    let log = CopingLog::create(&state.db, user_id, &new).await?;

    info!(user_id = %user_id, log_id = %log.id, "coping log recorded");
    Ok((StatusCode::CREATED, Json(log.into())))
}

#[instrument(skip(state))]
pub async fn list_logs(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<CopingLogItem>>, AppError> {
    let logs = CopingLog::list_by_user(&state.db, user_id, p.limit, p.offset).await?;
    Ok(Json(logs.into_iter().map(Into::into).collect()))
}
