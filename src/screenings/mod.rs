use crate::state::AppState;
use axum::Router;

pub mod analytics;
pub mod dto;
pub mod handlers;
pub mod repo;
pub mod scoring;
pub mod suggestions;

pub fn router() -> Router<AppState> {
    handlers::screening_routes()
}
