use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use time::format_description::well_known::Rfc3339;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::AppError,
    screenings::{
        analytics::{summarize, AnalyticsSummary, ScreeningSnapshot},
        dto::{
            ExtendedScreeningRequest, Pagination, QuickScreeningRequest, ScreeningListItem,
            ScreeningResult,
        },
        repo::{NewScreening, Screening},
        scoring::{score_extended, score_quick},
        suggestions::suggestions_for,
    },
    state::AppState,
};

/// Analytics looks at the most recent screenings, not the full history.
const ANALYTICS_WINDOW: i64 = 100;

pub fn screening_routes() -> Router<AppState> {
    Router::new()
        .route("/screenings/quick", post(submit_quick))
        .route("/screenings/extended", post(submit_extended))
        .route("/screenings", get(list_screenings))
        .route("/screenings/export", get(export_csv))
        .route("/screenings/:id", get(get_screening))
        .route("/analytics", get(get_analytics))
}

#[instrument(skip(state, payload))]
pub async fn submit_quick(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<QuickScreeningRequest>,
) -> Result<(StatusCode, Json<ScreeningResult>), AppError> {
    let answers = payload.validated()?;
    let outcome = score_quick(&answers);
    let suggestions = suggestions_for(outcome.level);

    let (screening, recommendations) = Screening::create_with_recommendations(
        &state.db,
        user_id,
        NewScreening {
            score: outcome.score,
            level: outcome.level,
            sub_scores: None,
            notes: None,
        },
        suggestions,
    )
    .await?;

    info!(user_id = %user_id, screening_id = %screening.id, score = screening.score,
          level = %screening.level, "quick screening recorded");
    Ok((
        StatusCode::CREATED,
        Json(ScreeningResult::from_parts(screening, recommendations)),
    ))
}

#[instrument(skip(state, payload))]
pub async fn submit_extended(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ExtendedScreeningRequest>,
) -> Result<(StatusCode, Json<ScreeningResult>), AppError> {
    let (answers, notes) = payload.validated()?;
    let outcome = score_extended(&answers);
    let suggestions = suggestions_for(outcome.level);

    let (screening, recommendations) = Screening::create_with_recommendations(
        &state.db,
        user_id,
        NewScreening {
            score: outcome.score,
            level: outcome.level,
            sub_scores: outcome.sub_scores,
            notes: notes.as_deref(),
        },
        suggestions,
    )
    .await?;

    info!(user_id = %user_id, screening_id = %screening.id, score = screening.score,
          level = %screening.level, "extended screening recorded");
    Ok((
        StatusCode::CREATED,
        Json(ScreeningResult::from_parts(screening, recommendations)),
    ))
}

#[instrument(skip(state))]
pub async fn list_screenings(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<ScreeningListItem>>, AppError> {
    let rows = Screening::list_by_user(&state.db, user_id, p.limit, p.offset).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn get_screening(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ScreeningResult>, AppError> {
    let screening = Screening::find_for_user(&state.db, user_id, id)
        .await?
        .ok_or(AppError::NotFound("screening"))?;
    let recommendations = Screening::recommendations(&state.db, screening.id).await?;
    Ok(Json(ScreeningResult::from_parts(screening, recommendations)))
}

#[instrument(skip(state))]
pub async fn export_csv(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let rows = Screening::export_by_user(&state.db, user_id).await?;
    let body = render_csv(&rows)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"screenings.csv\"",
            ),
        ],
        body,
    ))
}

#[instrument(skip(state))]
pub async fn get_analytics(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<AnalyticsSummary>, AppError> {
    // list_by_user returns newest-first, the order summarize expects.
    let rows = Screening::list_by_user(&state.db, user_id, ANALYTICS_WINDOW, 0).await?;
    let window: Vec<ScreeningSnapshot> = rows
        .iter()
        .map(|s| ScreeningSnapshot {
            score: s.score,
            level: s.level,
            created_at: s.created_at,
        })
        .collect();
    Ok(Json(summarize(&window)))
}

const CSV_HEADER: &str = "date,score,level,stress,anxiety,sleep,depression,social,notes";

/// Rows arrive oldest-first; each screening becomes one line.
fn render_csv(rows: &[Screening]) -> Result<String, AppError> {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for row in rows {
        let date = row
            .created_at
            .format(&Rfc3339)
            .map_err(|e| anyhow::anyhow!("format timestamp: {e}"))?;
        let cells = [
            date,
            row.score.to_string(),
            row.level.label().to_string(),
            optional_cell(row.stress_score),
            optional_cell(row.anxiety_score),
            optional_cell(row.sleep_score),
            optional_cell(row.depression_score),
            optional_cell(row.social_score),
            csv_field(row.notes.as_deref().unwrap_or("")),
        ];
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    Ok(out)
}

fn optional_cell(value: Option<i32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Quotes a field when it contains a delimiter, quote or line break;
/// embedded quotes are doubled.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screenings::scoring::{Level, SubScores};
    use time::macros::datetime;

    fn row(
        score: i32,
        level: Level,
        sub_scores: Option<SubScores>,
        notes: Option<&str>,
        created_at: time::OffsetDateTime,
    ) -> Screening {
        Screening {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            score,
            level,
            stress_score: sub_scores.map(|s| s.stress),
            anxiety_score: sub_scores.map(|s| s.anxiety),
            sleep_score: sub_scores.map(|s| s.sleep),
            depression_score: sub_scores.map(|s| s.depression),
            social_score: sub_scores.map(|s| s.social),
            notes: notes.map(String::from),
            created_at,
        }
    }

    #[test]
    fn csv_has_header_and_one_line_per_row() {
        let rows = vec![
            row(3, Level::Low, None, None, datetime!(2026-01-02 09:00 UTC)),
            row(
                12,
                Level::Moderate,
                Some(SubScores {
                    stress: 3,
                    anxiety: 2,
                    sleep: 4,
                    depression: 1,
                    social: 2,
                }),
                Some("slept badly"),
                datetime!(2026-01-09 09:00 UTC),
            ),
        ];
        let csv = render_csv(&rows).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "2026-01-02T09:00:00Z,3,Low,,,,,,");
        assert_eq!(lines[2], "2026-01-09T09:00:00Z,12,Moderate,3,2,4,1,2,slept badly");
    }

    #[test]
    fn csv_quotes_awkward_notes() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn empty_history_exports_just_the_header() {
        let csv = render_csv(&[]).unwrap();
        assert_eq!(csv, format!("{CSV_HEADER}\n"));
    }
}
