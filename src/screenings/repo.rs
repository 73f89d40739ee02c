use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::screenings::{
    scoring::{Level, SubScores},
    suggestions::{Suggestion, SuggestionCategory},
};

/// Screening record in the database. Sub-scores are present only for the
/// extended form; rows are never updated once written.
#[derive(Debug, Clone, FromRow)]
pub struct Screening {
    pub id: Uuid,
    pub user_id: Uuid,
    pub score: i32,
    pub level: Level,
    pub stress_score: Option<i32>,
    pub anxiety_score: Option<i32>,
    pub sleep_score: Option<i32>,
    pub depression_score: Option<i32>,
    pub social_score: Option<i32>,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
}

impl Screening {
    /// The five components as a unit, when this was an extended screening.
    pub fn sub_scores(&self) -> Option<SubScores> {
        Some(SubScores {
            stress: self.stress_score?,
            anxiety: self.anxiety_score?,
            sleep: self.sleep_score?,
            depression: self.depression_score?,
            social: self.social_score?,
        })
    }
}

/// Recommendation persisted against a screening, in the order it was shown.
#[derive(Debug, Clone, FromRow)]
pub struct Recommendation {
    pub id: Uuid,
    pub screening_id: Uuid,
    pub ordinal: i32,
    pub category: SuggestionCategory,
    pub title: String,
    pub description: String,
    pub url: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Fields of a screening about to be written.
#[derive(Debug)]
pub struct NewScreening<'a> {
    pub score: i32,
    pub level: Level,
    pub sub_scores: Option<SubScores>,
    pub notes: Option<&'a str>,
}

const SCREENING_COLUMNS: &str = "id, user_id, score, level, stress_score, anxiety_score, \
                                 sleep_score, depression_score, social_score, notes, created_at";

impl Screening {
    /// Writes the screening and the recommendations it was answered with in
    /// one transaction; a failure on either leaves nothing behind.
    pub async fn create_with_recommendations(
        db: &PgPool,
        user_id: Uuid,
        new: NewScreening<'_>,
        suggestions: &[Suggestion],
    ) -> sqlx::Result<(Screening, Vec<Recommendation>)> {
        let mut tx = db.begin().await?;

        let screening = sqlx::query_as::<_, Screening>(&format!(
            r#"
            INSERT INTO screenings
                (user_id, score, level, stress_score, anxiety_score, sleep_score,
                 depression_score, social_score, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {SCREENING_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(new.score)
        .bind(new.level)
        .bind(new.sub_scores.map(|s| s.stress))
        .bind(new.sub_scores.map(|s| s.anxiety))
        .bind(new.sub_scores.map(|s| s.sleep))
        .bind(new.sub_scores.map(|s| s.depression))
        .bind(new.sub_scores.map(|s| s.social))
        .bind(new.notes)
        .fetch_one(&mut *tx)
        .await?;

        let mut recommendations = Vec::with_capacity(suggestions.len());
        for (ordinal, suggestion) in suggestions.iter().enumerate() {
            let rec = sqlx::query_as::<_, Recommendation>(
                r#"
                INSERT INTO recommendations
                    (screening_id, ordinal, category, title, description, url)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, screening_id, ordinal, category, title, description, url, created_at
                "#,
            )
            .bind(screening.id)
            .bind(ordinal as i32)
            .bind(suggestion.category)
            .bind(suggestion.title)
            .bind(suggestion.description)
            .bind(suggestion.url)
            .fetch_one(&mut *tx)
            .await?;
            recommendations.push(rec);
        }

        tx.commit().await?;
        Ok((screening, recommendations))
    }

    /// History page, newest first.
    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<Vec<Screening>> {
        sqlx::query_as::<_, Screening>(&format!(
            r#"
            SELECT {SCREENING_COLUMNS}
            FROM screenings
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
    }

    /// One screening, scoped to its owner.
    pub async fn find_for_user(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> sqlx::Result<Option<Screening>> {
        sqlx::query_as::<_, Screening>(&format!(
            r#"
            SELECT {SCREENING_COLUMNS}
            FROM screenings
            WHERE id = $1 AND user_id = $2
            "#
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    /// The recommendations persisted with a screening, in presentation order.
    pub async fn recommendations(
        db: &PgPool,
        screening_id: Uuid,
    ) -> sqlx::Result<Vec<Recommendation>> {
        sqlx::query_as::<_, Recommendation>(
            r#"
            SELECT id, screening_id, ordinal, category, title, description, url, created_at
            FROM recommendations
            WHERE screening_id = $1
            ORDER BY ordinal ASC
            "#,
        )
        .bind(screening_id)
        .fetch_all(db)
        .await
    }

    /// The whole history oldest-first, the order the CSV export wants.
    pub async fn export_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<Screening>> {
        sqlx::query_as::<_, Screening>(&format!(
            r#"
            SELECT {SCREENING_COLUMNS}
            FROM screenings
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#
        ))
        .bind(user_id)
        .fetch_all(db)
        .await
    }
}
