use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    error::AppError,
    screenings::{
        repo::{Recommendation, Screening},
        scoring::{Answer, ExtendedAnswers, Level, SubScores, CATEGORY_QUESTIONS, QUICK_QUESTIONS},
        suggestions::SuggestionCategory,
    },
};

pub const MAX_NOTES_LEN: usize = 500;

/// Quick form: exactly 3 answers, each 0-2.
#[derive(Debug, Deserialize)]
pub struct QuickScreeningRequest {
    pub answers: Vec<i32>,
}

impl QuickScreeningRequest {
    pub fn validated(self) -> Result<[Answer; QUICK_QUESTIONS], AppError> {
        let answers = parse_answers::<QUICK_QUESTIONS>("answers", &self.answers)?;
        Ok(answers)
    }
}

/// Extended form: five named categories of exactly 2 answers each, plus
/// optional free-text notes.
#[derive(Debug, Deserialize)]
pub struct ExtendedScreeningRequest {
    pub stress: Vec<i32>,
    pub anxiety: Vec<i32>,
    pub sleep: Vec<i32>,
    pub depression: Vec<i32>,
    pub social: Vec<i32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ExtendedScreeningRequest {
    pub fn validated(self) -> Result<(ExtendedAnswers, Option<String>), AppError> {
        let answers = ExtendedAnswers {
            stress: parse_answers::<CATEGORY_QUESTIONS>("stress", &self.stress)?,
            anxiety: parse_answers::<CATEGORY_QUESTIONS>("anxiety", &self.anxiety)?,
            sleep: parse_answers::<CATEGORY_QUESTIONS>("sleep", &self.sleep)?,
            depression: parse_answers::<CATEGORY_QUESTIONS>("depression", &self.depression)?,
            social: parse_answers::<CATEGORY_QUESTIONS>("social", &self.social)?,
        };
        let notes = normalize_notes(self.notes)?;
        Ok((answers, notes))
    }
}

fn parse_answers<const N: usize>(field: &str, raw: &[i32]) -> Result<[Answer; N], AppError> {
    if raw.len() != N {
        return Err(AppError::Validation(format!(
            "{field} must contain exactly {} answers",
            N
        )));
    }
    let mut answers = [Answer::ZERO; N];
    for (slot, &value) in answers.iter_mut().zip(raw) {
        *slot = Answer::new(value).ok_or_else(|| {
            AppError::Validation(format!("{field} answers must be 0, 1 or 2, got {value}"))
        })?;
    }
    Ok(answers)
}

fn normalize_notes(raw: Option<String>) -> Result<Option<String>, AppError> {
    let notes = match raw {
        Some(n) => n.trim().to_string(),
        None => return Ok(None),
    };
    if notes.is_empty() {
        return Ok(None);
    }
    if notes.chars().count() > MAX_NOTES_LEN {
        return Err(AppError::Validation(format!(
            "notes must be at most {MAX_NOTES_LEN} characters"
        )));
    }
    Ok(Some(notes))
}

/// One recommendation as shown to the client.
#[derive(Debug, Serialize)]
pub struct RecommendationDto {
    pub category: SuggestionCategory,
    pub title: String,
    pub description: String,
    pub url: Option<String>,
}

impl From<Recommendation> for RecommendationDto {
    fn from(rec: Recommendation) -> Self {
        Self {
            category: rec.category,
            title: rec.title,
            description: rec.description,
            url: rec.url,
        }
    }
}

/// Full screening result: the stored record plus its recommendations.
#[derive(Debug, Serialize)]
pub struct ScreeningResult {
    pub id: Uuid,
    pub score: i32,
    pub level: Level,
    pub sub_scores: Option<SubScores>,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
    pub recommendations: Vec<RecommendationDto>,
}

impl ScreeningResult {
    pub fn from_parts(screening: Screening, recommendations: Vec<Recommendation>) -> Self {
        Self {
            id: screening.id,
            score: screening.score,
            level: screening.level,
            sub_scores: screening.sub_scores(),
            notes: screening.notes,
            created_at: screening.created_at,
            recommendations: recommendations.into_iter().map(Into::into).collect(),
        }
    }
}

/// One row of the screening history listing.
#[derive(Debug, Serialize)]
pub struct ScreeningListItem {
    pub id: Uuid,
    pub score: i32,
    pub level: Level,
    pub sub_scores: Option<SubScores>,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
}

impl From<Screening> for ScreeningListItem {
    fn from(s: Screening) -> Self {
        Self {
            id: s.id,
            score: s.score,
            level: s.level,
            sub_scores: s.sub_scores(),
            notes: s.notes,
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}
