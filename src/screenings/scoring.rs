use serde::{Deserialize, Serialize};
use std::fmt;

pub const QUICK_QUESTIONS: usize = 3;
pub const CATEGORY_QUESTIONS: usize = 2;

/// One questionnaire answer: 0 = never, 1 = sometimes, 2 = often.
///
/// Constructed only through [`Answer::new`], so scoring never sees an
/// out-of-range value; malformed input is rejected at the request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answer(u8);

impl Answer {
    pub const MAX: i32 = 2;
    pub const ZERO: Answer = Answer(0);

    pub fn new(value: i32) -> Option<Self> {
        if (0..=Self::MAX).contains(&value) {
            Some(Self(value as u8))
        } else {
            None
        }
    }

    pub fn value(self) -> i32 {
        i32::from(self.0)
    }
}

/// Ordinal risk classification attached to every screening.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "risk_level", rename_all = "lowercase")]
pub enum Level {
    Low,
    Moderate,
    High,
}

impl Level {
    pub fn label(self) -> &'static str {
        match self {
            Level::Low => "Low",
            Level::Moderate => "Moderate",
            Level::High => "High",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Score-to-level mapping as an ordered table of inclusive upper bounds.
///
/// Bounds are checked in order; anything above the last bound maps to `top`.
/// Keeping the two questionnaire scales as data makes them testable on their
/// own instead of being buried in branch chains.
#[derive(Debug, Clone, Copy)]
pub struct LevelScale {
    bounds: &'static [(i32, Level)],
    top: Level,
}

impl LevelScale {
    pub const fn new(bounds: &'static [(i32, Level)], top: Level) -> Self {
        Self { bounds, top }
    }

    pub fn classify(&self, score: i32) -> Level {
        for &(bound, level) in self.bounds {
            if score <= bound {
                return level;
            }
        }
        self.top
    }

    #[cfg(test)]
    fn bounds(&self) -> &'static [(i32, Level)] {
        self.bounds
    }
}

/// Quick form: 3 answers, score range 0-6. A 3-question form cannot reach
/// High under these bounds; the mapping is still total over all integers.
pub const QUICK_SCALE: LevelScale =
    LevelScale::new(&[(4, Level::Low), (8, Level::Moderate)], Level::High);

/// Extended form: 10 answers, score range 0-20, every tier reachable.
pub const EXTENDED_SCALE: LevelScale =
    LevelScale::new(&[(8, Level::Low), (15, Level::Moderate)], Level::High);

/// Answers to the extended questionnaire, two per category.
#[derive(Debug, Clone, Copy)]
pub struct ExtendedAnswers {
    pub stress: [Answer; CATEGORY_QUESTIONS],
    pub anxiety: [Answer; CATEGORY_QUESTIONS],
    pub sleep: [Answer; CATEGORY_QUESTIONS],
    pub depression: [Answer; CATEGORY_QUESTIONS],
    pub social: [Answer; CATEGORY_QUESTIONS],
}

impl ExtendedAnswers {
    pub fn sub_scores(&self) -> SubScores {
        SubScores {
            stress: pair_score(&self.stress),
            anxiety: pair_score(&self.anxiety),
            sleep: pair_score(&self.sleep),
            depression: pair_score(&self.depression),
            social: pair_score(&self.social),
        }
    }
}

fn pair_score(answers: &[Answer; CATEGORY_QUESTIONS]) -> i32 {
    answers.iter().map(|a| a.value()).sum()
}

/// Per-category component scores of an extended screening, each 0-4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubScores {
    pub stress: i32,
    pub anxiety: i32,
    pub sleep: i32,
    pub depression: i32,
    pub social: i32,
}

impl SubScores {
    pub fn total(&self) -> i32 {
        self.stress + self.anxiety + self.sleep + self.depression + self.social
    }
}

/// Result of scoring one questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreOutcome {
    pub score: i32,
    pub level: Level,
    pub sub_scores: Option<SubScores>,
}

pub fn score_quick(answers: &[Answer; QUICK_QUESTIONS]) -> ScoreOutcome {
    let score = answers.iter().map(|a| a.value()).sum();
    ScoreOutcome {
        score,
        level: QUICK_SCALE.classify(score),
        sub_scores: None,
    }
}

pub fn score_extended(answers: &ExtendedAnswers) -> ScoreOutcome {
    let sub_scores = answers.sub_scores();
    let score = sub_scores.total();
    ScoreOutcome {
        score,
        level: EXTENDED_SCALE.classify(score),
        sub_scores: Some(sub_scores),
    }
}
