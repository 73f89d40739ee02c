use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{coping::repo::CopingLog, error::AppError};

pub const MAX_STRATEGY_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct CreateCopingLogRequest {
    pub strategy: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub effectiveness: Option<i32>,
}

/// Validated coping-log fields ready to be written.
#[derive(Debug, PartialEq, Eq)]
pub struct NewCopingLog {
    pub strategy: String,
    pub description: Option<String>,
    pub effectiveness: Option<i32>,
}

impl CreateCopingLogRequest {
    pub fn validated(self) -> Result<NewCopingLog, AppError> {
        let strategy = self.strategy.trim().to_string();
        if strategy.is_empty() {
            return Err(AppError::Validation("strategy must not be empty".into()));
        }
        if strategy.chars().count() > MAX_STRATEGY_LEN {
            return Err(AppError::Validation(format!(
                "strategy must be at most {MAX_STRATEGY_LEN} characters"
            )));
        }

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        if let Some(d) = &description {
            if d.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(AppError::Validation(format!(
                    "description must be at most {MAX_DESCRIPTION_LEN} characters"
                )));
            }
        }

        if let Some(e) = self.effectiveness {
            if !(1..=5).contains(&e) {
                return Err(AppError::Validation(
                    "effectiveness must be between 1 and 5".into(),
                ));
            }
        }

        Ok(NewCopingLog {
            strategy,
            description,
            effectiveness: self.effectiveness,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CopingLogItem {
    pub id: Uuid,
    pub strategy: String,
    pub description: Option<String>,
    pub effectiveness: Option<i32>,
    pub created_at: OffsetDateTime,
}

impl From<CopingLog> for CopingLogItem {
    fn from(log: CopingLog) -> Self {
        Self {
            id: log.id,
            strategy: log.strategy,
            description: log.description,
            effectiveness: log.effectiveness,
            created_at: log.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(strategy: &str, effectiveness: Option<i32>) -> CreateCopingLogRequest {
        CreateCopingLogRequest {
            strategy: strategy.into(),
            description: Some("went for a run before work".into()),
            effectiveness,
        }
    }

    #[test]
    fn accepts_a_plain_entry() {
        let log = request("morning run", Some(4)).validated().unwrap();
        assert_eq!(log.strategy, "morning run");
        assert_eq!(log.effectiveness, Some(4));
    }

    #[test]
    fn strategy_is_trimmed_and_required() {
        assert_eq!(
            request("  journaling  ", None).validated().unwrap().strategy,
            "journaling"
        );
        assert!(request("", None).validated().is_err());
        assert!(request("   ", None).validated().is_err());
        assert!(request(&"x".repeat(MAX_STRATEGY_LEN + 1), None)
            .validated()
            .is_err());
    }

    #[test]
    fn blank_description_becomes_none() {
        let req = CreateCopingLogRequest {
            strategy: "breathing".into(),
            description: Some("  ".into()),
            effectiveness: None,
        };
        assert_eq!(req.validated().unwrap().description, None);
    }

    #[test]
    fn oversized_description_is_rejected() {
        let req = CreateCopingLogRequest {
            strategy: "breathing".into(),
            description: Some("x".repeat(MAX_DESCRIPTION_LEN + 1)),
            effectiveness: None,
        };
        assert!(req.validated().is_err());
    }

    #[test]
    fn effectiveness_bounds() {
        for ok in [1, 3, 5] {
            assert!(request("run", Some(ok)).validated().is_ok());
        }
        for bad in [0, 6, -2] {
            assert!(request("run", Some(bad)).validated().is_err());
        }
        assert_eq!(request("run", None).validated().unwrap().effectiveness, None);
    }
}
