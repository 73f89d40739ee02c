use serde::Serialize;
use time::OffsetDateTime;

use crate::screenings::scoring::Level;

/// Direction of a user's scores across the fetched window. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Improving,
    Worsening,
    Stable,
}

/// How many screenings landed in each risk tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LevelTally {
    pub low: u32,
    pub moderate: u32,
    pub high: u32,
}

impl LevelTally {
    fn record(&mut self, level: Level) {
        match level {
            Level::Low => self.low += 1,
            Level::Moderate => self.moderate += 1,
            Level::High => self.high += 1,
        }
    }
}

/// The slice of a screening that analytics looks at.
#[derive(Debug, Clone, Copy)]
pub struct ScreeningSnapshot {
    pub score: i32,
    pub level: Level,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    pub count: usize,
    pub mean_score: Option<f64>,
    pub min_score: Option<i32>,
    pub max_score: Option<i32>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub latest: Option<OffsetDateTime>,
    pub trend: Trend,
    pub levels: LevelTally,
}

/// Aggregates a screening window fetched descending by creation date:
/// index 0 is the most recent screening, the last index the oldest in the
/// window. Trend compares those two ends; windows of 0 or 1 are `Stable`.
pub fn summarize(window: &[ScreeningSnapshot]) -> AnalyticsSummary {
    let count = window.len();

    let mut levels = LevelTally::default();
    let mut total: i64 = 0;
    let mut min_score = None;
    let mut max_score = None;
    for s in window {
        levels.record(s.level);
        total += i64::from(s.score);
        min_score = Some(min_score.map_or(s.score, |m: i32| m.min(s.score)));
        max_score = Some(max_score.map_or(s.score, |m: i32| m.max(s.score)));
    }

    let trend = match (window.first(), window.last()) {
        (Some(newest), Some(oldest)) if count > 1 => {
            if newest.score < oldest.score {
                Trend::Improving
            } else if newest.score > oldest.score {
                Trend::Worsening
            } else {
                Trend::Stable
            }
        }
        _ => Trend::Stable,
    };

    AnalyticsSummary {
        count,
        mean_score: (count > 0).then(|| total as f64 / count as f64),
        min_score,
        max_score,
        latest: window.first().map(|s| s.created_at),
        trend,
        levels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    /// Builds a descending-by-date window from scores, index 0 most recent.
    fn window(scores: &[i32]) -> Vec<ScreeningSnapshot> {
        let now = OffsetDateTime::now_utc();
        scores
            .iter()
            .enumerate()
            .map(|(i, &score)| ScreeningSnapshot {
                score,
                level: crate::screenings::scoring::EXTENDED_SCALE.classify(score),
                created_at: now - Duration::days(i as i64),
            })
            .collect()
    }

    #[test]
    fn empty_window_is_stable_and_blank() {
        let summary = summarize(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean_score, None);
        assert_eq!(summary.min_score, None);
        assert_eq!(summary.max_score, None);
        assert!(summary.latest.is_none());
        assert_eq!(summary.trend, Trend::Stable);
        assert_eq!(summary.levels, LevelTally::default());
    }

    #[test]
    fn singleton_window_is_stable() {
        let summary = summarize(&window(&[12]));
        assert_eq!(summary.count, 1);
        assert_eq!(summary.trend, Trend::Stable);
        assert_eq!(summary.mean_score, Some(12.0));
    }

    #[test]
    fn most_recent_above_oldest_is_worsening() {
        // Descending window: most recent scored 10, oldest 8.
        let summary = summarize(&window(&[10, 8, 8]));
        assert_eq!(summary.trend, Trend::Worsening);
    }

    #[test]
    fn most_recent_below_oldest_is_improving() {
        let summary = summarize(&window(&[3, 6]));
        assert_eq!(summary.trend, Trend::Improving);
    }

    #[test]
    fn equal_ends_are_stable() {
        let summary = summarize(&window(&[7, 19, 7]));
        assert_eq!(summary.trend, Trend::Stable);
    }

    #[test]
    fn aggregates_over_the_window() {
        let w = window(&[10, 4, 16, 8]);
        let summary = summarize(&w);
        assert_eq!(summary.count, 4);
        assert_eq!(summary.mean_score, Some(9.5));
        assert_eq!(summary.min_score, Some(4));
        assert_eq!(summary.max_score, Some(16));
        assert_eq!(summary.latest, Some(w[0].created_at));
        // 4 and 8 → Low, 10 → Moderate, 16 → High on the extended scale
        assert_eq!(
            summary.levels,
            LevelTally {
                low: 2,
                moderate: 1,
                high: 1
            }
        );
    }

    #[test]
    fn trend_serializes_with_capitalized_labels() {
        assert_eq!(
            serde_json::to_string(&Trend::Improving).unwrap(),
            "\"Improving\""
        );
        assert_eq!(serde_json::to_string(&Trend::Stable).unwrap(), "\"Stable\"");
    }
}
