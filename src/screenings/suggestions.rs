use serde::{Deserialize, Serialize};

use crate::screenings::scoring::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "recommendation_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SuggestionCategory {
    Coping,
    Resource,
    Professional,
}

/// One fixed suggestion tied to a risk level. The tables below are the whole
/// catalogue; screenings persist copies of the entries they were shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    pub category: SuggestionCategory,
    pub title: &'static str,
    pub description: &'static str,
    pub url: Option<&'static str>,
}

const HIGH: [Suggestion; 3] = [
    Suggestion {
        category: SuggestionCategory::Resource,
        title: "988 Suicide & Crisis Lifeline",
        description: "If you are in distress or crisis, call or text 988 to reach \
                      a trained counselor. Free, confidential, available 24/7.",
        url: Some("https://988lifeline.org"),
    },
    Suggestion {
        category: SuggestionCategory::Professional,
        title: "Talk to a mental health professional",
        description: "Your answers point to a high level of distress. Consider \
                      booking an appointment with a therapist or your primary \
                      care provider this week.",
        url: None,
    },
    Suggestion {
        category: SuggestionCategory::Coping,
        title: "Grounding exercise",
        description: "When things feel overwhelming, try 5-4-3-2-1 grounding: name \
                      five things you can see, four you can touch, three you can \
                      hear, two you can smell, and one you can taste.",
        url: None,
    },
];

const MODERATE: [Suggestion; 3] = [
    Suggestion {
        category: SuggestionCategory::Coping,
        title: "Practice daily relaxation",
        description: "Set aside ten minutes a day for slow breathing or progressive \
                      muscle relaxation; short, regular practice beats occasional \
                      long sessions.",
        url: None,
    },
    Suggestion {
        category: SuggestionCategory::Coping,
        title: "Keep a regular sleep schedule",
        description: "Go to bed and get up at the same time every day, and put \
                      screens away an hour before bed.",
        url: None,
    },
    Suggestion {
        category: SuggestionCategory::Resource,
        title: "Guided self-help",
        description: "A structured program such as the NHS self-help guides or a \
                      CBT workbook can help you work through recurring worries.",
        url: Some("https://www.nhs.uk/mental-health/self-help/"),
    },
];

const LOW: [Suggestion; 2] = [
    Suggestion {
        category: SuggestionCategory::Coping,
        title: "Keep up what works",
        description: "Your responses look steady. Hold on to the routines that \
                      support you: movement, sleep, and time with people you trust.",
        url: None,
    },
    Suggestion {
        category: SuggestionCategory::Resource,
        title: "Learn the early signs",
        description: "Knowing how stress and anxiety tend to show up makes it \
                      easier to notice changes early.",
        url: Some("https://www.nimh.nih.gov/health/topics"),
    },
];

/// Fixed, ordered suggestions for a risk level. Pure lookup; persisting the
/// entries against a screening is the caller's job.
pub fn suggestions_for(level: Level) -> &'static [Suggestion] {
    match level {
        Level::Low => &LOW,
        Level::Moderate => &MODERATE,
        Level::High => &HIGH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_sizes_per_level() {
        assert_eq!(suggestions_for(Level::High).len(), 3);
        assert_eq!(suggestions_for(Level::Moderate).len(), 3);
        assert_eq!(suggestions_for(Level::Low).len(), 2);
    }

    #[test]
    fn lookup_returns_the_same_slice_every_call() {
        for level in [Level::Low, Level::Moderate, Level::High] {
            let first = suggestions_for(level);
            let second = suggestions_for(level);
            assert!(std::ptr::eq(first, second));
            assert_eq!(first, second);
        }
    }

    #[test]
    fn high_leads_with_the_crisis_line() {
        let first = &suggestions_for(Level::High)[0];
        assert_eq!(first.category, SuggestionCategory::Resource);
        assert!(first.title.contains("988"));
        assert_eq!(first.url, Some("https://988lifeline.org"));
    }

    #[test]
    fn every_entry_is_filled_in() {
        for level in [Level::Low, Level::Moderate, Level::High] {
            for s in suggestions_for(level) {
                assert!(!s.title.is_empty());
                assert!(!s.description.is_empty());
                if let Some(url) = s.url {
                    assert!(url.starts_with("https://"));
                }
            }
        }
    }

    #[test]
    fn category_serializes_lowercase() {
        let json = serde_json::to_string(&SuggestionCategory::Professional).unwrap();
        assert_eq!(json, "\"professional\"");
    }
}
