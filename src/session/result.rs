use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::drill::{DrillKind, TimedDrill};

/// Outcome of one finished timed drill. Stored rounded to two decimals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrillResult {
    #[serde(default)]
    pub user_id: Option<String>,
    pub set_id: String,
    pub kind: DrillKind,
    pub correct_count: u32,
    pub total_attempts: u32,
    pub error_count: u32,
    #[serde(default)]
    pub skipped_count: u32,
    pub words_completed: u32,
    pub accuracy: f64,
    pub time_spent_secs: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words_per_minute: Option<f64>,
    pub created_at: DateTime<Utc>,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl DrillResult {
    pub fn from_drill(drill: &TimedDrill, set_id: String) -> Self {
        let correct = drill.correct_count();
        let attempts = drill.total_attempts();
        let elapsed = drill.elapsed_secs();

        let accuracy = correct as f64 / attempts.max(1) as f64 * 100.0;
        let words_per_minute = match drill.kind() {
            DrillKind::Speed => Some(if elapsed > 0.0 {
                round2(correct as f64 / elapsed * 60.0)
            } else {
                0.0
            }),
            DrillKind::Accuracy => None,
        };

        Self {
            user_id: drill.user_id().map(str::to_string),
            set_id,
            kind: drill.kind(),
            correct_count: correct,
            total_attempts: attempts,
            error_count: drill.error_count(),
            skipped_count: drill.skipped_count(),
            words_completed: drill.words_completed(),
            accuracy: round2(accuracy),
            time_spent_secs: round2(elapsed),
            words_per_minute,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(239.994), 239.99);
    }

    #[test]
    fn test_serde_omits_wpm_for_accuracy() {
        let result = DrillResult {
            user_id: Some("u".into()),
            set_id: "s".into(),
            kind: DrillKind::Accuracy,
            correct_count: 3,
            total_attempts: 4,
            error_count: 1,
            skipped_count: 0,
            words_completed: 3,
            accuracy: 75.0,
            time_spent_secs: 12.5,
            words_per_minute: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("words_per_minute"));
        assert!(json.contains("\"kind\":\"accuracy\""));
        let back: DrillResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
