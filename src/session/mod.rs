pub mod drill;
pub mod education;
pub mod result;

use serde::{Deserialize, Serialize};

use crate::session::result::DrillResult;
use crate::store::schema::{SetStats, WordProgress};

pub use drill::{DrillEvent, DrillKind, DrillPhase, DrillSettings, TimedDrill};
pub use education::{EducationEvent, EducationSession, EducationSettings, EducationUpdate};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Education,
    Flashcard,
    Accuracy,
    Speed,
}

impl GameMode {
    pub const ALL: [GameMode; 4] = [
        GameMode::Education,
        GameMode::Flashcard,
        GameMode::Accuracy,
        GameMode::Speed,
    ];

    pub fn is_timed(self) -> bool {
        matches!(self, GameMode::Accuracy | GameMode::Speed)
    }

    pub fn drill_kind(self) -> Option<DrillKind> {
        match self {
            GameMode::Accuracy => Some(DrillKind::Accuracy),
            GameMode::Speed => Some(DrillKind::Speed),
            GameMode::Education | GameMode::Flashcard => None,
        }
    }
}

/// A persistence request produced by a session transition. Sessions never
/// touch storage themselves; the caller forwards these to a store.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    SaveProgress {
        user_id: Option<String>,
        set_id: String,
        word_id: String,
        progress: WordProgress,
    },
    SaveSetStats {
        user_id: Option<String>,
        set_id: String,
        stats: SetStats,
    },
    SaveDrillResult(DrillResult),
}
