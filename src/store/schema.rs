use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::session::result::DrillResult;
use crate::sets::WordSet;

const SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordProgress {
    #[serde(alias = "short_memory")]
    pub progress_counter: u32,
}

/// Stored progress of the words in a set, keyed by word id.
pub type ProgressMap = HashMap<String, WordProgress>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetStats {
    pub attempts: u32,
    pub correct: u32,
}

/// A word's progress row for a signed-in user. Keyed by word id; the set id
/// records which concrete set the word was practised from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredWordProgress {
    pub set_id: String,
    #[serde(flatten)]
    pub progress: WordProgress,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserData {
    pub schema_version: u32,
    #[serde(default)]
    pub words: HashMap<String, StoredWordProgress>,
    #[serde(default)]
    pub set_stats: HashMap<String, SetStats>,
    /// Latest result per `"<kind>:<set id>"`.
    #[serde(default)]
    pub drill_results: HashMap<String, DrillResult>,
}

impl Default for UserData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            words: HashMap::new(),
            set_stats: HashMap::new(),
            drill_results: HashMap::new(),
        }
    }
}

impl UserData {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}

/// Local-only data for players without a user id, scoped by set id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GuestData {
    pub schema_version: u32,
    #[serde(default)]
    pub progress: HashMap<String, ProgressMap>,
    #[serde(default)]
    pub set_stats: HashMap<String, SetStats>,
}

impl Default for GuestData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            progress: HashMap::new(),
            set_stats: HashMap::new(),
        }
    }
}

impl GuestData {
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LibraryData {
    pub schema_version: u32,
    #[serde(default)]
    pub sets: Vec<WordSet>,
}

impl Default for LibraryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            sets: Vec::new(),
        }
    }
}

impl LibraryData {
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}
