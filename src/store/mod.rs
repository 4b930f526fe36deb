pub mod json_store;
pub mod library;
pub mod memory;
pub mod schema;
pub mod writer;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::session::DrillKind;
use crate::session::result::DrillResult;
use crate::sets::{WordSet, resolve_target_set_id};
use crate::store::schema::{ProgressMap, SetStats, WordProgress};

pub use json_store::JsonProgressStore;
pub use library::{LibraryError, SetLibrary};
pub use memory::MemoryProgressStore;
pub use writer::ProgressWriter;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("no concrete set id in {0:?}")]
    UnresolvedSet(String),
    #[error("drill results need a user id")]
    MissingUser,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Keyed persistence for learning progress.
///
/// `user_id == None` is a guest: reads and writes go to a local scope keyed
/// by set id. Composite set ids fan out to their constituents on read and
/// resolve to the first constituent on write.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn get_progress(&self, user_id: Option<&str>, set_id: &str) -> StoreResult<ProgressMap>;

    /// Upsert keyed by `(user, word)`.
    async fn put_word_progress(
        &self,
        user_id: Option<&str>,
        set_id: &str,
        word_id: &str,
        progress: WordProgress,
    ) -> StoreResult<()>;

    async fn get_set_stats(&self, user_id: Option<&str>, set_id: &str) -> StoreResult<SetStats>;

    /// Upsert keyed by `(user, set)`.
    async fn put_set_stats(
        &self,
        user_id: Option<&str>,
        set_id: &str,
        stats: SetStats,
    ) -> StoreResult<()>;

    /// Upsert keyed by `(user, kind, set)`; the latest result wins.
    async fn put_drill_result(&self, result: &DrillResult) -> StoreResult<()>;

    async fn get_drill_result(
        &self,
        user_id: &str,
        kind: DrillKind,
        set_id: &str,
    ) -> StoreResult<Option<DrillResult>>;
}

pub fn drill_result_key(kind: DrillKind, set_id: &str) -> String {
    format!("{}:{set_id}", kind.key())
}

/// Stored progress for every word of `set`, read per origin set so virtual
/// sets pick up their constituents. Read failures degrade to empty progress.
pub async fn load_set_progress(
    store: &dyn ProgressStore,
    user_id: Option<&str>,
    set: &WordSet,
) -> ProgressMap {
    let mut origins: Vec<&str> = set
        .words
        .iter()
        .map(|w| w.origin_set_id.as_deref().unwrap_or(set.id.as_str()))
        .collect();
    origins.sort_unstable();
    origins.dedup();

    let mut merged = ProgressMap::new();
    for origin in origins {
        match store.get_progress(user_id, origin).await {
            Ok(progress) => merged.extend(progress),
            Err(err) => warn!(set_id = origin, %err, "progress unavailable, starting from zero"),
        }
    }
    merged
}

/// Stored stats for the set's storage target, zero when unavailable.
pub async fn load_set_stats(
    store: &dyn ProgressStore,
    user_id: Option<&str>,
    set: &WordSet,
) -> SetStats {
    let Some(target) = resolve_target_set_id(set) else {
        return SetStats::default();
    };
    store
        .get_set_stats(user_id, &target)
        .await
        .unwrap_or_else(|err| {
            warn!(set_id = %target, %err, "set stats unavailable");
            SetStats::default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::WeightedPolicy;
    use crate::session::{EducationSession, EducationSettings};
    use crate::sets::Word;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    const SET_ID: &str = "0f8e2a4c-6b1d-4e3f-9a7c-5d2b8e1f4a60";

    fn make_set() -> WordSet {
        WordSet::new(
            SET_ID,
            "Animals",
            vec![
                Word::new("w1", "cat", &["кіт"]),
                Word::new("w2", "dog", &["пес"]),
            ],
        )
    }

    #[tokio::test]
    async fn test_failed_reads_start_from_zero() {
        let store = MemoryProgressStore::new();
        store
            .put_word_progress(Some("u1"), SET_ID, "w1", WordProgress { progress_counter: 5 })
            .await
            .unwrap();
        store
            .put_set_stats(Some("u1"), SET_ID, SetStats { attempts: 9, correct: 7 })
            .await
            .unwrap();
        store.set_fail_reads(true);

        let set = make_set();
        let stored = load_set_progress(&store, Some("u1"), &set).await;
        let stats = load_set_stats(&store, Some("u1"), &set).await;
        assert!(stored.is_empty());
        assert_eq!(stats, SetStats::default());

        let session = EducationSession::new(
            &set,
            &stored,
            stats,
            Some("u1".into()),
            EducationSettings::default(),
            Box::new(WeightedPolicy),
            Box::new(SmallRng::seed_from_u64(1)),
        );
        assert!(session.words().iter().all(|w| w.progress_counter == 0));
        assert_eq!(session.stats(), SetStats::default());
        assert!(session.current_word().is_some());

        store.set_fail_reads(false);
        let stored = load_set_progress(&store, Some("u1"), &set).await;
        assert_eq!(stored["w1"].progress_counter, 5);
    }
}
