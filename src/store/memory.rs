//! In-memory store for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::session::DrillKind;
use crate::session::result::DrillResult;
use crate::sets::combine::constituent_ids;
use crate::store::schema::{ProgressMap, SetStats, WordProgress};
use crate::store::{ProgressStore, StoreError, StoreResult, drill_result_key};

type UserKey = Option<String>;

#[derive(Default)]
struct State {
    /// `(user, word) -> (set, progress)`
    words: HashMap<(UserKey, String), (String, WordProgress)>,
    set_stats: HashMap<(UserKey, String), SetStats>,
    drill_results: HashMap<(String, String), DrillResult>,
    /// Every progress write in arrival order.
    write_log: Vec<(String, u32)>,
}

/// A [`ProgressStore`] held in memory, with switches to simulate an outage.
#[derive(Default)]
pub struct MemoryProgressStore {
    state: Mutex<State>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    write_count: AtomicU32,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::Relaxed);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    /// Number of write calls received, failed ones included.
    pub fn write_count(&self) -> u32 {
        self.write_count.load(Ordering::Relaxed)
    }

    /// `(word id, counter)` of every successful progress write, in order.
    pub fn write_log(&self) -> Vec<(String, u32)> {
        self.lock().write_log.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_read(&self) -> StoreResult<()> {
        if self.fail_reads.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("reads disabled".into()));
        }
        Ok(())
    }

    fn check_write(&self) -> StoreResult<()> {
        self.write_count.fetch_add(1, Ordering::Relaxed);
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProgressStore for MemoryProgressStore {
    async fn get_progress(&self, user_id: Option<&str>, set_id: &str) -> StoreResult<ProgressMap> {
        self.check_read()?;
        let sets = constituent_ids(set_id);
        let user = user_id.map(str::to_string);
        Ok(self
            .lock()
            .words
            .iter()
            .filter(|((u, _), (set, _))| *u == user && sets.contains(&set.as_str()))
            .map(|((_, word), (_, progress))| (word.clone(), *progress))
            .collect())
    }

    async fn put_word_progress(
        &self,
        user_id: Option<&str>,
        set_id: &str,
        word_id: &str,
        progress: WordProgress,
    ) -> StoreResult<()> {
        self.check_write()?;
        let target = constituent_ids(set_id)
            .first()
            .map(|id| id.to_string())
            .ok_or_else(|| StoreError::UnresolvedSet(set_id.to_string()))?;
        let mut state = self.lock();
        state
            .words
            .insert((user_id.map(str::to_string), word_id.to_string()), (target, progress));
        state
            .write_log
            .push((word_id.to_string(), progress.progress_counter));
        Ok(())
    }

    async fn get_set_stats(&self, user_id: Option<&str>, set_id: &str) -> StoreResult<SetStats> {
        self.check_read()?;
        let key = (user_id.map(str::to_string), set_id.to_string());
        Ok(self.lock().set_stats.get(&key).copied().unwrap_or_default())
    }

    async fn put_set_stats(
        &self,
        user_id: Option<&str>,
        set_id: &str,
        stats: SetStats,
    ) -> StoreResult<()> {
        self.check_write()?;
        let key = (user_id.map(str::to_string), set_id.to_string());
        self.lock().set_stats.insert(key, stats);
        Ok(())
    }

    async fn put_drill_result(&self, result: &DrillResult) -> StoreResult<()> {
        self.check_write()?;
        let user = result.user_id.clone().ok_or(StoreError::MissingUser)?;
        let key = (user, drill_result_key(result.kind, &result.set_id));
        self.lock().drill_results.insert(key, result.clone());
        Ok(())
    }

    async fn get_drill_result(
        &self,
        user_id: &str,
        kind: DrillKind,
        set_id: &str,
    ) -> StoreResult<Option<DrillResult>> {
        self.check_read()?;
        let key = (user_id.to_string(), drill_result_key(kind, set_id));
        Ok(self.lock().drill_results.get(&key).cloned())
    }
}
