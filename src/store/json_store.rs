use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::warn;

use crate::session::DrillKind;
use crate::session::result::DrillResult;
use crate::sets::combine::constituent_ids;
use crate::store::schema::{GuestData, ProgressMap, SetStats, StoredWordProgress, UserData, WordProgress};
use crate::store::{ProgressStore, StoreError, StoreResult, drill_result_key};

/// Progress kept as JSON documents: one per user plus one for guests.
///
/// Writes go to a temp file that is synced and renamed over the original.
/// Read-modify-write cycles are serialized through one async mutex.
pub struct JsonProgressStore {
    base_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonProgressStore {
    pub fn new(data_dir: &Path) -> StoreResult<Self> {
        Self::with_base_dir(data_dir.join("progress"))
    }

    pub fn with_base_dir(base_dir: PathBuf) -> StoreResult<Self> {
        std::fs::create_dir_all(base_dir.join("users"))?;
        Ok(Self {
            base_dir,
            write_lock: Mutex::new(()),
        })
    }

    fn user_path(&self, user_id: &str) -> PathBuf {
        let safe: String = user_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_dir.join("users").join(format!("{safe}.json"))
    }

    fn guest_path(&self) -> PathBuf {
        self.base_dir.join("guest.json")
    }

    async fn load<T: DeserializeOwned + Default>(&self, path: &Path) -> StoreResult<T> {
        match fs::read_to_string(path).await {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(data) => Ok(data),
                Err(err) => {
                    warn!(path = %path.display(), %err, "unreadable progress file, starting fresh");
                    Ok(T::default())
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(err) => Err(err.into()),
        }
    }

    async fn save<T: Serialize>(&self, path: &Path, data: &T) -> StoreResult<()> {
        let tmp_path = path.with_extension("tmp");
        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;
        fs::rename(&tmp_path, path).await?;
        Ok(())
    }

    async fn load_user(&self, user_id: &str) -> StoreResult<UserData> {
        let data: UserData = self.load(&self.user_path(user_id)).await?;
        Ok(if data.needs_reset() {
            UserData::default()
        } else {
            data
        })
    }

    async fn load_guest(&self) -> StoreResult<GuestData> {
        let data: GuestData = self.load(&self.guest_path()).await?;
        Ok(if data.needs_reset() {
            GuestData::default()
        } else {
            data
        })
    }
}

fn write_target(set_id: &str) -> StoreResult<String> {
    constituent_ids(set_id)
        .first()
        .map(|id| id.to_string())
        .ok_or_else(|| StoreError::UnresolvedSet(set_id.to_string()))
}

#[async_trait]
impl ProgressStore for JsonProgressStore {
    async fn get_progress(&self, user_id: Option<&str>, set_id: &str) -> StoreResult<ProgressMap> {
        let sets = constituent_ids(set_id);
        match user_id {
            Some(user) => {
                let data = self.load_user(user).await?;
                Ok(data
                    .words
                    .into_iter()
                    .filter(|(_, row)| sets.contains(&row.set_id.as_str()))
                    .map(|(word_id, row)| (word_id, row.progress))
                    .collect())
            }
            None => {
                let mut data = self.load_guest().await?;
                let mut merged = ProgressMap::new();
                for set in sets {
                    if let Some(progress) = data.progress.remove(set) {
                        merged.extend(progress);
                    }
                }
                Ok(merged)
            }
        }
    }

    async fn put_word_progress(
        &self,
        user_id: Option<&str>,
        set_id: &str,
        word_id: &str,
        progress: WordProgress,
    ) -> StoreResult<()> {
        let target = write_target(set_id)?;
        let _guard = self.write_lock.lock().await;
        match user_id {
            Some(user) => {
                let mut data = self.load_user(user).await?;
                data.words.insert(
                    word_id.to_string(),
                    StoredWordProgress {
                        set_id: target,
                        progress,
                    },
                );
                self.save(&self.user_path(user), &data).await
            }
            None => {
                let mut data = self.load_guest().await?;
                data.progress
                    .entry(target)
                    .or_default()
                    .insert(word_id.to_string(), progress);
                self.save(&self.guest_path(), &data).await
            }
        }
    }

    async fn get_set_stats(&self, user_id: Option<&str>, set_id: &str) -> StoreResult<SetStats> {
        let stats = match user_id {
            Some(user) => self.load_user(user).await?.set_stats.remove(set_id),
            None => self.load_guest().await?.set_stats.remove(set_id),
        };
        Ok(stats.unwrap_or_default())
    }

    async fn put_set_stats(
        &self,
        user_id: Option<&str>,
        set_id: &str,
        stats: SetStats,
    ) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        match user_id {
            Some(user) => {
                let mut data = self.load_user(user).await?;
                data.set_stats.insert(set_id.to_string(), stats);
                self.save(&self.user_path(user), &data).await
            }
            None => {
                let mut data = self.load_guest().await?;
                data.set_stats.insert(set_id.to_string(), stats);
                self.save(&self.guest_path(), &data).await
            }
        }
    }

    async fn put_drill_result(&self, result: &DrillResult) -> StoreResult<()> {
        let user = result.user_id.as_deref().ok_or(StoreError::MissingUser)?;
        let _guard = self.write_lock.lock().await;
        let mut data = self.load_user(user).await?;
        data.drill_results
            .insert(drill_result_key(result.kind, &result.set_id), result.clone());
        self.save(&self.user_path(user), &data).await
    }

    async fn get_drill_result(
        &self,
        user_id: &str,
        kind: DrillKind,
        set_id: &str,
    ) -> StoreResult<Option<DrillResult>> {
        let mut data = self.load_user(user_id).await?;
        Ok(data.drill_results.remove(&drill_result_key(kind, set_id)))
    }
}
