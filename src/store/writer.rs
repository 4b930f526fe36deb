use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::session::Effect;
use crate::store::{ProgressStore, StoreResult};

/// Fire-and-forget persistence for session effects.
///
/// A single task drains the queue, so writes land in submission order and a
/// later counter for a word always overwrites an earlier one. Failures are
/// logged and dropped; the session keeps its in-memory state.
pub struct ProgressWriter {
    tx: mpsc::UnboundedSender<Message>,
    task: JoinHandle<()>,
}

enum Message {
    Write(Effect),
    /// Answered once every message queued before it has been handled.
    Flush(oneshot::Sender<()>),
}

impl ProgressWriter {
    pub fn spawn(store: Arc<dyn ProgressStore>, runtime: &Handle) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
        let task = runtime.spawn(async move {
            while let Some(message) = rx.recv().await {
                match message {
                    Message::Write(effect) => {
                        if let Err(err) = apply_effect(store.as_ref(), &effect).await {
                            warn!(%err, ?effect, "dropping failed progress write");
                        }
                    }
                    Message::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
            debug!("progress writer drained");
        });
        Self { tx, task }
    }

    pub fn submit(&self, effects: impl IntoIterator<Item = Effect>) {
        for effect in effects {
            if self.tx.send(Message::Write(effect)).is_err() {
                warn!("progress writer stopped, write discarded");
                return;
            }
        }
    }

    /// Waits until everything queued so far has been written, leaving the
    /// writer running. Reads that must observe earlier answers go after this.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.tx.send(Message::Flush(done)).is_err() {
            warn!("progress writer stopped, nothing to flush");
            return;
        }
        if wait.await.is_err() {
            warn!("progress writer stopped before flushing");
        }
    }

    /// Waits until everything queued so far has been written.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(err) = self.task.await {
            warn!(%err, "progress writer task failed");
        }
    }
}

pub async fn apply_effect(store: &dyn ProgressStore, effect: &Effect) -> StoreResult<()> {
    match effect {
        Effect::SaveProgress {
            user_id,
            set_id,
            word_id,
            progress,
        } => {
            store
                .put_word_progress(user_id.as_deref(), set_id, word_id, *progress)
                .await
        }
        Effect::SaveSetStats {
            user_id,
            set_id,
            stats,
        } => store.put_set_stats(user_id.as_deref(), set_id, *stats).await,
        Effect::SaveDrillResult(result) => store.put_drill_result(result).await,
    }
}
