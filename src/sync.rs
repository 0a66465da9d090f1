//! Remote Sync Worker
//!
//! Local mutations never wait on the document store. Each one enqueues a
//! `RemoteOp`; a single background task applies them in FIFO order. Failures
//! are logged and counted, local state is left as is.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use okr_remote_lib::domain::{Objective, OrderEntry, SiblingList};
use okr_remote_lib::repository::{ObjectivePatch, ObjectiveRepository};
use tokio::sync::{mpsc, oneshot};

/// One queued write against the document store
#[derive(Debug)]
pub enum RemoteOp {
    CreateObjective(Objective),
    DeleteObjective { id: String },
    UpdateObjective { id: String, patch: ObjectivePatch },
    SyncOrder { list: SiblingList, entries: Vec<OrderEntry> },
    /// Acknowledged once every earlier op has been applied
    Flush(oneshot::Sender<()>),
}

impl RemoteOp {
    fn describe(&self) -> String {
        match self {
            RemoteOp::CreateObjective(objective) => format!("create objective {}", objective.id),
            RemoteOp::DeleteObjective { id } => format!("delete objective {}", id),
            RemoteOp::UpdateObjective { id, .. } => format!("update objective {}", id),
            RemoteOp::SyncOrder { list, entries } => format!("reorder {} {}s", entries.len(), list.kind()),
            RemoteOp::Flush(_) => "flush".to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct SyncStats {
    applied: AtomicU64,
    failed: AtomicU64,
    failed_reads: AtomicU64,
}

/// Counters since the worker started
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSnapshot {
    pub applied: u64,
    pub failed: u64,
    pub failed_reads: u64,
}

/// Handle to the background writer
pub struct RemoteSync {
    repo: Arc<dyn ObjectiveRepository>,
    sender: mpsc::UnboundedSender<RemoteOp>,
    stats: Arc<SyncStats>,
}

impl RemoteSync {
    /// Start the worker. Must be called inside a tokio runtime.
    pub fn spawn(repo: Arc<dyn ObjectiveRepository>) -> Self {
        let stats = Arc::new(SyncStats::default());
        let (sender, rx) = mpsc::unbounded_channel();
        let worker = SyncWorker {
            repo: repo.clone(),
            stats: stats.clone(),
        };
        tokio::spawn(worker.run(rx));

        Self { repo, sender, stats }
    }

    /// Queue a write; returns immediately
    pub fn enqueue(&self, op: RemoteOp) {
        if let Err(err) = self.sender.send(op) {
            log::error!("remote sync worker gone, dropping {}", err.0.describe());
            self.stats.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Wait until every op queued so far has been applied
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.sender.send(RemoteOp::Flush(tx)).is_err() {
            log::warn!("remote sync worker gone, nothing to flush");
            return;
        }
        if rx.await.is_err() {
            log::warn!("remote sync worker stopped before flushing");
        }
    }

    /// Objectives for `owner_id` after pending writes land; empty on failure
    pub async fn fetch(&self, owner_id: &str) -> Vec<Objective> {
        self.flush().await;
        match self.repo.list_objectives(owner_id).await {
            Ok(objectives) => {
                log::info!("fetched {} objectives for {}", objectives.len(), owner_id);
                objectives
            }
            Err(err) => {
                log::error!("fetch objectives for {} failed: {}", owner_id, err);
                self.stats.failed_reads.fetch_add(1, Ordering::Relaxed);
                Vec::new()
            }
        }
    }

    pub fn stats(&self) -> SyncSnapshot {
        SyncSnapshot {
            applied: self.stats.applied.load(Ordering::Relaxed),
            failed: self.stats.failed.load(Ordering::Relaxed),
            failed_reads: self.stats.failed_reads.load(Ordering::Relaxed),
        }
    }
}

struct SyncWorker {
    repo: Arc<dyn ObjectiveRepository>,
    stats: Arc<SyncStats>,
}

impl SyncWorker {
    async fn run(self, mut rx: mpsc::UnboundedReceiver<RemoteOp>) {
        while let Some(op) = rx.recv().await {
            self.handle(op).await;
        }
        log::debug!("remote sync worker stopped");
    }

    async fn handle(&self, op: RemoteOp) {
        let label = op.describe();
        let result = match op {
            RemoteOp::Flush(done) => {
                done.send(()).ok();
                return;
            }
            RemoteOp::CreateObjective(objective) => self.repo.create_objective(&objective).await.map(|_| ()),
            RemoteOp::DeleteObjective { id } => self.repo.delete_objective(&id).await,
            RemoteOp::UpdateObjective { id, patch } => self.repo.update_objective(&id, &patch).await,
            RemoteOp::SyncOrder { list, entries } => self.repo.batch_update_order(&list, &entries).await,
        };

        match result {
            Ok(()) => {
                log::debug!("remote {} applied", label);
                self.stats.applied.fetch_add(1, Ordering::Relaxed);
            }
            Err(err) => {
                log::error!("remote {} failed: {}", label, err);
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use okr_remote_lib::domain::{DomainError, DomainResult, Schedule};
    use okr_remote_lib::repository::{init_db, SqliteObjectiveRepository};
    use std::path::Path;

    async fn sqlite_sync() -> RemoteSync {
        let db = init_db(Path::new(":memory:")).await.unwrap();
        RemoteSync::spawn(Arc::new(SqliteObjectiveRepository::new(db.connection())))
    }

    fn objective(id: &str, order: i64) -> Objective {
        Objective::new(id.into(), "user-1".into(), format!("Objective {}", id), Schedule::default(), order)
    }

    /// Store that rejects every call
    struct Offline;

    #[async_trait]
    impl ObjectiveRepository for Offline {
        async fn list_objectives(&self, _owner_id: &str) -> DomainResult<Vec<Objective>> {
            Err(DomainError::RemoteRead("offline".into()))
        }

        async fn create_objective(&self, _objective: &Objective) -> DomainResult<String> {
            Err(DomainError::RemoteWrite("offline".into()))
        }

        async fn delete_objective(&self, _id: &str) -> DomainResult<()> {
            Err(DomainError::RemoteWrite("offline".into()))
        }

        async fn update_objective(&self, _id: &str, _patch: &ObjectivePatch) -> DomainResult<()> {
            Err(DomainError::RemoteWrite("offline".into()))
        }

        async fn batch_update_order(&self, _list: &SiblingList, _entries: &[OrderEntry]) -> DomainResult<()> {
            Err(DomainError::RemoteWrite("offline".into()))
        }
    }

    #[tokio::test]
    async fn test_writes_apply_in_order() {
        let sync = sqlite_sync().await;
        sync.enqueue(RemoteOp::CreateObjective(objective("a", 0)));
        sync.enqueue(RemoteOp::UpdateObjective {
            id: "a".into(),
            patch: ObjectivePatch {
                title: Some("Renamed".into()),
                ..Default::default()
            },
        });

        let fetched = sync.fetch("user-1").await;
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].title, "Renamed");
        assert_eq!(sync.stats().applied, 2);
    }

    #[tokio::test]
    async fn test_flush_is_not_counted_as_a_write() {
        let sync = sqlite_sync().await;
        sync.enqueue(RemoteOp::CreateObjective(objective("a", 0)));
        sync.flush().await;
        sync.flush().await;
        assert_eq!(
            sync.stats(),
            SyncSnapshot {
                applied: 1,
                failed: 0,
                failed_reads: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_order_sync() {
        let sync = sqlite_sync().await;
        sync.enqueue(RemoteOp::CreateObjective(objective("a", 0)));
        sync.enqueue(RemoteOp::CreateObjective(objective("b", 1)));
        sync.enqueue(RemoteOp::SyncOrder {
            list: SiblingList::Objectives,
            entries: vec![
                OrderEntry { id: "b".into(), order: 0 },
                OrderEntry { id: "a".into(), order: 1 },
            ],
        });

        let ids: Vec<_> = sync.fetch("user-1").await.into_iter().map(|o| o.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_failures_are_counted_not_raised() {
        let sync = RemoteSync::spawn(Arc::new(Offline));
        sync.enqueue(RemoteOp::CreateObjective(objective("a", 0)));
        sync.enqueue(RemoteOp::DeleteObjective { id: "a".into() });
        sync.flush().await;

        assert_eq!(
            sync.stats(),
            SyncSnapshot {
                applied: 0,
                failed: 2,
                failed_reads: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_failed_fetch_is_empty() {
        let sync = RemoteSync::spawn(Arc::new(Offline));
        assert!(sync.fetch("user-1").await.is_empty());
        assert_eq!(sync.stats().failed_reads, 1);
    }

    #[tokio::test]
    async fn test_missing_document_is_a_failed_write() {
        let sync = sqlite_sync().await;
        sync.enqueue(RemoteOp::DeleteObjective { id: "ghost".into() });
        sync.flush().await;
        assert_eq!(sync.stats().failed, 1);
    }
}
