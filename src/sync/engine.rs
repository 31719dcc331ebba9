//! Sync engine: fetch, reconcile, report
//!
//! Runs `idle → fetching → merging → idle` on every trigger. A trigger that
//! arrives while another run is in flight is skipped.

use super::remote::RemoteSource;
use crate::config::SyncConfig;
use crate::quotes::{Quote, QuoteStore};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Outcome of a single sync run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Server quotes were merged and persisted
    Merged { conflicts: usize, added: usize },
    /// Server returned no quotes
    NothingToMerge,
    /// Fetch or persist failed; the collection is unchanged
    Failed { reason: String },
    /// Another run was already in flight
    Skipped,
}

/// Transient status line
#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    set_at: Instant,
}

/// Resets the busy flag when a run ends, however it ends
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Periodic and on-demand server sync for a quote store
pub struct SyncEngine {
    store: Arc<QuoteStore>,
    remote: Arc<dyn RemoteSource>,
    busy: AtomicBool,
    status: RwLock<Option<StatusMessage>>,
    status_ttl: Duration,
    interval: Duration,
}

impl SyncEngine {
    pub fn new(store: Arc<QuoteStore>, remote: Arc<dyn RemoteSource>, config: &SyncConfig) -> Self {
        Self {
            store,
            remote,
            busy: AtomicBool::new(false),
            status: RwLock::new(None),
            status_ttl: Duration::from_secs(config.status_ttl_secs),
            interval: Duration::from_secs(config.interval_secs.max(1)),
        }
    }

    pub fn store(&self) -> &Arc<QuoteStore> {
        &self.store
    }

    /// Whether a run is currently in flight
    pub fn is_syncing(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Fetch server quotes and merge them into the store.
    pub async fn sync_now(&self) -> SyncOutcome {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Sync already in progress, skipping");
            return SyncOutcome::Skipped;
        }
        let _guard = BusyGuard(&self.busy);

        let remote_quotes = match self.remote.fetch_quotes().await {
            Ok(quotes) => quotes,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch server quotes");
                return SyncOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        if remote_quotes.is_empty() {
            tracing::debug!("Server returned no quotes");
            return SyncOutcome::NothingToMerge;
        }

        let report = match self.store.merge_remote(&remote_quotes).await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(error = %e, "Failed to persist merged quotes");
                return SyncOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        let message = if report.conflicts > 0 {
            format!(
                "{} conflicts resolved (server version applied)",
                report.conflicts
            )
        } else {
            "Synced with server — no conflicts".to_string()
        };
        self.set_status(message).await;

        tracing::info!(
            conflicts = report.conflicts,
            added = report.added,
            "Synced with server"
        );

        SyncOutcome::Merged {
            conflicts: report.conflicts,
            added: report.added,
        }
    }

    /// Current status message, if it has not expired
    pub async fn status(&self) -> Option<String> {
        let status = self.status.read().await;
        status
            .as_ref()
            .filter(|s| s.set_at.elapsed() < self.status_ttl)
            .map(|s| s.text.clone())
    }

    async fn set_status(&self, text: String) {
        *self.status.write().await = Some(StatusMessage {
            text,
            set_at: Instant::now(),
        });
    }

    /// Push a quote to the server; failures are logged and dropped.
    pub async fn push_quote(&self, quote: &Quote) {
        if let Err(e) = self.remote.push_quote(quote).await {
            tracing::warn!(error = %e, "Failed to push quote to server");
        }
    }

    /// Fire-and-forget variant of [`push_quote`](Self::push_quote)
    pub fn push_in_background(self: &Arc<Self>, quote: Quote) -> JoinHandle<()> {
        let engine = Arc::clone(self);
        tokio::spawn(async move {
            engine.push_quote(&quote).await;
        })
    }
}

/// Spawn the periodic sync loop. The first run happens one interval after start.
pub fn spawn_sync_loop(engine: Arc<SyncEngine>) -> JoinHandle<()> {
    let period = engine.interval;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // Skip the first immediate tick
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let outcome = engine.sync_now().await;
            tracing::debug!(?outcome, "Periodic sync finished");
        }
    })
}
