//! Server sync
//!
//! Polls a remote collection endpoint, merges the returned quotes into the
//! local store (server wins on category conflicts) and pushes newly added
//! quotes back on a best-effort basis.

mod engine;
pub mod handler;
mod reconcile;
mod remote;

pub use engine::{spawn_sync_loop, SyncEngine, SyncOutcome};
pub use handler::{sync_router, SyncState};
pub use reconcile::{reconcile, MergeReport};
pub use remote::{HttpRemote, RemoteSource};
