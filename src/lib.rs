//! QuoteSync - Quote collection manager with periodic server sync
//!
//! QuoteSync keeps an ordered list of `(text, category)` quotes, shows a
//! random one (optionally filtered by category), supports add / import /
//! export, and periodically merges quotes from a remote collection endpoint.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │            CLI (clap)  /  HTTP API (axum)             │
//! └───────────────┬──────────────────────┬───────────────┘
//!                 │                      │
//!   ┌─────────────▼─────────────┐ ┌──────▼───────────────┐
//!   │        QuoteStore         │◄┤      SyncEngine      │
//!   │  - collection (RwLock)    │ │  - busy guard        │
//!   │  - selected category      │ │  - reconcile (LWW)   │
//!   │  - last viewed index      │ │  - status line (TTL) │
//!   └─────────────┬─────────────┘ └──────┬───────────────┘
//!                 │                      │
//!   ┌─────────────▼─────────────┐ ┌──────▼───────────────┐
//!   │  SlotStore                │ │  RemoteSource        │
//!   │  FileSlots / MemorySlots  │ │  HttpRemote (reqwest)│
//!   └───────────────────────────┘ └──────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`quotes`]: quote types, store, random selection, HTTP handlers
//! - [`sync`]: remote source, reconciliation, sync engine
//! - [`storage`]: string key-value slots
//! - [`api`]: unified HTTP router
//! - [`config`]: configuration management

pub mod api;
pub mod config;
pub mod error;
pub mod quotes;
pub mod storage;
pub mod sync;

pub use config::QuoteSyncConfig;
pub use error::{Error, Result};
