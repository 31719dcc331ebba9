//! Key-value slots
//!
//! Quotes and preferences are stored as plain string values under string
//! keys. Two backends exist:
//!
//! - [`FileSlots`]: durable, one file per key under a data directory
//! - [`MemorySlots`]: session-scoped, lives as long as the process

mod file;
mod memory;

pub use file::FileSlots;
pub use memory::MemorySlots;

use crate::error::{Error, Result};
use async_trait::async_trait;

/// String-keyed string storage
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Read a slot, `None` if it was never written
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the whole value of a slot
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Keys double as file names, so only a conservative charset is allowed.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(Error::Storage(format!("Invalid slot key '{}'", key)))
    }
}
