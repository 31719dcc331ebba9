//! File-backed slots
//!
//! Directory layout:
//! ```text
//! <data_dir>/
//! ├── quotesData
//! ├── selectedCategory
//! └── ...
//! ```

use super::{validate_key, SlotStore};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::PathBuf;

/// Durable slots, one file per key
pub struct FileSlots {
    dir: PathBuf,
}

impl FileSlots {
    /// Open (and create if needed) a slot directory
    pub async fn new(dir: PathBuf) -> Result<Self> {
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(key))
    }
}

#[async_trait]
impl SlotStore for FileSlots {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|_| Error::CorruptSlot(key.to_string()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        // Write-then-rename so a crash never leaves a half-written slot.
        let tmp = self.dir.join(format!(".{}.tmp", key));
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        tracing::trace!(key, bytes = value.len(), "Slot written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_get_missing_slot() {
        let dir = TempDir::new().unwrap();
        let slots = FileSlots::new(dir.path().to_path_buf()).await.unwrap();
        assert!(slots.get("quotesData").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_then_get_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let slots = FileSlots::new(dir.path().to_path_buf()).await.unwrap();
            slots.set("selectedCategory", "Philosophy").await.unwrap();
        }

        let slots = FileSlots::new(dir.path().to_path_buf()).await.unwrap();
        assert_eq!(
            slots.get("selectedCategory").await.unwrap().as_deref(),
            Some("Philosophy")
        );
    }

    #[tokio::test]
    async fn test_set_replaces_value() {
        let dir = TempDir::new().unwrap();
        let slots = FileSlots::new(dir.path().to_path_buf()).await.unwrap();
        slots.set("k", "a much longer first value").await.unwrap();
        slots.set("k", "short").await.unwrap();
        assert_eq!(slots.get("k").await.unwrap().as_deref(), Some("short"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_corrupt_slot() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("quotesData"), [0xff, 0xfe, b'[', b']']).unwrap();
        let slots = FileSlots::new(dir.path().to_path_buf()).await.unwrap();

        let err = slots.get("quotesData").await.unwrap_err();
        assert!(matches!(err, Error::CorruptSlot(key) if key == "quotesData"));
    }

    #[tokio::test]
    async fn test_creates_nested_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let slots = FileSlots::new(nested.clone()).await.unwrap();
        assert!(nested.is_dir());
        slots.set("k", "v").await.unwrap();
        assert!(nested.join("k").is_file());
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let dir = TempDir::new().unwrap();
        let slots = FileSlots::new(dir.path().to_path_buf()).await.unwrap();
        assert!(slots.set("../escape", "x").await.is_err());
    }
}
