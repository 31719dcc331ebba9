//! Quote store with slot-backed persistence
//!
//! Owns the quote collection, the selected category and the last viewed
//! index. Every mutation goes through this type and is persisted in full
//! before it becomes visible.

use super::selector::{parse_last_viewed, pick_index};
use super::types::*;
use crate::error::{Error, Result};
use crate::storage::{FileSlots, MemorySlots, SlotStore};
use crate::sync::{reconcile, MergeReport};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Persistent slot holding the JSON-encoded collection
pub const QUOTES_KEY: &str = "quotesData";
/// Persistent slot holding the selected category
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";
/// Session slot holding the last viewed index
pub const LAST_VIEWED_KEY: &str = "lastViewedQuoteIndex";

struct StoreState {
    quotes: Vec<Quote>,
    categories: Vec<String>,
    /// Raw persisted selection; only honored while it is a valid option
    saved_selection: Option<String>,
}

impl StoreState {
    fn commit(&mut self, quotes: Vec<Quote>) {
        self.categories = distinct_categories(&quotes);
        self.quotes = quotes;
    }

    fn selected_category(&self) -> String {
        match &self.saved_selection {
            Some(saved) if saved == ALL_CATEGORIES || self.categories.contains(saved) => {
                saved.clone()
            }
            _ => ALL_CATEGORIES.to_string(),
        }
    }
}

/// Quote collection behind persistent and session slots
pub struct QuoteStore {
    persistent: Arc<dyn SlotStore>,
    session: Arc<dyn SlotStore>,
    state: RwLock<StoreState>,
}

impl QuoteStore {
    /// Load the store from the given slots.
    ///
    /// A missing or malformed collection falls back to the default quotes.
    pub async fn load(persistent: Arc<dyn SlotStore>, session: Arc<dyn SlotStore>) -> Result<Self> {
        let quotes = match persistent.get(QUOTES_KEY).await {
            Ok(None) => default_quotes(),
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Quote>>(&raw) {
                Ok(quotes) => quotes,
                Err(e) => {
                    tracing::warn!(error = %e, "Stored quotes are malformed, using defaults");
                    default_quotes()
                }
            },
            Err(e @ Error::CorruptSlot(_)) => {
                tracing::warn!(error = %e, "Stored quotes are unreadable, using defaults");
                default_quotes()
            }
            Err(e) => return Err(e),
        };
        let saved_selection = match persistent.get(SELECTED_CATEGORY_KEY).await {
            Err(e @ Error::CorruptSlot(_)) => {
                tracing::warn!(error = %e, "Stored category selection is unreadable, ignoring");
                None
            }
            other => other?,
        };

        tracing::debug!(count = quotes.len(), "Quote store loaded");

        let mut state = StoreState {
            quotes: Vec::new(),
            categories: Vec::new(),
            saved_selection,
        };
        state.commit(quotes);

        Ok(Self {
            persistent,
            session,
            state: RwLock::new(state),
        })
    }

    /// Open a file-backed store under `data_dir` with a fresh session
    pub async fn open(data_dir: PathBuf) -> Result<Self> {
        let persistent = Arc::new(FileSlots::new(data_dir).await?);
        Self::load(persistent, Arc::new(MemorySlots::new())).await
    }

    /// Persist the current collection
    pub async fn save(&self) -> Result<()> {
        let state = self.state.read().await;
        self.write_quotes(&state.quotes).await
    }

    async fn write_quotes(&self, quotes: &[Quote]) -> Result<()> {
        let json = serde_json::to_string(quotes)?;
        self.persistent.set(QUOTES_KEY, &json).await
    }

    /// Snapshot of the collection
    pub async fn quotes(&self) -> Vec<Quote> {
        self.state.read().await.quotes.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.quotes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.quotes.is_empty()
    }

    /// Append a quote after trimming both fields.
    ///
    /// Empty text or category is rejected and nothing changes.
    pub async fn add_quote(&self, text: &str, category: &str) -> Result<Quote> {
        let text = text.trim();
        let category = category.trim();
        if text.is_empty() || category.is_empty() {
            return Err(Error::Validation(
                "Please enter both quote and category".to_string(),
            ));
        }

        let quote = Quote::new(text, category);
        let mut state = self.state.write().await;
        let mut quotes = state.quotes.clone();
        quotes.push(quote.clone());
        self.write_quotes(&quotes).await?;
        state.commit(quotes);

        tracing::info!(category = %quote.category, "Quote added");
        Ok(quote)
    }

    /// Append every entry of a JSON array document, returning how many were added.
    pub async fn import_quotes(&self, payload: &str) -> Result<usize> {
        let value: serde_json::Value = serde_json::from_str(payload)
            .map_err(|e| Error::InvalidImport(format!("Error reading JSON: {}", e)))?;
        self.import_value(value).await
    }

    /// Append every entry of an already-parsed JSON array.
    ///
    /// Entries are taken as-is; a payload that is not an array of objects is
    /// rejected as a whole.
    pub async fn import_value(&self, value: serde_json::Value) -> Result<usize> {
        if !value.is_array() {
            return Err(Error::InvalidImport(
                "Invalid JSON format. Expected an array".to_string(),
            ));
        }
        let imported: Vec<Quote> = serde_json::from_value(value)
            .map_err(|e| Error::InvalidImport(format!("Unsupported entry: {}", e)))?;

        let count = imported.len();
        let mut state = self.state.write().await;
        let mut quotes = state.quotes.clone();
        quotes.extend(imported);
        self.write_quotes(&quotes).await?;
        state.commit(quotes);

        tracing::info!(count, "Quotes imported");
        Ok(count)
    }

    /// Pretty-printed JSON document of the whole collection
    pub async fn export_quotes(&self) -> Result<String> {
        let state = self.state.read().await;
        Ok(serde_json::to_string_pretty(&state.quotes)?)
    }

    /// Merge server quotes into the collection and persist the result
    pub async fn merge_remote(&self, remote: &[Quote]) -> Result<MergeReport> {
        let mut state = self.state.write().await;
        let mut quotes = state.quotes.clone();
        let report = reconcile(&mut quotes, remote);
        self.write_quotes(&quotes).await?;
        state.commit(quotes);
        Ok(report)
    }

    /// Category options in first-seen order
    pub async fn categories(&self) -> Vec<String> {
        self.state.read().await.categories.clone()
    }

    /// Effective category filter (`"all"` if the saved one no longer exists)
    pub async fn selected_category(&self) -> String {
        self.state.read().await.selected_category()
    }

    pub async fn category_options(&self) -> CategoryOptions {
        let state = self.state.read().await;
        CategoryOptions {
            categories: state.categories.clone(),
            selected: state.selected_category(),
        }
    }

    /// Persist a new category filter
    pub async fn set_selected_category(&self, category: &str) -> Result<()> {
        let mut state = self.state.write().await;
        if category != ALL_CATEGORIES && !state.categories.iter().any(|c| c == category) {
            return Err(Error::Validation(format!("Unknown category '{}'", category)));
        }
        self.persistent.set(SELECTED_CATEGORY_KEY, category).await?;
        state.saved_selection = Some(category.to_string());
        Ok(())
    }

    /// Pick a random quote in `category` and remember it as last viewed.
    ///
    /// `None` means the category has no quotes.
    pub async fn pick_random(&self, category: &str) -> Result<Option<IndexedQuote>> {
        let picked = {
            let state = self.state.read().await;
            draw(&state.quotes, category).map(|index| IndexedQuote {
                index,
                quote: state.quotes[index].clone(),
            })
        };

        if let Some(picked) = &picked {
            self.session
                .set(LAST_VIEWED_KEY, &picked.index.to_string())
                .await?;
        }
        Ok(picked)
    }

    /// The last viewed quote of this session, if still in range
    pub async fn restore_last_viewed(&self) -> Result<Option<IndexedQuote>> {
        let raw = self.session.get(LAST_VIEWED_KEY).await?;
        let state = self.state.read().await;
        Ok(
            parse_last_viewed(raw.as_deref(), state.quotes.len()).map(|index| IndexedQuote {
                index,
                quote: state.quotes[index].clone(),
            }),
        )
    }
}

fn draw(quotes: &[Quote], category: &str) -> Option<usize> {
    pick_index(quotes, category, &mut rand::thread_rng())
}
