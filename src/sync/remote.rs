//! Remote quote source
//!
//! The server is a generic post collection: items are fetched with GET and
//! new quotes are pushed with POST to the same endpoint.

use crate::config::SyncConfig;
use crate::error::{Error, Result};
use crate::quotes::Quote;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Source of server-side quotes
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetch the current server quotes
    async fn fetch_quotes(&self) -> Result<Vec<Quote>>;

    /// Send a newly added quote to the server
    async fn push_quote(&self, quote: &Quote) -> Result<()>;
}

/// Item as returned by the collection endpoint
#[derive(Debug, Deserialize)]
struct RemotePost {
    #[serde(default)]
    title: String,
}

/// Body sent when pushing a quote
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewPost<'a> {
    title: &'a str,
    body: &'a str,
    user_id: u64,
}

/// HTTP client for the collection endpoint
pub struct HttpRemote {
    client: reqwest::Client,
    endpoint: String,
    fetch_limit: usize,
    server_category: String,
    user_id: u64,
}

impl HttpRemote {
    pub fn new(config: &SyncConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            fetch_limit: config.fetch_limit,
            server_category: config.server_category.clone(),
            user_id: config.user_id,
        })
    }
}

#[async_trait]
impl RemoteSource for HttpRemote {
    async fn fetch_quotes(&self) -> Result<Vec<Quote>> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?;

        let posts: Vec<RemotePost> = response
            .json()
            .await
            .map_err(|e| Error::Remote(format!("Failed to parse server quotes: {}", e)))?;

        let quotes: Vec<Quote> = posts
            .into_iter()
            .take(self.fetch_limit)
            .map(|post| Quote::new(post.title, self.server_category.clone()))
            .collect();

        tracing::debug!(count = quotes.len(), endpoint = %self.endpoint, "Fetched server quotes");
        Ok(quotes)
    }

    async fn push_quote(&self, quote: &Quote) -> Result<()> {
        let body = NewPost {
            title: &quote.text,
            body: &quote.category,
            user_id: self.user_id,
        };

        self.client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        tracing::debug!(endpoint = %self.endpoint, "Pushed quote to server");
        Ok(())
    }
}
