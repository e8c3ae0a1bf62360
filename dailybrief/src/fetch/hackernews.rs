//! Hacker News fetcher backed by the Algolia search API.

use super::{build_client, status_error};
use crate::capability::{ContentFetcher, FetchedItem};
use crate::errors::CapabilityError;
use async_trait::async_trait;
use serde::Deserialize;

const SEARCH_URL: &str = "https://hn.algolia.com/api/v1/search";

/// Fetches top Hacker News stories matching a topic.
#[derive(Debug)]
pub struct HackerNewsFetcher {
    client: reqwest::Client,
    max_items: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    title: Option<String>,
    url: Option<String>,
    #[serde(rename = "objectID")]
    object_id: String,
    #[serde(default)]
    points: Option<i64>,
}

impl HackerNewsFetcher {
    /// Creates a fetcher returning at most `max_items` stories.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(max_items: usize) -> Result<Self, CapabilityError> {
        Ok(Self {
            client: build_client(30)?,
            max_items,
        })
    }
}

#[async_trait]
impl ContentFetcher for HackerNewsFetcher {
    fn source(&self) -> &str {
        "HackerNews"
    }

    async fn fetch(&self, topic: &str) -> Result<Vec<FetchedItem>, CapabilityError> {
        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("query", topic),
                ("tags", "story"),
                ("hitsPerPage", &self.max_items.to_string()),
            ])
            .send()
            .await
            .map_err(|e| CapabilityError::failed(format!("hn request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, "HackerNews"));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| CapabilityError::failed(format!("hn response: {e}")))?;

        let items = body
            .hits
            .into_iter()
            .filter_map(|hit| {
                let title = hit.title?;
                // Ask-HN style posts have no external URL; link the thread.
                let url = hit.url.unwrap_or_else(|| {
                    format!("https://news.ycombinator.com/item?id={}", hit.object_id)
                });
                let summary = hit
                    .points
                    .map(|p| format!("{p} points"))
                    .unwrap_or_default();
                Some(FetchedItem::new(title, url, summary))
            })
            .take(self.max_items)
            .collect();

        Ok(items)
    }
}
