//! Reddit fetcher backed by the public listing JSON endpoint.

use super::{build_client, status_error};
use crate::capability::{ContentFetcher, FetchedItem};
use crate::errors::CapabilityError;
use async_trait::async_trait;
use serde::Deserialize;

/// Fetches top posts from one subreddit.
///
/// The subreddit is fixed at construction (the daily pipeline reads
/// r/artificial); the fetch topic is ignored since a subreddit is already a
/// topic.
#[derive(Debug)]
pub struct RedditFetcher {
    client: reqwest::Client,
    subreddit: String,
    max_items: usize,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    title: String,
    #[serde(default)]
    url: Option<String>,
    permalink: String,
    #[serde(default)]
    score: Option<i64>,
    #[serde(default)]
    is_self: bool,
}

impl Post {
    /// Self posts link back to the thread; link posts keep their external URL.
    fn link(&self) -> String {
        match (&self.url, self.is_self) {
            (Some(url), false) => url.clone(),
            _ => format!("https://www.reddit.com{}", self.permalink),
        }
    }
}

impl RedditFetcher {
    /// Creates a fetcher for `r/{subreddit}` returning at most `max_items`
    /// posts.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(subreddit: impl Into<String>, max_items: usize) -> Result<Self, CapabilityError> {
        Ok(Self {
            client: build_client(30)?,
            subreddit: subreddit.into(),
            max_items,
        })
    }
}

#[async_trait]
impl ContentFetcher for RedditFetcher {
    fn source(&self) -> &str {
        "Reddit"
    }

    async fn fetch(&self, _topic: &str) -> Result<Vec<FetchedItem>, CapabilityError> {
        let url = format!("https://www.reddit.com/r/{}/top.json", self.subreddit);
        let response = self
            .client
            .get(&url)
            .query(&[("limit", self.max_items.to_string().as_str()), ("t", "day")])
            .send()
            .await
            .map_err(|e| CapabilityError::failed(format!("reddit request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, "Reddit"));
        }

        let listing: Listing = response
            .json()
            .await
            .map_err(|e| CapabilityError::failed(format!("reddit response: {e}")))?;

        let items = listing
            .data
            .children
            .into_iter()
            .map(|child| {
                let summary = child
                    .data
                    .score
                    .map(|s| format!("{s} upvotes"))
                    .unwrap_or_default();
                FetchedItem::new(child.data.title.clone(), child.data.link(), summary)
            })
            .take(self.max_items)
            .collect();

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_parsing() {
        let raw = r#"{
            "data": {
                "children": [
                    {"data": {"title": "New model drops", "url": "https://example.com/a",
                              "permalink": "/r/artificial/comments/1/new_model/", "score": 91,
                              "is_self": false}},
                    {"data": {"title": "Discussion thread", "url": "https://www.reddit.com/r/artificial/comments/2/",
                              "permalink": "/r/artificial/comments/2/discussion/", "score": 12,
                              "is_self": true}}
                ]
            }
        }"#;
        let listing: Listing = serde_json::from_str(raw).unwrap();
        assert_eq!(listing.data.children.len(), 2);

        let link_post = &listing.data.children[0].data;
        assert_eq!(link_post.link(), "https://example.com/a");

        let self_post = &listing.data.children[1].data;
        assert_eq!(
            self_post.link(),
            "https://www.reddit.com/r/artificial/comments/2/discussion/"
        );
    }

    #[test]
    fn test_missing_optional_fields() {
        let raw = r#"{"data": {"children": [
            {"data": {"title": "Bare", "permalink": "/r/artificial/comments/3/bare/"}}
        ]}}"#;
        let listing: Listing = serde_json::from_str(raw).unwrap();
        let post = &listing.data.children[0].data;
        assert!(post.url.is_none());
        assert_eq!(post.score, None);
        assert_eq!(post.link(), "https://www.reddit.com/r/artificial/comments/3/bare/");
    }
}
