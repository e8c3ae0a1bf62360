//! HTTP-backed content fetchers.
//!
//! Real [`ContentFetcher`](crate::capability::ContentFetcher) implementations
//! for the sources the daily pipeline reads. Gated behind the `fetchers`
//! feature so the core pipeline stays network-free.

mod arxiv;
mod hackernews;
mod reddit;

pub use arxiv::ArxivFetcher;
pub use hackernews::HackerNewsFetcher;
pub use reddit::RedditFetcher;

use crate::errors::CapabilityError;

pub(crate) fn build_client(timeout_secs: u64) -> Result<reqwest::Client, CapabilityError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .user_agent(concat!("dailybrief/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| CapabilityError::failed(format!("http client: {e}")))
}

pub(crate) fn status_error(status: reqwest::StatusCode, source: &str) -> CapabilityError {
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        CapabilityError::auth(format!("{source} returned {status}"))
    } else {
        CapabilityError::failed(format!("{source} returned {status}"))
    }
}
