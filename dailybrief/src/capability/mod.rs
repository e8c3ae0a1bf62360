//! Contracts for the external collaborators the pipeline invokes.
//!
//! Content fetch, text generation, and speech synthesis are opaque to the
//! pipeline: it only relies on these narrow async traits and wraps every
//! invocation in a bounded timeout so no stage can hang a run.

use crate::errors::CapabilityError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;

/// One item returned by a content-fetch capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedItem {
    /// The item title.
    pub title: String,
    /// Link to the item.
    pub url: String,
    /// Short summary, possibly empty.
    pub summary: String,
}

impl FetchedItem {
    /// Creates a fetched item.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            summary: summary.into(),
        }
    }

    /// Renders the item as a markdown bullet, matching the research-note
    /// output format.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        if self.summary.is_empty() {
            format!("- [{}]({})", self.title, self.url)
        } else {
            format!("- [{}]({}) - {}", self.title, self.url, self.summary)
        }
    }
}

/// Fetches news, forum posts, or papers for a topic.
///
/// Implementations must return an empty vector, not an error, when no results
/// exist.
#[async_trait]
pub trait ContentFetcher: Send + Sync + Debug {
    /// A short display name for the source (used as a section heading).
    fn source(&self) -> &str;

    /// Fetches items for a topic.
    async fn fetch(&self, topic: &str) -> Result<Vec<FetchedItem>, CapabilityError>;
}

/// Generates text from a context and instructions.
///
/// Output is non-deterministic and that is acceptable: the pipeline only
/// requires reproducible file names and stage ordering, not reproducible
/// prose.
#[async_trait]
pub trait TextGenerator: Send + Sync + Debug {
    /// Generates text.
    async fn generate(&self, context: &str, instructions: &str)
        -> Result<String, CapabilityError>;
}

/// Voice settings handed to the speech synthesizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceParameters {
    /// Voice identifier understood by the synthesis backend.
    pub voice_id: String,
    /// Speaking-rate multiplier, 1.0 is normal speed.
    pub speaking_rate: f32,
}

impl Default for VoiceParameters {
    fn default() -> Self {
        Self {
            voice_id: "narrator".to_string(),
            speaking_rate: 1.0,
        }
    }
}

/// Renders text to audio bytes.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + Debug {
    /// Synthesizes speech for the given text.
    async fn synthesize(
        &self,
        text: &str,
        voice: &VoiceParameters,
    ) -> Result<Vec<u8>, CapabilityError>;
}

/// Runs a capability future under a bounded timeout.
///
/// On expiry the stage degrades rather than hanging the run.
pub async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T, CapabilityError>
where
    F: Future<Output = Result<T, CapabilityError>> + Send,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(CapabilityError::Timeout {
            limit_secs: limit.as_secs_f64(),
        }),
    }
}
