//! Mock capabilities for testing.

use crate::capability::{
    ContentFetcher, FetchedItem, SpeechSynthesizer, TextGenerator, VoiceParameters,
};
use crate::errors::CapabilityError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;

/// A fetcher returning a fixed list of items and recording every call.
#[derive(Debug)]
pub struct StaticFetcher {
    source: String,
    items: Vec<FetchedItem>,
    calls: Mutex<Vec<String>>,
}

impl StaticFetcher {
    /// Creates a fetcher that always returns `items`.
    #[must_use]
    pub fn new(source: impl Into<String>, items: Vec<FetchedItem>) -> Self {
        Self {
            source: source.into(),
            items,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// The topics passed to each call, in order.
    #[must_use]
    pub fn recorded_topics(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ContentFetcher for StaticFetcher {
    fn source(&self) -> &str {
        &self.source
    }

    async fn fetch(&self, topic: &str) -> Result<Vec<FetchedItem>, CapabilityError> {
        self.calls.lock().push(topic.to_string());
        Ok(self.items.clone())
    }
}

/// A fetcher that always returns zero items.
#[derive(Debug)]
pub struct EmptyFetcher {
    source: String,
}

impl EmptyFetcher {
    /// Creates an empty fetcher.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

#[async_trait]
impl ContentFetcher for EmptyFetcher {
    fn source(&self) -> &str {
        &self.source
    }

    async fn fetch(&self, _topic: &str) -> Result<Vec<FetchedItem>, CapabilityError> {
        Ok(Vec::new())
    }
}

/// A fetcher that always errors, recoverably by default.
#[derive(Debug)]
pub struct FailingFetcher {
    source: String,
    fatal: bool,
}

impl FailingFetcher {
    /// Creates a fetcher whose failures are recoverable.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            fatal: false,
        }
    }

    /// Creates a fetcher whose failures are fatal (authentication).
    #[must_use]
    pub fn fatal(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            fatal: true,
        }
    }
}

#[async_trait]
impl ContentFetcher for FailingFetcher {
    fn source(&self) -> &str {
        &self.source
    }

    async fn fetch(&self, _topic: &str) -> Result<Vec<FetchedItem>, CapabilityError> {
        if self.fatal {
            Err(CapabilityError::auth(format!(
                "{} rejected credentials",
                self.source
            )))
        } else {
            Err(CapabilityError::failed(format!(
                "{} is unreachable",
                self.source
            )))
        }
    }
}

/// A generator returning a fixed reply.
#[derive(Debug)]
pub struct StaticGenerator {
    reply: String,
}

impl StaticGenerator {
    /// Creates a generator that always returns `reply`.
    #[must_use]
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl TextGenerator for StaticGenerator {
    async fn generate(
        &self,
        _context: &str,
        _instructions: &str,
    ) -> Result<String, CapabilityError> {
        Ok(self.reply.clone())
    }
}

/// A generator that echoes its context back, for asserting on what a stage
/// passed in.
#[derive(Debug)]
pub struct EchoGenerator;

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(
        &self,
        context: &str,
        _instructions: &str,
    ) -> Result<String, CapabilityError> {
        Ok(context.to_string())
    }
}

/// A generator that sleeps longer than any reasonable stage timeout.
#[derive(Debug)]
pub struct SlowGenerator {
    delay: Duration,
}

impl SlowGenerator {
    /// Creates a generator that sleeps for `delay` before replying.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl TextGenerator for SlowGenerator {
    async fn generate(
        &self,
        _context: &str,
        _instructions: &str,
    ) -> Result<String, CapabilityError> {
        tokio::time::sleep(self.delay).await;
        Ok("too late".to_string())
    }
}

/// A generator that always errors recoverably.
#[derive(Debug)]
pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(
        &self,
        _context: &str,
        _instructions: &str,
    ) -> Result<String, CapabilityError> {
        Err(CapabilityError::failed("generation backend unavailable"))
    }
}

/// A synthesizer returning fixed audio bytes.
#[derive(Debug)]
pub struct StaticSynthesizer {
    bytes: Vec<u8>,
}

impl StaticSynthesizer {
    /// Creates a synthesizer that always returns `bytes`.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

#[async_trait]
impl SpeechSynthesizer for StaticSynthesizer {
    async fn synthesize(
        &self,
        _text: &str,
        _voice: &VoiceParameters,
    ) -> Result<Vec<u8>, CapabilityError> {
        Ok(self.bytes.clone())
    }
}

/// A synthesizer that always errors recoverably.
#[derive(Debug)]
pub struct FailingSynthesizer;

#[async_trait]
impl SpeechSynthesizer for FailingSynthesizer {
    async fn synthesize(
        &self,
        _text: &str,
        _voice: &VoiceParameters,
    ) -> Result<Vec<u8>, CapabilityError> {
        Err(CapabilityError::failed("synthesis backend unavailable"))
    }
}
