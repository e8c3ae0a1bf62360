//! Testing utilities for dailybrief pipelines.
//!
//! This module provides mock implementations of the capability traits so
//! pipelines can be exercised end to end without touching the network, a
//! language model, or a speech backend.

mod mocks;

pub use mocks::{
    EchoGenerator, EmptyFetcher, FailingFetcher, FailingGenerator, FailingSynthesizer,
    SlowGenerator, StaticFetcher, StaticGenerator, StaticSynthesizer,
};
