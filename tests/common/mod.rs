//! Common test infrastructure shared across integration tests.
//!
//! This module provides:
//! - `fixtures`: fixture types covering every kind of nameable property
//! - `namers`: property namers that record how they were called
//!
//! # Usage
//!
//! From any integration test file:
//! ```ignore
//! #[path = "common/mod.rs"]
//! mod common;
//! use common::fixtures::{Widget, WidgetKind};
//! ```

pub mod fixtures;
pub mod namers;

use fixture_forge::BuilderSettings;
use std::sync::Arc;

/// Seed used by tests that need reproducible random sections.
#[allow(dead_code)]
pub const TEST_SEED: u64 = 0x5eed_f1c7;

/// Deterministic settings wrapped for sharing.
#[allow(dead_code)]
pub fn seeded_settings() -> Arc<BuilderSettings> {
    Arc::new(BuilderSettings::deterministic(TEST_SEED))
}

/// Runs `f` with a debug-level subscriber writing to the test output.
#[allow(dead_code)]
pub fn with_debug_logging<R>(f: impl FnOnce() -> R) -> R {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .finish();
    tracing::subscriber::with_default(subscriber, f)
}
