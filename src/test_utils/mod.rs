//! Test utilities for the expander
//!
//! Helpers shared by unit tests across modules:
//! - [`init_test_logging`] installs a test-writer tracing subscriber once
//! - [`fixture_instant`] and [`pinned_expander`] give time-dependent tests a
//!   stable clock and zone
//!
//! # Example
//!
//! ```rust,no_run
//! use expander::test_utils::{init_test_logging, pinned_expander};
//!
//! init_test_logging(None);
//! let out = pinned_expander().expand("{now(yyyy)}", &[]).unwrap();
//! assert_eq!(out, "2020");
//! ```

use chrono::{DateTime, TimeZone as _, Utc};
use std::sync::{Arc, Once};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::expander::{Expander, FixedClock};
use crate::format::TimeZone;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Epoch milliseconds of the fixture instant, `2020-05-05T16:52:02.346Z`.
pub const FIXTURE_MILLIS: i64 = 1_588_697_522_346;

/// Initialize logging for tests.
///
/// Only the first call has any effect. Uses `level` when given, otherwise
/// `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=expander=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

/// The instant at [`FIXTURE_MILLIS`].
#[must_use]
pub fn fixture_instant() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(FIXTURE_MILLIS).single().unwrap_or_default()
}

/// An expander in UTC whose clock is stopped at [`fixture_instant`].
#[must_use]
pub fn pinned_expander() -> Expander {
    Expander::new()
        .with_default_zone(TimeZone::utc())
        .with_clock(Arc::new(FixedClock(fixture_instant())))
}
