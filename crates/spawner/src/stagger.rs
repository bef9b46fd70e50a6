// SPDX-License-Identifier: MIT

//! Stagger delay computation (spec.md §4.6 step 2): a pure function so the
//! spawn pipeline's pacing logic is testable without a clock or a store.

use chrono::{DateTime, Utc};

/// Minimum wait, in milliseconds, before the next agent may start so that no
/// two agents start closer together than `window_ms`.
///
/// Returns 0 when there is no recent session to stagger against, or when
/// `window_ms` is zero or negative.
pub fn stagger_delay_ms(window_ms: i64, most_recent_started_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    if window_ms <= 0 {
        return 0;
    }
    let Some(started_at) = most_recent_started_at else {
        return 0;
    };
    let elapsed_ms = (now - started_at).num_milliseconds();
    (window_ms - elapsed_ms).max(0)
}

#[cfg(test)]
#[path = "stagger_tests.rs"]
mod tests;
