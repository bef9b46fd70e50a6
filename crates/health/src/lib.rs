// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ov-health: the pure session health state machine (spec.md §4.7) and the
//! watchdog task that drives it (spec.md §4.8). The session *store* lives in
//! `ov-storage`; this crate only consumes it.

pub mod state_machine;
pub mod watchdog;

pub use state_machine::{evaluate_health, transition_state, Action, HealthCheck};
pub use watchdog::{Watchdog, WatchdogConfig};
