// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ov-pane: terminal multiplexer pane lifecycle (spec.md §4.4). Creates,
//! writes to, captures, and tears down the tmux panes agent processes run
//! inside of.

pub mod manager;
pub mod subprocess;

pub use manager::PaneManager;
pub use ov_core::SessionError;

/// Session name an agent's pane is registered under, matching the naming
/// convention in spec.md §5.
pub fn session_name(agent_name: &str) -> String {
    format!("overstory-{agent_name}")
}
