// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ov-worktree: create/destroy git worktrees on dedicated per-agent
//! branches (spec.md §4.3).

pub mod manager;
pub mod subprocess;

pub use manager::{WorktreeManager, WORKTREES_SUBDIR};
pub use ov_core::WorktreeError;
