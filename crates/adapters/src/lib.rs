// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ov-adapters: the uniform runtime adapter layer over heterogeneous
//! coding-assistant CLIs (spec.md §4.2).

pub mod adapter;
pub mod deploy;
pub mod error;
pub mod guards;
pub mod registry;
pub mod transcript;
pub mod variants;

pub use adapter::{AppendSystemPrompt, ReadyState, RuntimeAdapter, SpawnCommandOptions, TranscriptSummary};
pub use error::AgentAdapterError;
pub use guards::HooksDef;
pub use registry::RuntimeRegistry;
pub use variants::{Headless, Hybrid, InteractiveTui};
