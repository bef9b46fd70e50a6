// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ov-mail: the mail bus (spec.md §4.9). Thin business layer over
//! `ov_storage::MailStore` adding combined filtering and the `check`
//! operation the runtime's pre-prompt hook uses to inject coordination
//! mail into an agent's next turn.

pub mod bus;
pub mod filter;

pub use bus::MailBus;
pub use filter::MessageFilter;
pub use ov_core::{Message, MessageType, Priority, ORCHESTRATOR};
