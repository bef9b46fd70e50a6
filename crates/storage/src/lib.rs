// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ov-storage: the WAL + snapshot persistence layer underneath every
//! Overstory store (sessions, mail, merge queue, events, metrics).

pub mod error;
pub mod snapshot;
pub mod store;
pub mod wal;

pub mod events_store;
pub mod mail_store;
pub mod merge_queue_store;
pub mod metrics_store;
pub mod sessions_store;

pub use error::StoreError;
pub use store::{MaterializedState, Store};
pub use wal::Wal;

pub use events_store::EventStore;
pub use mail_store::MailStore;
pub use merge_queue_store::MergeQueueStore;
pub use metrics_store::{AgentMetrics, MetricsStore};
pub use sessions_store::SessionStore;
