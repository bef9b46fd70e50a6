// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ov-events: the event bus (spec.md §4.11). A thin query layer over
//! `ov_storage::EventStore` adding the `since`/`until`/`limit` window every
//! query shape accepts. All three query shapes return events non-decreasing
//! in `(created_at, id)`, since `EventStore` already guarantees that
//! ordering and this crate only filters, never re-sorts.

pub mod bus;
pub mod query;

pub use bus::EventBus;
pub use ov_core::{EventLevel, EventType, StoredEvent};
pub use query::EventQuery;
