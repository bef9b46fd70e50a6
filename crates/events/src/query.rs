// SPDX-License-Identifier: MIT

//! `EventQuery`: the `{since, until, limit}` window every event-bus query
//! shape accepts (spec.md §4.11).

use chrono::{DateTime, Utc};
use ov_core::StoredEvent;

#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl EventQuery {
    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// `events` must already be in `(created_at, id)` ascending order; this
    /// never re-sorts, only narrows.
    pub(crate) fn apply(&self, events: Vec<StoredEvent>) -> Vec<StoredEvent> {
        let mut filtered: Vec<StoredEvent> = events
            .into_iter()
            .filter(|e| self.since.is_none_or(|since| e.created_at >= since))
            .filter(|e| self.until.is_none_or(|until| e.created_at <= until))
            .collect();

        if let Some(limit) = self.limit {
            if filtered.len() > limit {
                filtered = filtered.split_off(filtered.len() - limit);
            }
        }
        filtered
    }
}
