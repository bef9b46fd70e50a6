// SPDX-License-Identifier: MIT

//! `StoredEvent`: the append-only timeline entry.

use crate::id::RunId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    ToolStart,
    ToolEnd,
    SessionStart,
    SessionEnd,
    MailSent,
    MailReceived,
    Spawn,
    Error,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventLevel {
    Info,
    Warn,
    Error,
}

/// A single append-only timeline entry (spec.md §3, §4.11).
///
/// `id` is assigned by the event store on append (monotonic auto-increment);
/// `StoredEvent::pending` constructs one without an id for callers that
/// haven't appended yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvent {
    pub id: u64,
    pub agent_name: String,
    pub event_type: EventType,
    pub level: EventLevel,
    pub run_id: Option<RunId>,
    pub created_at: DateTime<Utc>,
    /// Type-specific payload: tool name, duration, or free-form data.
    pub payload: serde_json::Value,
}

impl StoredEvent {
    /// Build an event with `id = 0`; the event store assigns the real id on append.
    pub fn pending(
        agent_name: impl Into<String>,
        event_type: EventType,
        level: EventLevel,
        run_id: Option<RunId>,
        now: DateTime<Utc>,
        payload: serde_json::Value,
    ) -> Self {
        Self { id: 0, agent_name: agent_name.into(), event_type, level, run_id, created_at: now, payload }
    }
}
