// SPDX-License-Identifier: MIT

//! Merge queue entry type.

use crate::id::MergeQueueEntryId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStatus {
    Pending,
    Merging,
    Merged,
    Conflict,
    Failed,
}

crate::simple_display! {
    MergeStatus {
        Pending => "pending",
        Merging => "merging",
        Merged => "merged",
        Conflict => "conflict",
        Failed => "failed",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeQueueEntry {
    pub id: MergeQueueEntryId,
    pub branch_name: String,
    pub agent_name: String,
    pub status: MergeStatus,
    pub enqueued_at: DateTime<Utc>,
    pub conflict_summary: Option<String>,
}

impl MergeQueueEntry {
    pub fn new(branch_name: impl Into<String>, agent_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: MergeQueueEntryId::new(),
            branch_name: branch_name.into(),
            agent_name: agent_name.into(),
            status: MergeStatus::Pending,
            enqueued_at: now,
            conflict_summary: None,
        }
    }
}
