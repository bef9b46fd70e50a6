// SPDX-License-Identifier: MIT

//! `RunRecord`: an orchestrator-initiated batch of agents.

use crate::id::RunId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: RunId,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub status: RunStatus,
    /// Total agents registered under this run.
    pub agent_count: u32,
    /// Agents that have reached `completed`.
    pub completed_count: u32,
}

impl RunRecord {
    pub fn new(run_id: RunId, now: DateTime<Utc>) -> Self {
        Self { run_id, started_at: now, ended_at: None, status: RunStatus::Active, agent_count: 0, completed_count: 0 }
    }

    pub fn record_spawn(&mut self) {
        self.agent_count += 1;
    }

    /// Mark one agent complete; ends the run once every spawned agent has
    /// completed (idempotent — calling it again once ended is a no-op, per
    /// the idempotency conventions `ov-storage` relies on for replay).
    pub fn record_completion(&mut self, now: DateTime<Utc>) {
        if self.status == RunStatus::Completed {
            return;
        }
        self.completed_count += 1;
        if self.completed_count >= self.agent_count {
            self.status = RunStatus::Completed;
            self.ended_at = Some(now);
        }
    }
}
