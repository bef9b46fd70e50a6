// SPDX-License-Identifier: MIT

//! `AgentSession`: the central entity of the system.

use crate::capability::Capability;
use crate::id::RunId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle states for an agent session (spec.md §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Booting,
    Working,
    Stalled,
    Zombie,
    Completed,
}

impl SessionState {
    /// Monotonicity rank used by the testable invariant in spec.md §8:
    /// `booting=0, working=0, stalled=1, zombie=2, completed=3`.
    pub fn monotonicity_rank(self) -> u8 {
        match self {
            SessionState::Booting | SessionState::Working => 0,
            SessionState::Stalled => 1,
            SessionState::Zombie => 2,
            SessionState::Completed => 3,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Completed)
    }
}

crate::simple_display! {
    SessionState {
        Booting => "booting",
        Working => "working",
        Stalled => "stalled",
        Zombie => "zombie",
        Completed => "completed",
    }
}

/// The branch name prefix enforced for every spawned agent: `overstory/<agentName>/`.
pub const BRANCH_PREFIX: &str = "overstory";

/// Build the canonical branch name for an agent/task pair.
pub fn branch_name(agent_name: &str, task_id: &str) -> String {
    format!("{BRANCH_PREFIX}/{agent_name}/{task_id}")
}

/// A durable record of one active or completed agent.
///
/// Uniquely keyed by `agent_name` (globally unique human string). See
/// spec.md §3 for the full invariant list; the store layer (`ov-storage`)
/// is responsible for enforcing uniqueness on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSession {
    pub agent_name: String,
    pub task_id: String,
    pub capability: Capability,
    pub worktree_path: String,
    pub branch_name: String,
    pub pane_id: String,
    pub state: SessionState,
    pub pid: Option<u32>,
    pub parent_agent: Option<String>,
    pub depth: u32,
    pub run_id: Option<RunId>,
    pub started_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub runtime: String,
}

impl AgentSession {
    /// Construct a new session in `booting` state. `started_at` and
    /// `last_activity` are both set to `now`, satisfying the
    /// `startedAt <= lastActivity` invariant at creation time.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        agent_name: impl Into<String>,
        task_id: impl Into<String>,
        capability: Capability,
        worktree_path: impl Into<String>,
        pane_id: impl Into<String>,
        depth: u32,
        run_id: Option<RunId>,
        runtime: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let agent_name = agent_name.into();
        let task_id = task_id.into();
        let branch = branch_name(&agent_name, &task_id);
        Self {
            branch_name: branch,
            agent_name,
            task_id,
            capability,
            worktree_path: worktree_path.into(),
            pane_id: pane_id.into(),
            state: SessionState::Booting,
            pid: None,
            parent_agent: None,
            depth,
            run_id,
            started_at: now,
            last_activity: now,
            runtime: runtime.into(),
        }
    }

    /// The `overstory/<agentName>/` prefix this session's branch must begin with.
    pub fn expected_branch_prefix(&self) -> String {
        format!("{BRANCH_PREFIX}/{}/", self.agent_name)
    }

    /// Checks the branch-name invariant from spec.md §3 and §8.
    pub fn branch_name_is_valid(&self) -> bool {
        self.branch_name.starts_with(&self.expected_branch_prefix())
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
