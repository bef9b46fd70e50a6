// SPDX-License-Identifier: MIT

use super::*;
use chrono::Utc;

#[test]
fn new_session_has_valid_branch_name() {
    let session = AgentSession::new(
        "builder-abc1", "ov-abc1", Capability::Builder, "/proj/.overstory/worktrees/builder-abc1",
        "overstory-builder-abc1", 0, None, "interactive-tui", Utc::now(),
    );
    assert_eq!(session.branch_name, "overstory/builder-abc1/ov-abc1");
    assert!(session.branch_name_is_valid());
    assert_eq!(session.state, SessionState::Booting);
    assert_eq!(session.started_at, session.last_activity);
}

#[test]
fn branch_name_invariant_rejects_foreign_prefix() {
    let mut session = AgentSession::new(
        "builder-abc1", "ov-abc1", Capability::Builder, "/wt", "pane", 0, None, "x", Utc::now(),
    );
    session.branch_name = "overstory/someone-else/ov-abc1".to_string();
    assert!(!session.branch_name_is_valid());
}

#[test]
fn monotonicity_ranks_match_spec() {
    assert_eq!(SessionState::Booting.monotonicity_rank(), 0);
    assert_eq!(SessionState::Working.monotonicity_rank(), 0);
    assert_eq!(SessionState::Stalled.monotonicity_rank(), 1);
    assert_eq!(SessionState::Zombie.monotonicity_rank(), 2);
    assert_eq!(SessionState::Completed.monotonicity_rank(), 3);
}

#[test]
fn only_completed_is_terminal() {
    assert!(SessionState::Completed.is_terminal());
    assert!(!SessionState::Zombie.is_terminal());
    assert!(!SessionState::Booting.is_terminal());
}

#[test]
fn branch_name_helper_matches_prefix_format() {
    assert_eq!(branch_name("scout-1", "ov-xyz"), "overstory/scout-1/ov-xyz");
}
