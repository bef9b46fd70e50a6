use super::*;
use ov_core::Capability;
use proptest::prelude::*;

fn sample_session(state: SessionState, last_activity: DateTime<Utc>) -> AgentSession {
    let mut session = AgentSession::new("alice", "task-1", Capability::Builder, "/wt/alice", "pane-1", 0, None, "headless", last_activity);
    session.state = state;
    session.last_activity = last_activity;
    session
}

#[test]
fn dead_pane_is_always_zombie_terminate() {
    let now = Utc::now();
    let session = sample_session(SessionState::Working, now);
    let check = evaluate_health(&session, false, 30_000, 120_000, now);
    assert_eq!(check, HealthCheck { state: SessionState::Zombie, action: Action::Terminate });
}

#[test]
fn booting_promotes_to_working_on_recent_activity() {
    let now = Utc::now();
    let session = sample_session(SessionState::Booting, now - chrono::Duration::seconds(5));
    let check = evaluate_health(&session, true, 30_000, 120_000, now);
    assert_eq!(check, HealthCheck { state: SessionState::Working, action: Action::None });
}

#[test]
fn elapsed_past_stale_threshold_escalates() {
    let now = Utc::now();
    let session = sample_session(SessionState::Working, now - chrono::Duration::seconds(35));
    let check = evaluate_health(&session, true, 30_000, 120_000, now);
    assert_eq!(check, HealthCheck { state: SessionState::Stalled, action: Action::Escalate });
}

#[test]
fn elapsed_past_zombie_threshold_terminates_even_if_pane_alive() {
    let now = Utc::now();
    let session = sample_session(SessionState::Stalled, now - chrono::Duration::seconds(121));
    let check = evaluate_health(&session, true, 30_000, 120_000, now);
    assert_eq!(check, HealthCheck { state: SessionState::Zombie, action: Action::Terminate });
}

#[test]
fn working_session_under_threshold_holds_state() {
    let now = Utc::now();
    let session = sample_session(SessionState::Working, now - chrono::Duration::seconds(5));
    let check = evaluate_health(&session, true, 30_000, 120_000, now);
    assert_eq!(check, HealthCheck { state: SessionState::Working, action: Action::None });
}

#[test]
fn action_terminate_implies_zombie_state() {
    // spec.md §8: "For all health evaluations, action = terminate => resulting state = zombie."
    let now = Utc::now();
    for pane_alive in [true, false] {
        for state in [SessionState::Booting, SessionState::Working, SessionState::Stalled] {
            for elapsed in [0, 5_000, 35_000, 121_000] {
                let session = sample_session(state, now - chrono::Duration::milliseconds(elapsed));
                let check = evaluate_health(&session, pane_alive, 30_000, 120_000, now);
                if check.action == Action::Terminate {
                    assert_eq!(check.state, SessionState::Zombie);
                }
            }
        }
    }
}

#[test]
fn transition_rejects_stalled_to_booting() {
    assert_eq!(transition_state(SessionState::Stalled, SessionState::Booting), SessionState::Stalled);
}

#[test]
fn transition_rejects_zombie_to_working() {
    assert_eq!(transition_state(SessionState::Zombie, SessionState::Working), SessionState::Zombie);
}

#[test]
fn transition_rejects_completed_to_anything() {
    for candidate in [SessionState::Booting, SessionState::Working, SessionState::Stalled, SessionState::Zombie] {
        assert_eq!(transition_state(SessionState::Completed, candidate), SessionState::Completed);
    }
}

#[test]
fn transition_allows_stalled_back_to_working() {
    assert_eq!(transition_state(SessionState::Stalled, SessionState::Working), SessionState::Working);
}

#[test]
fn transition_allows_zombie_to_completed() {
    assert_eq!(transition_state(SessionState::Zombie, SessionState::Completed), SessionState::Completed);
}

fn arb_state() -> impl Strategy<Value = SessionState> {
    prop_oneof![
        Just(SessionState::Booting),
        Just(SessionState::Working),
        Just(SessionState::Stalled),
        Just(SessionState::Zombie),
        Just(SessionState::Completed),
    ]
}

proptest! {
    #[test]
    fn monotonicity_rank_never_decreases_across_a_transition(current in arb_state(), candidate in arb_state()) {
        let next = transition_state(current, candidate);
        prop_assert!(next.monotonicity_rank() >= current.monotonicity_rank());
    }

    #[test]
    fn transition_result_is_either_current_or_candidate(current in arb_state(), candidate in arb_state()) {
        let next = transition_state(current, candidate);
        prop_assert!(next == current || next == candidate);
    }
}
