// SPDX-License-Identifier: MIT

//! Pure functions: the allowed state-transition graph and the health
//! evaluator that proposes transitions from observed signals (spec.md
//! §4.7). Neither function performs I/O; the watchdog (or any other
//! caller) is responsible for reading inputs and writing the result back.

use chrono::{DateTime, Utc};
use ov_core::{AgentSession, SessionState};

/// What the watchdog should do after a health evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    /// Send a best-effort nudge via mail.
    Escalate,
    /// Kill the pane and mark the session terminated.
    Terminate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthCheck {
    pub state: SessionState,
    pub action: Action,
}

/// Evaluate one session's health (spec.md §4.7, priority-ordered rules).
///
/// `pane_alive` — whether the session's terminal pane is still live.
/// `stale_ms`/`zombie_ms` — thresholds with `stale_ms < zombie_ms`.
pub fn evaluate_health(session: &AgentSession, pane_alive: bool, stale_ms: i64, zombie_ms: i64, now: DateTime<Utc>) -> HealthCheck {
    if !pane_alive {
        return HealthCheck { state: SessionState::Zombie, action: Action::Terminate };
    }

    let elapsed_ms = (now - session.last_activity).num_milliseconds();

    if elapsed_ms >= zombie_ms {
        return HealthCheck { state: SessionState::Zombie, action: Action::Terminate };
    }
    if elapsed_ms >= stale_ms {
        return HealthCheck { state: SessionState::Stalled, action: Action::Escalate };
    }
    if session.state == SessionState::Booting {
        return HealthCheck { state: SessionState::Working, action: Action::None };
    }
    HealthCheck { state: session.state, action: Action::None }
}

/// Enforce the allowed-edges graph from spec.md §4.7. Returns the candidate
/// state when `current -> candidate` is an allowed edge (or a no-op),
/// otherwise returns `current` unchanged — an invalid candidate is rejected
/// rather than silently applied.
///
/// ```text
/// booting   -> working | stalled | zombie | completed
/// working   -> stalled | zombie | completed
/// stalled   -> working | zombie | completed
/// zombie    -> completed
/// completed -> (terminal)
/// ```
pub fn transition_state(current: SessionState, candidate: SessionState) -> SessionState {
    use SessionState::*;

    if current == candidate {
        return current;
    }

    let allowed = matches!(
        (current, candidate),
        (Booting, Working) | (Booting, Stalled) | (Booting, Zombie) | (Booting, Completed)
            | (Working, Stalled) | (Working, Zombie) | (Working, Completed)
            | (Stalled, Working) | (Stalled, Zombie) | (Stalled, Completed)
            | (Zombie, Completed)
    );

    if allowed {
        candidate
    } else {
        current
    }
}

#[cfg(test)]
#[path = "state_machine_tests.rs"]
mod tests;
