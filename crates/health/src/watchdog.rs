// SPDX-License-Identifier: MIT

//! The watchdog task (spec.md §4.8): a single periodic loop that
//! re-evaluates every non-completed agent's health and acts. Thresholds are
//! read once at startup and passed by value — no config hot-reload.

use crate::state_machine::{evaluate_health, transition_state, Action};
use ov_core::{Message, MessageType, Priority, SessionState, ORCHESTRATOR};
use ov_mail::MailBus;
use ov_pane::PaneManager;
use ov_storage::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy)]
pub struct WatchdogConfig {
    pub tick_interval: Duration,
    pub stale_ms: i64,
    pub zombie_ms: i64,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self { tick_interval: Duration::from_secs(10), stale_ms: 30_000, zombie_ms: 120_000 }
    }
}

pub struct Watchdog {
    config: WatchdogConfig,
    sessions: Arc<SessionStore>,
    panes: Arc<PaneManager>,
    mail: Arc<MailBus>,
}

impl Watchdog {
    pub fn new(config: WatchdogConfig, sessions: Arc<SessionStore>, panes: Arc<PaneManager>, mail: Arc<MailBus>) -> Self {
        Self { config, sessions, panes, mail }
    }

    /// Run the periodic loop until `cancel` fires. Finishes the current
    /// tick before exiting (spec.md §5: "they finish the current iteration
    /// then exit").
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.config.tick_interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("watchdog: cancellation received, exiting after current tick");
                    return;
                }
                _ = interval.tick() => {
                    self.tick().await;
                }
            }
        }
    }

    /// One evaluation pass over every non-completed session. Errors on one
    /// session never abort the tick (spec.md §4.8).
    pub async fn tick(&self) {
        let now = chrono::Utc::now();
        let sessions: Vec<_> = self.sessions.get_all().into_iter().filter(|s| !s.state.is_terminal()).collect();

        let live_panes = match self.panes.list_sessions().await {
            Ok(names) => names,
            Err(err) => {
                tracing::warn!(error = %err, "watchdog: failed to list live panes, treating all as dead this tick");
                Vec::new()
            }
        };

        for session in sessions {
            let pane_alive = live_panes.iter().any(|p| p == &session.pane_id);
            let check = evaluate_health(&session, pane_alive, self.config.stale_ms, self.config.zombie_ms, now);
            let next_state = transition_state(session.state, check.state);

            if next_state != session.state {
                if let Err(err) = self.sessions.set_state(&session.agent_name, next_state) {
                    tracing::warn!(agent_name = %session.agent_name, error = %err, "watchdog: failed to write state transition");
                    continue;
                }
            }

            match check.action {
                Action::None => {}
                Action::Escalate => self.nudge(&session.agent_name, now).await,
                Action::Terminate => self.terminate(&session.agent_name, &session.pane_id, next_state).await,
            }
        }
    }

    async fn nudge(&self, agent_name: &str, now: chrono::DateTime<chrono::Utc>) {
        let message = Message::new(
            ORCHESTRATOR,
            agent_name,
            "are you still there?",
            "No activity detected recently; please report status or continue your task.",
            MessageType::Status,
            now,
        )
        .with_priority(Priority::High);
        if let Err(err) = self.mail.send(
            message.from,
            message.to,
            message.subject,
            message.body,
            message.message_type,
            message.priority,
            None,
            now,
        ) {
            // Best-effort: a failed nudge never aborts the tick.
            tracing::warn!(agent_name = %agent_name, error = %err, "watchdog: failed to send nudge mail");
        }
    }

    async fn terminate(&self, agent_name: &str, pane_id: &str, resulting_state: SessionState) {
        debug_assert_eq!(resulting_state, SessionState::Zombie);
        if let Err(err) = self.panes.kill_session(pane_id).await {
            tracing::warn!(agent_name = %agent_name, pane_id = %pane_id, error = %err, "watchdog: failed to kill pane for terminated agent");
        }
    }
}
