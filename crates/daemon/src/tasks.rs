// SPDX-License-Identifier: MIT

//! The named long-lived tasks spec.md describes (watchdog, merger) plus a
//! supplemental metrics-flush task, each spawned on its own tokio task with
//! its own store handle and wired to a shared cancellation token for clean
//! shutdown (spec.md §5's shared-resource policy, §4.8's cancellation
//! contract: "finish the current iteration then exit").

use ov_core::{Capability, SessionState};
use ov_health::Watchdog;
use ov_merge::Merger;
use ov_storage::{AgentMetrics, MetricsStore, SessionStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub fn spawn_watchdog(watchdog: Arc<Watchdog>, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move { watchdog.run(cancel).await })
}

pub fn spawn_merger_drain(merger: Arc<Merger>, interval: Duration, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("merger drain loop: cancellation received, exiting after current drain");
                    return;
                }
                _ = ticker.tick() => {
                    merger.drain().await;
                }
            }
        }
    })
}

/// Periodically writes `MetricsStore` rows for sessions that have reached a
/// terminal state but whose metrics row still lacks a `duration_ms` — data
/// the (out-of-scope) cost estimator reads.
pub fn spawn_metrics_flush(sessions: Arc<SessionStore>, metrics: Arc<MetricsStore>, interval: Duration, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("metrics-flush: cancellation received, exiting after current pass");
                    return;
                }
                _ = ticker.tick() => {
                    flush_once(&sessions, &metrics);
                }
            }
        }
    })
}

fn flush_once(sessions: &SessionStore, metrics: &MetricsStore) {
    for session in sessions.get_all() {
        let needs_flush = match metrics.get(&session.agent_name) {
            None => true,
            Some(existing) => existing.duration_ms.is_none() && matches!(session.state, SessionState::Completed | SessionState::Zombie),
        };
        if !needs_flush {
            continue;
        }
        let duration_ms = matches!(session.state, SessionState::Completed | SessionState::Zombie)
            .then(|| (session.last_activity - session.started_at).num_milliseconds().max(0) as u64);
        let record = AgentMetrics {
            agent_name: session.agent_name.clone(),
            capability: clone_capability(&session.capability),
            started_at: session.started_at,
            duration_ms,
        };
        if let Err(err) = metrics.record(record) {
            tracing::warn!(agent_name = %session.agent_name, error = %err, "metrics-flush: failed to record");
        }
    }
}

fn clone_capability(capability: &Capability) -> Capability {
    Capability::parse(capability.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ov_core::AgentSession;
    use tempfile::tempdir;

    #[test]
    fn flush_records_duration_for_completed_session() {
        let dir = tempdir().unwrap();
        let sessions = SessionStore::open(dir.path()).unwrap();
        let metrics = MetricsStore::open(dir.path()).unwrap();
        let started = chrono::Utc::now();
        let mut session = AgentSession::new("alice", "t1", Capability::Builder, "/wt", "pane", 0, None, "headless", started);
        session.last_activity = started + chrono::Duration::seconds(30);
        sessions.register(session).unwrap();
        sessions.set_state("alice", SessionState::Completed).unwrap();

        flush_once(&sessions, &metrics);

        let recorded = metrics.get("alice").unwrap();
        assert_eq!(recorded.duration_ms, Some(30_000));
    }

    #[test]
    fn flush_leaves_running_sessions_without_duration() {
        let dir = tempdir().unwrap();
        let sessions = SessionStore::open(dir.path()).unwrap();
        let metrics = MetricsStore::open(dir.path()).unwrap();
        let session = AgentSession::new("alice", "t1", Capability::Builder, "/wt", "pane", 0, None, "headless", chrono::Utc::now());
        sessions.register(session).unwrap();

        flush_once(&sessions, &metrics);

        assert!(metrics.get("alice").unwrap().duration_ms.is_none());
    }
}
