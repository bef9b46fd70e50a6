// SPDX-License-Identifier: MIT

//! Metrics store: one row per completed (or still-running) session, recording
//! `startedAt`, `durationMs` and `capability` (metrics.db in spec.md §4.1).
//! Populated by the daemon's periodic metrics-flush task, not by the
//! session store directly, so a session's lifecycle bookkeeping and its
//! historical metrics record can evolve independently.

use crate::error::StoreError;
use crate::store::{MaterializedState, Store};
use chrono::{DateTime, Utc};
use ov_core::Capability;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMetrics {
    pub agent_name: String,
    pub capability: Capability,
    pub started_at: DateTime<Utc>,
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MetricsOp {
    Record(AgentMetrics),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsState {
    by_name: HashMap<String, AgentMetrics>,
}

impl MaterializedState for MetricsState {
    type Op = MetricsOp;

    fn apply(&mut self, op: &Self::Op) {
        match op {
            MetricsOp::Record(metrics) => {
                self.by_name.insert(metrics.agent_name.clone(), metrics.clone());
            }
        }
    }
}

pub struct MetricsStore {
    inner: Store<MetricsState>,
}

impl MetricsStore {
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        Ok(Self { inner: Store::open(dir, "metrics")? })
    }

    /// Record (or overwrite) the metrics row for one agent. Called both when
    /// a session starts (`duration_ms: None`) and again on completion.
    pub fn record(&self, metrics: AgentMetrics) -> Result<(), StoreError> {
        self.inner.append(MetricsOp::Record(metrics))?;
        Ok(())
    }

    pub fn get(&self, agent_name: &str) -> Option<AgentMetrics> {
        self.inner.read(|s| s.by_name.get(agent_name).cloned())
    }

    pub fn all(&self) -> Vec<AgentMetrics> {
        self.inner.read(|s| s.by_name.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn record_then_get_round_trips() {
        let dir = tempdir().unwrap();
        let store = MetricsStore::open(dir.path()).unwrap();
        store
            .record(AgentMetrics { agent_name: "alice".to_string(), capability: Capability::Builder, started_at: Utc::now(), duration_ms: None })
            .unwrap();
        assert!(store.get("alice").unwrap().duration_ms.is_none());
    }

    #[test]
    fn second_record_overwrites_duration() {
        let dir = tempdir().unwrap();
        let store = MetricsStore::open(dir.path()).unwrap();
        let started_at = Utc::now();
        store
            .record(AgentMetrics { agent_name: "alice".to_string(), capability: Capability::Builder, started_at, duration_ms: None })
            .unwrap();
        store
            .record(AgentMetrics { agent_name: "alice".to_string(), capability: Capability::Builder, started_at, duration_ms: Some(4200) })
            .unwrap();
        assert_eq!(store.get("alice").unwrap().duration_ms, Some(4200));
    }
}
