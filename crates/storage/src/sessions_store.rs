// SPDX-License-Identifier: MIT

//! Session store: the materialized table of `AgentSession` records
//! (sessions.db in spec.md §4.1), keyed by the globally-unique `agent_name`.

use crate::error::StoreError;
use crate::store::{MaterializedState, Store};
use ov_core::{AgentSession, SessionState};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionOp {
    Insert(AgentSession),
    SetState { agent_name: String, state: SessionState },
    Touch { agent_name: String, last_activity: chrono::DateTime<chrono::Utc> },
    SetPid { agent_name: String, pid: u32 },
    Remove { agent_name: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionsState {
    by_name: HashMap<String, AgentSession>,
}

impl MaterializedState for SessionsState {
    type Op = SessionOp;

    fn apply(&mut self, op: &Self::Op) {
        match op {
            SessionOp::Insert(session) => {
                self.by_name.insert(session.agent_name.clone(), session.clone());
            }
            SessionOp::SetState { agent_name, state } => {
                if let Some(session) = self.by_name.get_mut(agent_name) {
                    session.state = *state;
                }
            }
            SessionOp::Touch { agent_name, last_activity } => {
                if let Some(session) = self.by_name.get_mut(agent_name) {
                    session.last_activity = *last_activity;
                }
            }
            SessionOp::SetPid { agent_name, pid } => {
                if let Some(session) = self.by_name.get_mut(agent_name) {
                    session.pid = Some(*pid);
                }
            }
            SessionOp::Remove { agent_name } => {
                self.by_name.remove(agent_name);
            }
        }
    }
}

/// The session store. Uniqueness on `agent_name` is enforced here, before
/// the op ever reaches the WAL, so a duplicate insert never gets journaled.
pub struct SessionStore {
    inner: Store<SessionsState>,
}

impl SessionStore {
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        Ok(Self { inner: Store::open(dir, "sessions")? })
    }

    pub fn register(&self, session: AgentSession) -> Result<(), StoreError> {
        if self.get(&session.agent_name).is_some() {
            return Err(StoreError::Duplicate(session.agent_name));
        }
        self.inner.append(SessionOp::Insert(session))?;
        Ok(())
    }

    pub fn set_state(&self, agent_name: &str, state: SessionState) -> Result<(), StoreError> {
        self.require(agent_name)?;
        self.inner.append(SessionOp::SetState { agent_name: agent_name.to_string(), state })?;
        Ok(())
    }

    pub fn touch(&self, agent_name: &str, last_activity: chrono::DateTime<chrono::Utc>) -> Result<(), StoreError> {
        self.require(agent_name)?;
        self.inner.append(SessionOp::Touch { agent_name: agent_name.to_string(), last_activity })?;
        Ok(())
    }

    pub fn set_pid(&self, agent_name: &str, pid: u32) -> Result<(), StoreError> {
        self.require(agent_name)?;
        self.inner.append(SessionOp::SetPid { agent_name: agent_name.to_string(), pid })?;
        Ok(())
    }

    pub fn remove(&self, agent_name: &str) -> Result<(), StoreError> {
        self.require(agent_name)?;
        self.inner.append(SessionOp::Remove { agent_name: agent_name.to_string() })?;
        Ok(())
    }

    pub fn get(&self, agent_name: &str) -> Option<AgentSession> {
        self.inner.read(|s| s.by_name.get(agent_name).cloned())
    }

    pub fn get_all(&self) -> Vec<AgentSession> {
        self.inner.read(|s| s.by_name.values().cloned().collect())
    }

    pub fn children_of(&self, parent_agent: &str) -> Vec<AgentSession> {
        self.inner.read(|s| s.by_name.values().filter(|a| a.parent_agent.as_deref() == Some(parent_agent)).cloned().collect())
    }

    fn require(&self, agent_name: &str) -> Result<(), StoreError> {
        if self.get(agent_name).is_none() {
            return Err(StoreError::NotFound(agent_name.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ov_core::Capability;
    use tempfile::tempdir;

    fn sample(name: &str) -> AgentSession {
        AgentSession::new(name, "task-1", Capability::Scout, "/tmp/wt", "pane-1", 0, None, "headless", chrono::Utc::now())
    }

    #[test]
    fn register_then_get_round_trips() {
        let dir = tempdir().unwrap();
        let store = SessionStore::open(dir.path()).unwrap();
        store.register(sample("alice")).unwrap();
        assert_eq!(store.get("alice").unwrap().agent_name, "alice");
    }

    #[test]
    fn duplicate_agent_name_is_rejected() {
        let dir = tempdir().unwrap();
        let store = SessionStore::open(dir.path()).unwrap();
        store.register(sample("alice")).unwrap();
        let err = store.register(sample("alice")).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[test]
    fn set_state_on_unknown_agent_is_not_found() {
        let dir = tempdir().unwrap();
        let store = SessionStore::open(dir.path()).unwrap();
        let err = store.set_state("ghost", SessionState::Working).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn reopen_preserves_state_transitions() {
        let dir = tempdir().unwrap();
        {
            let store = SessionStore::open(dir.path()).unwrap();
            store.register(sample("alice")).unwrap();
            store.set_state("alice", SessionState::Working).unwrap();
        }
        let store = SessionStore::open(dir.path()).unwrap();
        assert_eq!(store.get("alice").unwrap().state, SessionState::Working);
    }
}
