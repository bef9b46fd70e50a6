// SPDX-License-Identifier: MIT

//! Mail store: the append-only `Message` log (mail.db in spec.md §4.1),
//! with per-recipient ordering for [`MailStore::inbox`] per spec.md §4.9.

use crate::error::StoreError;
use crate::store::{MaterializedState, Store};
use ov_core::{Message, MessageId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MailOp {
    Send(Message),
    MarkRead { id: MessageId },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MailState {
    by_id: HashMap<MessageId, Message>,
    /// Insertion order, oldest first — the ordering `inbox`/`thread` rely on.
    order: Vec<MessageId>,
}

impl MaterializedState for MailState {
    type Op = MailOp;

    fn apply(&mut self, op: &Self::Op) {
        match op {
            MailOp::Send(message) => {
                self.order.push(message.id);
                self.by_id.insert(message.id, message.clone());
            }
            MailOp::MarkRead { id } => {
                if let Some(message) = self.by_id.get_mut(id) {
                    message.read = true;
                }
            }
        }
    }
}

pub struct MailStore {
    inner: Store<MailState>,
}

impl MailStore {
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        Ok(Self { inner: Store::open(dir, "mail")? })
    }

    pub fn send(&self, message: Message) -> Result<MessageId, StoreError> {
        let id = message.id;
        self.inner.append(MailOp::Send(message))?;
        Ok(id)
    }

    pub fn reply(&self, original: &Message, body: impl Into<String>, now: chrono::DateTime<chrono::Utc>) -> Result<MessageId, StoreError> {
        let thread_id = original.thread_id.clone().unwrap_or_else(|| original.id.to_string());
        let reply = Message::new(original.to.clone(), original.from.clone(), format!("Re: {}", original.subject), body, original.message_type, now)
            .with_thread(thread_id);
        self.send(reply)
    }

    pub fn mark_read(&self, id: MessageId) -> Result<(), StoreError> {
        if self.get(id).is_none() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.inner.append(MailOp::MarkRead { id })?;
        Ok(())
    }

    pub fn get(&self, id: MessageId) -> Option<Message> {
        self.inner.read(|s| s.by_id.get(&id).cloned())
    }

    /// Every message in the store, oldest first.
    pub fn all(&self) -> Vec<Message> {
        self.inner.read(|s| s.order.iter().filter_map(|id| s.by_id.get(id)).cloned().collect())
    }

    /// All messages addressed to `recipient`, oldest first.
    pub fn inbox(&self, recipient: &str) -> Vec<Message> {
        self.inner.read(|s| s.order.iter().filter_map(|id| s.by_id.get(id)).filter(|m| m.to == recipient).cloned().collect())
    }

    /// Unread messages addressed to `recipient`, oldest first.
    pub fn unread(&self, recipient: &str) -> Vec<Message> {
        self.inbox(recipient).into_iter().filter(|m| !m.read).collect()
    }

    pub fn thread(&self, thread_id: &str) -> Vec<Message> {
        self.inner.read(|s| s.order.iter().filter_map(|id| s.by_id.get(id)).filter(|m| m.thread_id.as_deref() == Some(thread_id)).cloned().collect())
    }
}
