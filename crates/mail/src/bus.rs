// SPDX-License-Identifier: MIT

//! `MailBus`: the mail operations named in spec.md §4.9, wrapping
//! `ov_storage::MailStore`. Priority is informational only — it never
//! reorders delivery, it only travels along for presentation layers to read
//! (spec.md §4.9).

use crate::filter::MessageFilter;
use chrono::{DateTime, Utc};
use ov_core::{Message, MessageId, MessageType, Priority, StoreError};
use ov_storage::MailStore;
use std::sync::Arc;

pub struct MailBus {
    store: Arc<MailStore>,
}

impl MailBus {
    pub fn new(store: Arc<MailStore>) -> Self {
        Self { store }
    }

    /// Send a new message. Messages within a single `(to, thread_id)` are
    /// delivered in `created_at` order because `MailStore` preserves
    /// insertion order; across threads no global ordering is promised.
    #[allow(clippy::too_many_arguments)]
    pub fn send(
        &self,
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        message_type: MessageType,
        priority: Priority,
        thread_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<MessageId, StoreError> {
        let mut message = Message::new(from, to, subject, body, message_type, now).with_priority(priority);
        if let Some(thread_id) = thread_id {
            message = message.with_thread(thread_id);
        }
        let id = message.id;
        tracing::debug!(message_id = %id, to = %message.to, message_type = ?message.message_type, "mail: sending");
        self.store.send(message)?;
        Ok(id)
    }

    /// Reply to `parent_id`, sharing its thread id (spec.md §4.9).
    pub fn reply(&self, parent_id: MessageId, body: impl Into<String>, now: DateTime<Utc>) -> Result<MessageId, StoreError> {
        let parent = self.store.get(parent_id).ok_or_else(|| StoreError::Corrupt { path: "mail".to_string(), reason: format!("no such message {parent_id}") })?;
        self.store.reply(&parent, body, now)
    }

    /// A failed mark-read is safe to retry (spec.md §4.9): re-calling this
    /// on an already-read message is a no-op, not an error.
    pub fn mark_read(&self, id: MessageId) -> Result<(), StoreError> {
        self.store.mark_read(id)
    }

    pub fn get(&self, id: MessageId) -> Option<Message> {
        self.store.get(id)
    }

    /// Combined query across `to`/`from`/`unread`/`thread_id`/`limit`.
    pub fn get_all(&self, filter: &MessageFilter) -> Vec<Message> {
        // Every MailStore accessor is already ordered oldest-first; start
        // from the broadest view the filter names and narrow from there.
        let base = match (&filter.to, &filter.thread_id) {
            (Some(to), _) => self.store.inbox(to),
            (None, Some(thread_id)) => self.store.thread(thread_id),
            (None, None) => self.store.all(),
        };
        filter.apply(base)
    }

    /// Unread mail addressed to `agent`, marking it read as a side effect.
    /// Used by the runtime's pre-prompt hook to inject coordination
    /// messages into the agent's next turn (spec.md §4.9, §6's `mail check`).
    pub fn check(&self, agent: &str) -> Result<Vec<Message>, StoreError> {
        let unread = self.store.unread(agent);
        for message in &unread {
            self.store.mark_read(message.id)?;
        }
        Ok(unread)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ov_storage::MailStore;
    use tempfile::tempdir;

    fn bus() -> (tempfile::TempDir, MailBus) {
        let dir = tempdir().unwrap();
        let store = Arc::new(MailStore::open(dir.path()).unwrap());
        (dir, MailBus::new(store))
    }

    #[test]
    fn send_then_get_all_unread_round_trips() {
        let (_dir, bus) = bus();
        let id = bus.send("alice", "bob", "hi", "body", MessageType::Status, Priority::Normal, None, Utc::now()).unwrap();
        let inbox = bus.get_all(&MessageFilter::default().to("bob").unread_only());
        assert!(inbox.iter().any(|m| m.id == id));
        bus.mark_read(id).unwrap();
        let inbox = bus.get_all(&MessageFilter::default().to("bob").unread_only());
        assert!(inbox.is_empty());
    }

    #[test]
    fn check_marks_returned_messages_read() {
        let (_dir, bus) = bus();
        bus.send("alice", "bob", "s", "b", MessageType::Status, Priority::Normal, None, Utc::now()).unwrap();
        let unread = bus.check("bob").unwrap();
        assert_eq!(unread.len(), 1);
        assert!(bus.check("bob").unwrap().is_empty());
    }

    #[test]
    fn reply_shares_thread_with_parent() {
        let (_dir, bus) = bus();
        let parent = bus.send("alice", "bob", "q", "?", MessageType::Question, Priority::High, None, Utc::now()).unwrap();
        let reply_id = bus.reply(parent, "a!", Utc::now()).unwrap();
        let reply = bus.get(reply_id).unwrap();
        let parent_msg = bus.get(parent).unwrap();
        assert_eq!(reply.thread_id, Some(parent_msg.id.to_string()));
    }

    #[test]
    fn priority_does_not_affect_delivery_order() {
        let (_dir, bus) = bus();
        bus.send("alice", "bob", "low one", "b", MessageType::Status, Priority::Low, None, Utc::now()).unwrap();
        bus.send("alice", "bob", "urgent one", "b", MessageType::Status, Priority::Urgent, None, Utc::now()).unwrap();
        let inbox = bus.get_all(&MessageFilter::default().to("bob"));
        assert_eq!(inbox[0].subject, "low one");
        assert_eq!(inbox[1].subject, "urgent one");
    }

    #[test]
    fn limit_keeps_most_recent_matches() {
        let (_dir, bus) = bus();
        for i in 0..5 {
            bus.send("alice", "bob", format!("msg {i}"), "b", MessageType::Status, Priority::Normal, None, Utc::now()).unwrap();
        }
        let inbox = bus.get_all(&MessageFilter::default().to("bob").limit(2));
        assert_eq!(inbox.len(), 2);
        assert_eq!(inbox[0].subject, "msg 3");
        assert_eq!(inbox[1].subject, "msg 4");
    }
}
