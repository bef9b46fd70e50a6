// SPDX-License-Identifier: MIT

//! `MessageFilter`: the query shape `MailBus::get_all` accepts (spec.md
//! §4.9: "filters: to, from, unread, threadId, limit").

use ov_core::Message;

#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    pub to: Option<String>,
    pub from: Option<String>,
    pub unread: Option<bool>,
    pub thread_id: Option<String>,
    pub limit: Option<usize>,
}

impl MessageFilter {
    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn unread_only(mut self) -> Self {
        self.unread = Some(true);
        self
    }

    pub fn thread(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Apply this filter to an already-ordered (oldest-first) message slice.
    /// `limit` keeps the *most recent* `limit` matches, per the dashboard
    /// convention of showing the tail of a bounded query.
    pub(crate) fn apply(&self, messages: Vec<Message>) -> Vec<Message> {
        let mut filtered: Vec<Message> = messages
            .into_iter()
            .filter(|m| self.to.as_deref().is_none_or(|to| m.to == to))
            .filter(|m| self.from.as_deref().is_none_or(|from| m.from == from))
            .filter(|m| self.unread.is_none_or(|unread| m.read != unread))
            .filter(|m| self.thread_id.as_deref().is_none_or(|t| m.thread_id.as_deref() == Some(t)))
            .collect();

        if let Some(limit) = self.limit {
            if filtered.len() > limit {
                filtered = filtered.split_off(filtered.len() - limit);
            }
        }
        filtered
    }
}
