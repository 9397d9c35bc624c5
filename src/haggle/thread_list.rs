use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::haggle::counterparty::{self, Counterparty};
use crate::haggle::messages::Message;
use crate::haggle::threads::{Thread, group_threads};

/// Summary of a conversation for the inbox list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadListItem {
    /// Conversation id
    pub key: String,

    /// Other participant, read from the thread's latest message
    pub counterparty: Counterparty,

    /// Content of the latest message
    pub preview: String,

    /// Timestamp of the latest message
    pub last_active: DateTime<Utc>,

    /// Messages the current account has not read
    pub unread_count: usize,
}

/// Builds the inbox list, one item per thread.
///
/// Items stay in thread (first-appearance) order rather than being re-sorted
/// by recency; threads with no messages are skipped.
pub fn build_thread_list(threads: &[Thread], account: &str) -> Vec<ThreadListItem> {
    threads
        .iter()
        .filter_map(|thread| {
            let latest = thread.latest_message()?;
            Some(ThreadListItem {
                key: thread.key.clone(),
                counterparty: counterparty::resolve_latest(thread, account),
                preview: latest.content.clone(),
                last_active: latest.created_at,
                unread_count: thread.unread_count(),
            })
        })
        .collect()
}

/// Conversations holding unread messages from someone other than the current
/// account, for the notification dropdown.
pub fn unread_threads(messages: &[Message], account: &str) -> Vec<Thread> {
    let unread: Vec<Message> = messages
        .iter()
        .filter(|m| m.read_at.is_none() && m.from_address != account)
        .cloned()
        .collect();
    group_threads(&unread)
}
