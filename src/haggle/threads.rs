//! Thread grouping and per-thread projections.
//!
//! The message store hands us one flat, ordered snapshot; everything the
//! inbox shows is derived from it on demand. Nothing here is cached or
//! mutated in place.

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::haggle::messages::Message;

/// One group produced by [`group_by_key`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grouped<K, T> {
    pub key: K,
    pub values: Vec<T>,
}

/// Partitions `items` into groups, preserving the order in which each
/// distinct key first appears. Within a group, items keep their relative
/// input order; sorting is the caller's business.
///
/// Pure and total: absent key values (`None`, empty strings) group like any
/// other value. The index map keeps this a single O(n) pass without changing
/// the first-occurrence output order.
pub fn group_by_key<K, T, F>(items: impl IntoIterator<Item = T>, key_fn: F) -> Vec<Grouped<K, T>>
where
    K: Clone + Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut groups: Vec<Grouped<K, T>> = Vec::new();
    let mut index: HashMap<K, usize> = HashMap::new();

    for item in items {
        let key = key_fn(&item);
        match index.get(&key) {
            Some(&at) => groups[at].values.push(item),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Grouped {
                    key,
                    values: vec![item],
                });
            }
        }
    }

    groups
}

/// A conversation: all messages sharing one conversation id, in the order
/// the snapshot delivered them.
pub type Thread = Grouped<String, Message>;

/// Groups a message snapshot into threads, one per conversation id, in
/// first-appearance order.
pub fn group_threads(messages: &[Message]) -> Vec<Thread> {
    group_by_key(messages.iter().cloned(), |m| m.conversation_id.clone())
}

impl Thread {
    /// The message with the greatest `created_at`; ties go to the later
    /// message in input order, matching a stable ascending sort followed by
    /// taking the last element.
    pub fn latest_message(&self) -> Option<&Message> {
        self.values
            .iter()
            .reduce(|best, m| if m.created_at >= best.created_at { m } else { best })
    }

    /// Count of messages the current account has not read.
    pub fn unread_count(&self) -> usize {
        self.values.iter().filter(|m| m.read_at.is_none()).count()
    }

    /// The listing referenced by the most recent listing-carrying message,
    /// if the conversation ever mentioned one. Same tie-break as
    /// [`Thread::latest_message`].
    pub fn latest_listing_ref(&self) -> Option<&str> {
        self.values
            .iter()
            .filter(|m| m.listing_id.is_some())
            .reduce(|best, m| if m.created_at >= best.created_at { m } else { best })
            .and_then(|m| m.listing_id.as_deref())
    }
}
