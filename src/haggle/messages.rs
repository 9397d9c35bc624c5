use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{HaggleError, Result};
use crate::haggle::utils::normalize_address;

/// A single marketplace message, normalized at the ingestion boundary.
///
/// Immutable once ingested; ordering is by `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Conversation (dialogue) this message belongs to
    pub conversation_id: String,

    /// Sender account address, lowercase hex
    pub from_address: String,

    /// Recipient account address, lowercase hex
    pub to_address: String,

    /// Sender profile name, if one was attached
    pub from_name: Option<String>,

    /// Recipient profile name, if one was attached
    pub to_name: Option<String>,

    /// Message body
    pub content: String,

    /// When the message was created
    pub created_at: DateTime<Utc>,

    /// When the current account read the message; unset while unread
    pub read_at: Option<DateTime<Utc>>,

    /// Listing the message was sent in the context of, if any
    pub listing_id: Option<String>,
}

/// Loose message record as delivered by the external message store.
///
/// Field values are only trusted after [`RawMessage::normalize`]; the store
/// hands us whatever shape the transport produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMessage {
    #[serde(alias = "dialogueId")]
    pub conversation_id: String,
    pub from_address: String,
    pub to_address: String,
    #[serde(default)]
    pub from_name: Option<String>,
    #[serde(default)]
    pub to_name: Option<String>,
    #[serde(default)]
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub listing_id: Option<String>,
}

impl RawMessage {
    /// Validates and normalizes the record into a [`Message`].
    ///
    /// Addresses are shape-checked and lowercased; blank optional fields
    /// collapse to `None`.
    pub fn normalize(self) -> Result<Message> {
        if self.conversation_id.trim().is_empty() {
            return Err(HaggleError::InvalidMessage(
                "missing conversation id".to_string(),
            ));
        }

        let from_address = normalize_address(&self.from_address).ok_or_else(|| {
            HaggleError::InvalidMessage(format!("bad from address: {:?}", self.from_address))
        })?;
        let to_address = normalize_address(&self.to_address).ok_or_else(|| {
            HaggleError::InvalidMessage(format!("bad to address: {:?}", self.to_address))
        })?;

        Ok(Message {
            conversation_id: self.conversation_id.trim().to_string(),
            from_address,
            to_address,
            from_name: none_if_blank(self.from_name),
            to_name: none_if_blank(self.to_name),
            content: self.content,
            created_at: self.created_at,
            read_at: self.read_at,
            listing_id: none_if_blank(self.listing_id),
        })
    }
}

fn none_if_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Normalizes a snapshot from the message store, keeping input order.
///
/// Malformed records are dropped with a logged diagnostic rather than
/// failing the whole snapshot.
pub fn normalize_messages(raw: Vec<RawMessage>) -> Vec<Message> {
    raw.into_iter()
        .filter_map(|record| match record.normalize() {
            Ok(message) => Some(message),
            Err(e) => {
                tracing::warn!(
                    target: "haggle::messages",
                    "Dropping malformed message record: {}",
                    e
                );
                None
            }
        })
        .collect()
}
