use serde::{Deserialize, Serialize};

use crate::haggle::messages::Message;
use crate::haggle::threads::Thread;

/// The participant in a conversation who is not the current account.
///
/// An empty counterparty (default) stands in when no thread matches the
/// selection; resolution never fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Counterparty {
    pub address: String,
    pub name: Option<String>,
}

impl Counterparty {
    fn from_message(message: &Message, account: &str) -> Self {
        if message.from_address == account {
            Self {
                address: message.to_address.clone(),
                name: message.to_name.clone(),
            }
        } else {
            Self {
                address: message.from_address.clone(),
                name: message.from_name.clone(),
            }
        }
    }

    /// Profile name when present, address otherwise.
    pub fn display_handle(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.address)
    }
}

/// Resolves the counterparty for the selected thread.
///
/// Roles are read from the thread's first message as received, not its most
/// recent one, while every other projection looks at the latest message.
/// Kept as-is for behavioral compatibility with the existing marketplace
/// client.
pub fn resolve_selected(thread: Option<&Thread>, account: &str) -> Counterparty {
    thread
        .and_then(|t| t.values.first())
        .map(|m| Counterparty::from_message(m, account))
        .unwrap_or_default()
}

/// Counterparty as shown in the conversation list, read from the thread's
/// latest message.
pub fn resolve_latest(thread: &Thread, account: &str) -> Counterparty {
    thread
        .latest_message()
        .map(|m| Counterparty::from_message(m, account))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const ME: &str = "0xaaaa000000000000000000000000000000000001";
    const OTHER: &str = "0xbbbb000000000000000000000000000000000002";
    const THIRD: &str = "0xcccc000000000000000000000000000000000003";

    fn msg(from: &str, from_name: Option<&str>, to: &str, to_name: Option<&str>, at: i64) -> Message {
        Message {
            conversation_id: "A".to_string(),
            from_address: from.to_string(),
            to_address: to.to_string(),
            from_name: from_name.map(str::to_string),
            to_name: to_name.map(str::to_string),
            content: String::new(),
            created_at: Utc.timestamp_opt(at, 0).unwrap(),
            read_at: None,
            listing_id: None,
        }
    }

    fn thread(values: Vec<Message>) -> Thread {
        Thread {
            key: "A".to_string(),
            values,
        }
    }

    #[test]
    fn test_resolve_selected_uses_to_party_when_account_sent_first() {
        let t = thread(vec![msg(ME, Some("Me"), OTHER, Some("Bea"), 1)]);

        let counterparty = resolve_selected(Some(&t), ME);
        assert_eq!(counterparty.address, OTHER);
        assert_eq!(counterparty.name, Some("Bea".to_string()));
    }

    #[test]
    fn test_resolve_selected_uses_from_party_otherwise() {
        let t = thread(vec![msg(OTHER, Some("Bea"), ME, Some("Me"), 1)]);

        let counterparty = resolve_selected(Some(&t), ME);
        assert_eq!(counterparty.address, OTHER);
        assert_eq!(counterparty.name, Some("Bea".to_string()));
    }

    #[test]
    fn test_resolve_selected_depends_only_on_first_message() {
        let base = thread(vec![
            msg(OTHER, Some("Bea"), ME, None, 1),
            msg(ME, None, OTHER, None, 2),
        ]);
        // swap every later message for traffic with a third party
        let altered = thread(vec![
            msg(OTHER, Some("Bea"), ME, None, 1),
            msg(THIRD, Some("Cal"), ME, None, 99),
        ]);

        assert_eq!(resolve_selected(Some(&base), ME), resolve_selected(Some(&altered), ME));
    }

    #[test]
    fn test_resolve_selected_missing_thread_is_empty() {
        let counterparty = resolve_selected(None, ME);
        assert_eq!(counterparty, Counterparty::default());
        assert_eq!(counterparty.address, "");
    }

    #[test]
    fn test_resolve_latest_reads_most_recent_message() {
        let t = thread(vec![
            msg(OTHER, Some("Bea"), ME, None, 1),
            msg(THIRD, Some("Cal"), ME, None, 5),
        ]);

        let counterparty = resolve_latest(&t, ME);
        assert_eq!(counterparty.address, THIRD);
        assert_eq!(counterparty.name, Some("Cal".to_string()));
    }

    #[test]
    fn test_display_handle_falls_back_to_address() {
        let named = Counterparty {
            address: OTHER.to_string(),
            name: Some("Bea".to_string()),
        };
        assert_eq!(named.display_handle(), "Bea");

        let unnamed = Counterparty {
            address: OTHER.to_string(),
            name: Some(String::new()),
        };
        assert_eq!(unnamed.display_handle(), OTHER);
    }
}
