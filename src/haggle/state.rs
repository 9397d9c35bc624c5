//! Reducer core over an immutable message snapshot.
//!
//! The marketplace client drove these derivations from framework lifecycle
//! hooks and a global store; here they hang off explicit actions, so the
//! whole flow is testable without a UI runtime or an executor. Async work
//! re-enters through [`Action::ContextLoaded`] carrying the epoch of the
//! selection that requested it; a stale epoch is discarded, which is the
//! entire cancellation story for in-flight context fetches.

use serde::{Deserialize, Serialize};

use crate::haggle::counterparty::{self, Counterparty};
use crate::haggle::listing_context::ListingContext;
use crate::haggle::messages::Message;
use crate::haggle::threads::{Thread, group_threads};

/// Derived inbox state. Threads, counterparty, and context are recomputed
/// from the message snapshot; nothing is mutated in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InboxState {
    /// Current account address, lowercase hex
    pub account: String,

    /// Latest snapshot from the message store, in delivery order
    pub messages: Vec<Message>,

    /// Per-conversation groups, in first-appearance order
    pub threads: Vec<Thread>,

    /// Selected conversation id
    pub selected: Option<String>,

    /// Counterparty of the selected thread
    pub counterparty: Counterparty,

    /// Listing/purchase context of the selected thread
    pub context: ListingContext,

    /// Bumped on every selection change; guards context loads
    pub epoch: u64,
}

#[derive(Debug, Clone)]
pub enum Action {
    /// A fresh snapshot arrived from the message store
    MessagesRefreshed(Vec<Message>),

    /// The user picked a conversation
    ThreadSelected(String),

    /// An async context load finished for the selection at `epoch`
    ContextLoaded { epoch: u64, context: ListingContext },
}

/// Follow-up work the caller must run after a reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadListingContext { key: String, epoch: u64 },
}

impl InboxState {
    pub fn new(account: String) -> Self {
        Self {
            account,
            ..Default::default()
        }
    }

    pub fn selected_thread(&self) -> Option<&Thread> {
        self.selected
            .as_ref()
            .and_then(|key| self.threads.iter().find(|t| &t.key == key))
    }
}

/// Applies one action and returns the effects it demands.
pub fn reduce(state: &mut InboxState, action: Action) -> Vec<Effect> {
    match action {
        Action::MessagesRefreshed(messages) => {
            state.threads = group_threads(&messages);
            state.messages = messages;

            let selection_survives = state
                .selected
                .as_ref()
                .is_some_and(|key| state.threads.iter().any(|t| &t.key == key));

            if selection_survives {
                // re-derive against the new data; the context stays, its
                // listing reference can only change via a new selection
                state.counterparty =
                    counterparty::resolve_selected(state.selected_thread(), &state.account);
                Vec::new()
            } else if let Some(key) = state.threads.first().map(|t| t.key.clone()) {
                // default to the first conversation, as the client did
                select(state, key)
            } else {
                state.selected = None;
                state.counterparty = Counterparty::default();
                state.context = ListingContext::Idle;
                Vec::new()
            }
        }
        Action::ThreadSelected(key) => select(state, key),
        Action::ContextLoaded { epoch, context } => {
            if epoch == state.epoch {
                state.context = context;
            } else {
                tracing::debug!(
                    target: "haggle::state",
                    "Discarding stale context load (epoch {} != current {})",
                    epoch,
                    state.epoch
                );
            }
            Vec::new()
        }
    }
}

fn select(state: &mut InboxState, key: String) -> Vec<Effect> {
    state.selected = Some(key.clone());
    state.epoch += 1;
    state.counterparty = counterparty::resolve_selected(state.selected_thread(), &state.account);
    state.context = ListingContext::Loading;

    vec![Effect::LoadListingContext {
        key,
        epoch: state.epoch,
    }]
}
