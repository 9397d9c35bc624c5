use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::RwLock;

pub mod counterparty;
pub mod listing_context;
pub mod messages;
pub mod services;
pub mod state;
pub mod thread_list;
pub mod threads;
pub(crate) mod utils;

use crate::error::{HaggleError, Result};
use crate::init_tracing;
use counterparty::Counterparty;
use listing_context::ListingContext;
use messages::{RawMessage, normalize_messages};
use services::{IdentityProvider, ListingService, PurchaseService};
use state::{Action, Effect, InboxState, reduce};
use thread_list::ThreadListItem;
use threads::Thread;

#[derive(Clone, Debug)]
pub struct HaggleConfig {
    /// Directory for application data
    pub data_dir: PathBuf,

    /// Directory for application logs
    pub logs_dir: PathBuf,
}

impl HaggleConfig {
    pub fn new(data_dir: &Path, logs_dir: &Path) -> Self {
        let env_suffix = if cfg!(debug_assertions) {
            "dev"
        } else {
            "release"
        };
        let formatted_data_dir = data_dir.join(env_suffix);
        let formatted_logs_dir = logs_dir.join(env_suffix);

        Self {
            data_dir: formatted_data_dir,
            logs_dir: formatted_logs_dir,
        }
    }
}

/// Messaging core facade.
///
/// Owns the derived inbox state and drives listing/purchase context loads
/// against the marketplace services. All views it exposes are plain
/// immutable data, recomputed from the latest message snapshot.
pub struct Haggle {
    pub config: HaggleConfig,
    identity: Arc<dyn IdentityProvider>,
    listings: Arc<dyn ListingService>,
    purchases: Arc<dyn PurchaseService>,
    state: RwLock<InboxState>,
}

impl std::fmt::Debug for Haggle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Haggle")
            .field("config", &self.config)
            .field("identity", &"<REDACTED>")
            .field("listings", &"<REDACTED>")
            .field("purchases", &"<REDACTED>")
            .finish()
    }
}

impl Haggle {
    /// Initializes the messaging core with the provided configuration and
    /// collaborator services.
    ///
    /// This method sets up the data and log directories, configures logging,
    /// and validates the active account address reported by the identity
    /// provider.
    ///
    /// # Arguments
    ///
    /// * `config` - A [`HaggleConfig`] struct specifying the data and log directories.
    /// * `identity` - Provider of the active account address.
    /// * `listings` - Listing lookups against the marketplace contracts.
    /// * `purchases` - Purchase enumeration and lookups.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The data or log directories cannot be created.
    /// - The identity provider reports a malformed account address.
    pub async fn initialize(
        config: HaggleConfig,
        identity: Arc<dyn IdentityProvider>,
        listings: Arc<dyn ListingService>,
        purchases: Arc<dyn PurchaseService>,
    ) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir)
            .with_context(|| format!("Failed to create data directory: {:?}", config.data_dir))
            .map_err(HaggleError::from)?;
        std::fs::create_dir_all(&config.logs_dir)
            .with_context(|| format!("Failed to create logs directory: {:?}", config.logs_dir))
            .map_err(HaggleError::from)?;

        init_tracing(&config.logs_dir);

        tracing::debug!("Logging initialized in directory: {:?}", config.logs_dir);

        let account = Self::normalized_account(identity.as_ref())?;

        Ok(Self {
            config,
            identity,
            listings,
            purchases,
            state: RwLock::new(InboxState::new(account)),
        })
    }

    /// Replaces the message snapshot with a fresh one from the message store.
    ///
    /// Records are validated and normalized once at this boundary; malformed
    /// ones are dropped with a logged diagnostic. Threads and list summaries
    /// are recomputed, and if the snapshot introduced the first conversation
    /// (or removed the selected one) a new selection is made and its context
    /// load runs before this method returns.
    pub async fn refresh_messages(&self, raw: Vec<RawMessage>) -> Result<()> {
        let account = Self::normalized_account(self.identity.as_ref())?;
        let normalized = normalize_messages(raw);

        let effects = {
            let mut state = self.state.write().await;
            state.account = account;
            reduce(&mut state, Action::MessagesRefreshed(normalized))
        };
        self.run_effects(effects).await;

        Ok(())
    }

    /// Selects a conversation and loads its listing/purchase context.
    ///
    /// Selecting a key with no matching thread is not an error; the
    /// counterparty resolves to the empty value and the context to
    /// [`ListingContext::Empty`].
    pub async fn select_thread(&self, key: &str) -> Result<()> {
        let effects = {
            let mut state = self.state.write().await;
            reduce(&mut state, Action::ThreadSelected(key.to_string()))
        };
        self.run_effects(effects).await;

        Ok(())
    }

    /// Conversation summaries in first-appearance order.
    pub async fn thread_list(&self) -> Vec<ThreadListItem> {
        let state = self.state.read().await;
        thread_list::build_thread_list(&state.threads, &state.account)
    }

    /// All threads derived from the current snapshot.
    pub async fn threads(&self) -> Vec<Thread> {
        self.state.read().await.threads.clone()
    }

    /// The selected thread, if its key still matches one.
    pub async fn selected_thread(&self) -> Option<Thread> {
        self.state.read().await.selected_thread().cloned()
    }

    /// Counterparty of the selected thread.
    pub async fn counterparty(&self) -> Counterparty {
        self.state.read().await.counterparty.clone()
    }

    /// Listing/purchase context of the selected thread.
    pub async fn listing_context(&self) -> ListingContext {
        self.state.read().await.context.clone()
    }

    /// Conversations with unread messages from other participants.
    pub async fn unread_threads(&self) -> Vec<Thread> {
        let state = self.state.read().await;
        thread_list::unread_threads(&state.messages, &state.account)
    }

    async fn run_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LoadListingContext { key, epoch } => {
                    self.load_listing_context(key, epoch).await;
                }
            }
        }
    }

    /// Runs one context load and commits the result only if the selection
    /// that requested it is still current.
    async fn load_listing_context(&self, key: String, epoch: u64) {
        let (thread, counterparty, account) = {
            let state = self.state.read().await;
            (
                state.threads.iter().find(|t| t.key == key).cloned(),
                state.counterparty.clone(),
                state.account.clone(),
            )
        };

        let context = match thread {
            Some(thread) => {
                listing_context::load_context(
                    self.listings.as_ref(),
                    self.purchases.as_ref(),
                    &thread,
                    &counterparty,
                    &account,
                )
                .await
            }
            None => ListingContext::Empty,
        };

        let mut state = self.state.write().await;
        reduce(&mut state, Action::ContextLoaded { epoch, context });
    }

    fn normalized_account(identity: &dyn IdentityProvider) -> Result<String> {
        let raw = identity.account_address();
        utils::normalize_address(&raw)
            .ok_or_else(|| HaggleError::Configuration(format!("invalid account address: {raw:?}")))
    }
}
