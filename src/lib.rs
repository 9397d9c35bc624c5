pub use crate::error::{HaggleError, Result};
pub use crate::haggle::counterparty::{Counterparty, resolve_latest, resolve_selected};
pub use crate::haggle::listing_context::ListingContext;
pub use crate::haggle::messages::{Message, RawMessage, normalize_messages};
pub use crate::haggle::services::{
    IdentityProvider, Listing, ListingService, Perspective, Purchase, PurchaseService,
};
pub use crate::haggle::state::{Action, Effect, InboxState, reduce};
pub use crate::haggle::thread_list::{ThreadListItem, build_thread_list, unread_threads};
pub use crate::haggle::threads::{Grouped, Thread, group_by_key, group_threads};
pub use crate::haggle::utils::truncate_address;
pub use crate::haggle::{Haggle, HaggleConfig};

use once_cell::sync::OnceCell;
use std::sync::Mutex;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::EnvFilter, fmt::Layer, prelude::*, registry::Registry};

mod error;
mod haggle;

static TRACING_GUARDS: OnceCell<Mutex<Option<(WorkerGuard, WorkerGuard)>>> = OnceCell::new();
static TRACING_INIT: OnceCell<()> = OnceCell::new();

pub(crate) fn init_tracing(logs_dir: &std::path::Path) {
    TRACING_INIT.get_or_init(|| {
        let file_appender = tracing_appender::rolling::RollingFileAppender::builder()
            .rotation(tracing_appender::rolling::Rotation::DAILY)
            .filename_prefix("haggle")
            .filename_suffix("log")
            .build(logs_dir)
            .expect("Failed to create file appender");

        let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);
        let (non_blocking_stdout, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());

        TRACING_GUARDS
            .set(Mutex::new(Some((file_guard, stdout_guard))))
            .ok();

        let stdout_layer = Layer::new()
            .with_writer(non_blocking_stdout)
            .with_ansi(true)
            .with_target(true);

        let file_layer = Layer::new()
            .with_writer(non_blocking_file)
            .with_ansi(false)
            .with_target(true);

        Registry::default()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .with(stdout_layer)
            .with(file_layer)
            .init();
    });
}
