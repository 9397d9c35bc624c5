//! Listing/purchase context for the selected conversation.
//!
//! A conversation usually happens in the context of a listing; the most
//! recent listing-carrying message decides which one. Fetches degrade
//! instead of failing: the inbox renders with whatever context resolved.

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::haggle::counterparty::Counterparty;
use crate::haggle::services::{Listing, ListingService, Purchase, PurchaseService};
use crate::haggle::threads::Thread;

/// Fetch lifecycle for the selected thread's marketplace context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ListingContext {
    /// No selection made yet
    #[default]
    Idle,

    /// A fetch for the current selection is in flight
    Loading,

    /// The thread references a listing; `purchase` is present when one
    /// involving the counterparty or the current account was found
    Ready {
        listing: Listing,
        purchase: Option<Purchase>,
    },

    /// The thread's history carries no listing reference
    Empty,
}

/// Loads the listing and most recent related purchase for a thread.
///
/// Failures never escape: a failed listing fetch degrades to
/// [`ListingContext::Empty`], a failed purchase resolution degrades to
/// [`ListingContext::Ready`] without a purchase, both with a logged
/// diagnostic.
pub(crate) async fn load_context(
    listings: &dyn ListingService,
    purchases: &dyn PurchaseService,
    thread: &Thread,
    counterparty: &Counterparty,
    account: &str,
) -> ListingContext {
    let listing_id = match thread.latest_listing_ref() {
        Some(id) => id,
        None => return ListingContext::Empty,
    };

    let listing = match listings.listing_by_address_or_id(listing_id).await {
        Ok(listing) => listing,
        Err(e) => {
            tracing::warn!(
                target: "haggle::listing_context",
                "Failed to load listing {} for thread {}: {}",
                listing_id,
                thread.key,
                e
            );
            return ListingContext::Empty;
        }
    };

    let purchase = match find_purchase(purchases, &listing, counterparty, account).await {
        Ok(purchase) => purchase,
        Err(e) => {
            tracing::warn!(
                target: "haggle::listing_context",
                "Failed to resolve purchase history for listing {}: {}",
                listing.address,
                e
            );
            None
        }
    };

    ListingContext::Ready { listing, purchase }
}

/// Most recent purchase of `listing` whose buyer is the counterparty or the
/// current account. Ties on `created` favor the earlier-fetched record.
async fn find_purchase(
    service: &dyn PurchaseService,
    listing: &Listing,
    counterparty: &Counterparty,
    account: &str,
) -> Result<Option<Purchase>> {
    let count = service.purchase_count(&listing.address).await?;

    let addresses = join_all(
        (0..count).map(|index| service.purchase_address_at(&listing.address, index)),
    )
    .await
    .into_iter()
    .collect::<Result<Vec<_>>>()?;

    let records = join_all(addresses.iter().map(|address| service.purchase(address)))
        .await
        .into_iter()
        .collect::<Result<Vec<_>>>()?;

    // Selection runs over the fully collected set, so completion order
    // cannot change the outcome.
    Ok(records
        .into_iter()
        .filter(|p| {
            p.buyer_address.eq_ignore_ascii_case(&counterparty.address)
                || p.buyer_address.eq_ignore_ascii_case(account)
        })
        .reduce(|best, p| if p.created > best.created { p } else { best }))
}
