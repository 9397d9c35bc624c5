//! Contracts for the external marketplace collaborators.
//!
//! The core never talks to the chain or IPFS directly; it consumes these
//! traits and reacts to whatever they resolve to.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A marketplace listing as resolved from the chain/IPFS facade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub address: String,
    pub seller_address: String,
    pub name: String,
    #[serde(default)]
    pub pictures: Vec<String>,
}

/// A purchase record tied to a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub address: String,
    pub buyer_address: String,
    pub created: DateTime<Utc>,
    /// Contract stage, e.g. "in_escrow"
    #[serde(default)]
    pub stage: Option<String>,
}

/// Which side of a purchase the current account is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Perspective {
    Buyer,
    Seller,
}

impl Purchase {
    pub fn perspective(&self, account: &str) -> Perspective {
        if self.buyer_address.eq_ignore_ascii_case(account) {
            Perspective::Buyer
        } else {
            Perspective::Seller
        }
    }
}

/// Listing lookups against the marketplace contracts.
#[async_trait]
pub trait ListingService: Send + Sync {
    /// Resolves a listing by contract address or index id.
    ///
    /// Fails with [`crate::HaggleError::ListingNotFound`] when absent.
    async fn listing_by_address_or_id(&self, id: &str) -> Result<Listing>;
}

/// Purchase enumeration and lookups for a listing.
#[async_trait]
pub trait PurchaseService: Send + Sync {
    /// Number of purchases recorded against a listing contract.
    async fn purchase_count(&self, listing_address: &str) -> Result<usize>;

    /// Address of the purchase contract at `index`.
    async fn purchase_address_at(&self, listing_address: &str, index: usize) -> Result<String>;

    /// Resolves one purchase record.
    ///
    /// Fails with [`crate::HaggleError::PurchaseNotFound`] when absent.
    async fn purchase(&self, address: &str) -> Result<Purchase>;
}

/// Active account identity, e.g. the connected wallet.
pub trait IdentityProvider: Send + Sync {
    fn account_address(&self) -> String;
}

#[cfg(test)]
pub(crate) mod mocks {
    use std::collections::HashMap;

    use super::*;
    use crate::error::HaggleError;

    pub(crate) struct FixedIdentity(pub String);

    impl IdentityProvider for FixedIdentity {
        fn account_address(&self) -> String {
            self.0.clone()
        }
    }

    #[derive(Default)]
    pub(crate) struct MockListingService {
        pub listings: HashMap<String, Listing>,
        pub fail: bool,
    }

    #[async_trait]
    impl ListingService for MockListingService {
        async fn listing_by_address_or_id(&self, id: &str) -> Result<Listing> {
            if self.fail {
                return Err(HaggleError::Service("listing backend unavailable".into()));
            }
            self.listings
                .get(id)
                .cloned()
                .ok_or_else(|| HaggleError::ListingNotFound(id.to_string()))
        }
    }

    /// Purchases keyed by listing address, indexed in insertion order like
    /// the on-chain enumeration.
    #[derive(Default)]
    pub(crate) struct MockPurchaseService {
        pub by_listing: HashMap<String, Vec<Purchase>>,
        pub fail: bool,
    }

    #[async_trait]
    impl PurchaseService for MockPurchaseService {
        async fn purchase_count(&self, listing_address: &str) -> Result<usize> {
            if self.fail {
                return Err(HaggleError::Service("purchase backend unavailable".into()));
            }
            Ok(self
                .by_listing
                .get(listing_address)
                .map(|p| p.len())
                .unwrap_or(0))
        }

        async fn purchase_address_at(&self, listing_address: &str, index: usize) -> Result<String> {
            self.by_listing
                .get(listing_address)
                .and_then(|p| p.get(index))
                .map(|p| p.address.clone())
                .ok_or_else(|| {
                    HaggleError::PurchaseNotFound(format!("{listing_address}[{index}]"))
                })
        }

        async fn purchase(&self, address: &str) -> Result<Purchase> {
            self.by_listing
                .values()
                .flatten()
                .find(|p| p.address == address)
                .cloned()
                .ok_or_else(|| HaggleError::PurchaseNotFound(address.to_string()))
        }
    }

}
