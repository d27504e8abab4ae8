//! In-memory item store.
//!
//! Useful for unit and integration tests: the whole store serializes on one
//! async mutex, which trivially gives the same per-item atomicity the
//! Postgres row lock provides.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::store::{
    check_bid, check_new_item, BidOutcome, Item, ItemStore, RejectReason, StoreError,
};

#[derive(Debug, Default)]
struct Inner {
    items: HashMap<i64, Item>,
    bids: Vec<BidRecord>,
    next_item_id: i64,
}

#[derive(Debug, Clone)]
struct BidRecord {
    item_id: i64,
    bidder: String,
    value: f64,
}

/// Lock-per-store in-memory implementation of [`ItemStore`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted bid records for an item. Test observability.
    pub async fn bid_count(&self, item_id: i64) -> usize {
        let inner = self.inner.lock().await;
        inner.bids.iter().filter(|b| b.item_id == item_id).count()
    }

    /// Accepted `(bidder, value)` pairs for an item, in commit order.
    /// Test observability.
    pub async fn accepted_bids(&self, item_id: i64) -> Vec<(String, f64)> {
        let inner = self.inner.lock().await;
        inner
            .bids
            .iter()
            .filter(|b| b.item_id == item_id)
            .map(|b| (b.bidder.clone(), b.value))
            .collect()
    }
}

#[async_trait]
impl ItemStore for InMemoryStore {
    async fn add_item(
        &self,
        name: &str,
        description: &str,
        initial_price: f64,
    ) -> Result<i64, StoreError> {
        check_new_item(name, initial_price)?;

        let mut inner = self.inner.lock().await;
        inner.next_item_id += 1;
        let id = inner.next_item_id;
        inner.items.insert(
            id,
            Item {
                id,
                name: name.to_string(),
                description: description.to_string(),
                initial_price,
                highest_bid: 0.0,
                highest_bidder: String::new(),
            },
        );
        Ok(id)
    }

    async fn place_bid(
        &self,
        item_id: i64,
        bidder: &str,
        value: f64,
    ) -> Result<BidOutcome, StoreError> {
        check_bid(value)?;

        let mut inner = self.inner.lock().await;
        let Some(item) = inner.items.get_mut(&item_id) else {
            return Ok(BidOutcome::Rejected(RejectReason::NotFound));
        };
        if value <= item.highest_bid {
            return Ok(BidOutcome::Rejected(RejectReason::TooLow));
        }
        item.highest_bid = value;
        item.highest_bidder = bidder.to_string();
        inner.bids.push(BidRecord {
            item_id,
            bidder: bidder.to_string(),
            value,
        });
        Ok(BidOutcome::Accepted)
    }

    async fn get_item(&self, item_id: i64) -> Result<Option<Item>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.items.get(&item_id).cloned())
    }
}
