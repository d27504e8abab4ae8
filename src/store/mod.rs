//! Item store: the persistence boundary where the highest-bid invariant is
//! enforced.
//!
//! # Design Decisions
//! - The store is a trait so workers can run against Postgres in production
//!   and an in-memory implementation in tests
//! - A losing bid is a business outcome (`BidOutcome::Rejected`), never an
//!   `Err`; errors are reserved for bad arguments and driver failures
//! - `place_bid` is atomic per item: readers of `highest_bid` serialize on a
//!   row lock, and a bid record is appended only on the winning path

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgItemStore;

use std::sync::Arc;

use async_trait::async_trait;

/// An auctionable item as persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub initial_price: f64,
    pub highest_bid: f64,
    pub highest_bidder: String,
}

/// Outcome of a bid attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidOutcome {
    Accepted,
    Rejected(RejectReason),
}

/// Why a bid was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The referenced item does not exist.
    NotFound,
    /// The bid did not strictly exceed the current highest bid.
    TooLow,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<tokio_postgres::Error> for StoreError {
    fn from(err: tokio_postgres::Error) -> Self {
        StoreError::Storage(err.to_string())
    }
}

impl From<deadpool_postgres::PoolError> for StoreError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        StoreError::Storage(err.to_string())
    }
}

/// The two auction operations plus a read-only item lookup.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Persist a new item and return its assigned id.
    async fn add_item(
        &self,
        name: &str,
        description: &str,
        initial_price: f64,
    ) -> Result<i64, StoreError>;

    /// Attempt a bid. Accepted iff strictly greater than the current maximum.
    async fn place_bid(
        &self,
        item_id: i64,
        bidder: &str,
        value: f64,
    ) -> Result<BidOutcome, StoreError>;

    /// Fetch an item by id.
    async fn get_item(&self, item_id: i64) -> Result<Option<Item>, StoreError>;
}

/// Handle threaded into workers at startup.
pub type SharedStore = Arc<dyn ItemStore>;

pub(crate) fn check_new_item(name: &str, initial_price: f64) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::InvalidArgument("name must not be empty".into()));
    }
    if !initial_price.is_finite() || initial_price < 0.0 {
        return Err(StoreError::InvalidArgument(
            "initial price must be non-negative".into(),
        ));
    }
    Ok(())
}

pub(crate) fn check_bid(value: f64) -> Result<(), StoreError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(StoreError::InvalidArgument(
            "bid value must be positive".into(),
        ));
    }
    Ok(())
}
