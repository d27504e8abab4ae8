//! Highest-bid invariants on the store boundary.

use std::sync::Arc;

use auction_gateway::store::{BidOutcome, InMemoryStore, ItemStore, RejectReason};

#[tokio::test]
async fn accepted_bids_form_a_strictly_increasing_sequence() {
    let store = InMemoryStore::new();
    let id = store.add_item("Painting", "Oil on canvas", 100.0).await.unwrap();

    let attempts = [150.0, 120.0, 150.0, 151.0, 10.0, 200.0];
    for value in attempts {
        let _ = store.place_bid(id, "bidder", value).await.unwrap();
    }

    let values: Vec<f64> = store
        .accepted_bids(id)
        .await
        .into_iter()
        .map(|(_, value)| value)
        .collect();
    assert_eq!(values, vec![150.0, 151.0, 200.0]);
    assert!(values.windows(2).all(|w| w[1] > w[0]));

    // highest_bid equals the maximum accepted value.
    let item = store.get_item(id).await.unwrap().unwrap();
    assert_eq!(item.highest_bid, 200.0);
}

#[tokio::test]
async fn item_without_bids_has_zero_highest_bid_and_no_bidder() {
    let store = InMemoryStore::new();
    let id = store.add_item("Vase", "Porcelain", 30.0).await.unwrap();

    let item = store.get_item(id).await.unwrap().unwrap();
    assert_eq!(item.highest_bid, 0.0);
    assert!(item.highest_bidder.is_empty());
    assert_eq!(store.bid_count(id).await, 0);
}

#[tokio::test]
async fn concurrent_equal_bids_accept_exactly_one() {
    let store = Arc::new(InMemoryStore::new());
    let id = store.add_item("Clock", "Wall clock", 10.0).await.unwrap();

    let a = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.place_bid(id, "alice", 200.0).await.unwrap() })
    };
    let b = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.place_bid(id, "bob", 200.0).await.unwrap() })
    };

    let (a, b) = (a.await.unwrap(), b.await.unwrap());
    let accepted = [a, b]
        .iter()
        .filter(|o| **o == BidOutcome::Accepted)
        .count();
    assert_eq!(accepted, 1);

    let item = store.get_item(id).await.unwrap().unwrap();
    assert_eq!(item.highest_bid, 200.0);
    assert_eq!(store.bid_count(id).await, 1);
}

#[tokio::test]
async fn concurrent_bid_storm_preserves_the_monotonic_invariant() {
    let store = Arc::new(InMemoryStore::new());
    let id = store.add_item("Lamp", "Desk lamp", 1.0).await.unwrap();

    let mut tasks = Vec::new();
    for value in 1..=20 {
        let store = Arc::clone(&store);
        tasks.push(tokio::spawn(async move {
            store
                .place_bid(id, &format!("bidder-{value}"), value as f64)
                .await
                .unwrap()
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let bids = store.accepted_bids(id).await;
    assert!(bids.windows(2).all(|w| w[1].1 > w[0].1));
    assert_eq!(bids.last().map(|(bidder, _)| bidder.as_str()), Some("bidder-20"));

    let item = store.get_item(id).await.unwrap().unwrap();
    assert_eq!(item.highest_bid, 20.0);
    assert_eq!(item.highest_bidder, "bidder-20");
}

#[tokio::test]
async fn bid_on_unknown_item_is_rejected_not_an_error() {
    let store = InMemoryStore::new();
    assert_eq!(
        store.place_bid(7, "alice", 50.0).await.unwrap(),
        BidOutcome::Rejected(RejectReason::NotFound)
    );
}
