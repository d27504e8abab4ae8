//! Transport-independent command execution.

use crate::proto::responses;
use crate::proto::Command;
use crate::store::{BidOutcome, RejectReason, SharedStore, StoreError};

/// Run a parsed command against the store and render the outcome string.
///
/// Business outcomes (losing bid, unknown item) come back as `Ok` strings;
/// only argument and storage failures surface as `Err`.
pub async fn execute(store: &SharedStore, command: &Command) -> Result<String, StoreError> {
    match command {
        Command::RegisterItem {
            name,
            description,
            initial_price,
        } => {
            let id = store.add_item(name, description, *initial_price).await?;
            Ok(responses::item_registered(id))
        }
        Command::PlaceBid {
            item_id,
            bidder,
            value,
        } => {
            let outcome = store.place_bid(*item_id, bidder, *value).await?;
            Ok(match outcome {
                BidOutcome::Accepted => responses::BID_ACCEPTED.to_string(),
                BidOutcome::Rejected(RejectReason::TooLow) => responses::BID_TOO_LOW.to_string(),
                BidOutcome::Rejected(RejectReason::NotFound) => {
                    responses::ITEM_NOT_FOUND.to_string()
                }
            })
        }
    }
}

/// Plaintext line for a store failure, shared by the line transports.
pub fn failure_line(err: &StoreError) -> &'static str {
    match err {
        StoreError::InvalidArgument(_) => responses::INVALID_COMMAND,
        StoreError::Storage(_) => responses::INTERNAL_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::InMemoryStore;

    #[tokio::test]
    async fn renders_outcomes_as_client_strings() {
        let store: SharedStore = Arc::new(InMemoryStore::new());

        let reply = execute(
            &store,
            &Command::parse("cadastrarItem;Painting;Oil on canvas;100.0").unwrap(),
        )
        .await
        .unwrap();
        assert_eq!(reply, "Item cadastrado com ID: 1");

        let reply = execute(&store, &Command::parse("registrarLance;1;alice;150.0").unwrap())
            .await
            .unwrap();
        assert_eq!(reply, responses::BID_ACCEPTED);

        let reply = execute(&store, &Command::parse("registrarLance;1;bob;120.0").unwrap())
            .await
            .unwrap();
        assert_eq!(reply, responses::BID_TOO_LOW);

        let reply = execute(&store, &Command::parse("registrarLance;99;bob;500.0").unwrap())
            .await
            .unwrap();
        assert_eq!(reply, responses::ITEM_NOT_FOUND);
    }
}
