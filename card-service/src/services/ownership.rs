//! Card visibility.
//!
//! Every lookup is keyed by id *and* owner in a single store call. A card
//! that belongs to someone else is reported exactly like one that does not
//! exist, so callers cannot probe for other holders' ids.

use std::sync::Arc;

use crate::models::{Card, Principal};
use crate::services::{CardStore, ServiceError};

#[derive(Clone)]
pub struct OwnershipGate {
    store: Arc<dyn CardStore>,
}

impl OwnershipGate {
    pub fn new(store: Arc<dyn CardStore>) -> Self {
        Self { store }
    }

    /// The caller's card with this id, or `CardNotFound`.
    pub async fn resolve(&self, principal: &Principal, id: i64) -> Result<Card, ServiceError> {
        self.store
            .find_by_id_and_owner(id, &principal.name)
            .await?
            .ok_or(ServiceError::CardNotFound)
    }

    pub async fn owns(&self, principal: &Principal, id: i64) -> Result<bool, ServiceError> {
        self.store.exists_by_id_and_owner(id, &principal.name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::InMemoryCardStore;
    use rust_decimal::Decimal;

    fn gate() -> OwnershipGate {
        OwnershipGate::new(Arc::new(InMemoryCardStore::with_cards([
            Card {
                id: 99,
                amount: Decimal::new(12345, 2),
                owner: "Owen".to_string(),
            },
            Card {
                id: 102,
                amount: Decimal::new(20000, 2),
                owner: "Kumar".to_string(),
            },
        ])))
    }

    #[tokio::test]
    async fn test_owner_resolves_card() {
        let owen = Principal::new("Owen", ["CARD-OWNER"]);
        let card = gate().resolve(&owen, 99).await.unwrap();
        assert_eq!(card.amount, Decimal::new(12345, 2));
    }

    #[tokio::test]
    async fn test_foreign_and_missing_cards_look_the_same() {
        let gate = gate();
        let owen = Principal::new("Owen", ["CARD-OWNER"]);

        let foreign = gate.resolve(&owen, 102).await.unwrap_err();
        let missing = gate.resolve(&owen, 1000).await.unwrap_err();

        assert!(matches!(foreign, ServiceError::CardNotFound));
        assert!(matches!(missing, ServiceError::CardNotFound));
        assert_eq!(foreign.to_string(), missing.to_string());
    }

    #[tokio::test]
    async fn test_owns() {
        let gate = gate();
        let owen = Principal::new("Owen", ["CARD-OWNER"]);

        assert!(gate.owns(&owen, 99).await.unwrap());
        assert!(!gate.owns(&owen, 102).await.unwrap());
        assert!(!gate.owns(&owen, 1000).await.unwrap());
    }
}
