//! Card operations for an already authenticated and authorized principal.

use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, instrument};

use crate::models::{Card, CardDraft, Principal};
use crate::services::metrics::{
    record_card_operation, OP_CREATE, OP_DELETE, OP_LIST, OP_READ, OP_UPDATE,
};
use crate::services::{CardStore, OwnershipGate, PaginationEngine, QueryPlan, ServiceError};

const LOCK_STRIPES: usize = 64;

/// Striped per-record locks. Update and delete hold the stripe for their id
/// across the owner check and the write.
struct RecordLocks {
    stripes: Vec<Mutex<()>>,
}

impl RecordLocks {
    fn new(stripes: usize) -> Self {
        Self {
            stripes: (0..stripes).map(|_| Mutex::new(())).collect(),
        }
    }

    async fn lock(&self, id: i64) -> MutexGuard<'_, ()> {
        let slot = id.rem_euclid(self.stripes.len() as i64) as usize;
        self.stripes[slot].lock().await
    }
}

#[derive(Clone)]
pub struct CardService {
    store: Arc<dyn CardStore>,
    gate: OwnershipGate,
    pagination: PaginationEngine,
    locks: Arc<RecordLocks>,
}

impl CardService {
    pub fn new(store: Arc<dyn CardStore>) -> Self {
        Self {
            gate: OwnershipGate::new(store.clone()),
            pagination: PaginationEngine::new(store.clone()),
            locks: Arc::new(RecordLocks::new(LOCK_STRIPES)),
            store,
        }
    }

    pub fn pagination(&self) -> &PaginationEngine {
        &self.pagination
    }

    pub async fn health_check(&self) -> Result<(), ServiceError> {
        self.store.health_check().await
    }

    #[instrument(skip(self, principal), fields(owner = %principal.name))]
    pub async fn find(&self, principal: &Principal, id: i64) -> Result<Card, ServiceError> {
        let result = self.gate.resolve(principal, id).await;
        record(OP_READ, &result);
        result
    }

    #[instrument(skip(self, plan), fields(owner = %plan.owner, offset = plan.offset, limit = plan.limit))]
    pub async fn list(&self, plan: &QueryPlan) -> Result<Vec<Card>, ServiceError> {
        let result = self.pagination.fetch(plan).await;
        record(OP_LIST, &result);
        result
    }

    #[instrument(skip(self, principal), fields(owner = %principal.name))]
    pub async fn create(&self, principal: &Principal, amount: Decimal) -> Result<Card, ServiceError> {
        let result = self
            .store
            .save(CardDraft::new_for(&principal.name, amount))
            .await;
        record(OP_CREATE, &result);

        let card = result?;
        info!(card_id = card.id, "Card created");
        Ok(card)
    }

    /// Replace the amount; id and owner stay as they are.
    #[instrument(skip(self, principal), fields(owner = %principal.name))]
    pub async fn update(
        &self,
        principal: &Principal,
        id: i64,
        amount: Decimal,
    ) -> Result<Card, ServiceError> {
        let _guard = self.locks.lock(id).await;

        let result = match self.gate.resolve(principal, id).await {
            Ok(existing) => {
                self.store
                    .save(CardDraft::replacing(&existing, &principal.name, amount))
                    .await
            }
            Err(e) => Err(e),
        };
        record(OP_UPDATE, &result);

        let card = result?;
        info!(card_id = card.id, "Card updated");
        Ok(card)
    }

    #[instrument(skip(self, principal), fields(owner = %principal.name))]
    pub async fn delete(&self, principal: &Principal, id: i64) -> Result<(), ServiceError> {
        let _guard = self.locks.lock(id).await;

        let result = match self.gate.owns(principal, id).await {
            Ok(true) => self.store.delete_by_id(id).await,
            Ok(false) => Err(ServiceError::CardNotFound),
            Err(e) => Err(e),
        };
        record(OP_DELETE, &result);

        result?;
        info!(card_id = id, "Card deleted");
        Ok(())
    }
}

fn record<T>(operation: &'static str, result: &Result<T, ServiceError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(ServiceError::CardNotFound) => "not_found",
        Err(_) => "error",
    };
    record_card_operation(operation, outcome);
}
