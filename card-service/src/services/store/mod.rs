//! Card persistence.
//!
//! Every read that can reveal a card takes the owner as part of the key.
//! There is no `find_by_id`.

mod memory;
mod postgres;

pub use memory::InMemoryCardStore;
pub use postgres::PgCardStore;

use async_trait::async_trait;

use crate::models::{Card, CardDraft};
use crate::services::{QueryPlan, ServiceError};

#[async_trait]
pub trait CardStore: Send + Sync {
    async fn find_by_id_and_owner(&self, id: i64, owner: &str)
        -> Result<Option<Card>, ServiceError>;

    /// One page of `plan.owner`'s cards, ordered by `plan.sort` with ties
    /// broken by ascending id.
    async fn find_page_by_owner(&self, plan: &QueryPlan) -> Result<Vec<Card>, ServiceError>;

    /// Insert when `draft.id` is `None` (the store assigns the id). Otherwise
    /// rewrite the card with that id and owner; `CardNotFound` if it is gone.
    async fn save(&self, draft: CardDraft) -> Result<Card, ServiceError>;

    /// Removing an id that does not exist is not an error.
    async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError>;

    async fn exists_by_id_and_owner(&self, id: i64, owner: &str) -> Result<bool, ServiceError>;

    async fn health_check(&self) -> Result<(), ServiceError>;
}
