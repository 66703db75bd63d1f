use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::CardStore;
use crate::models::{Card, CardDraft, CardField};
use crate::services::{QueryPlan, ServiceError, SortDirection};

struct Inner {
    cards: BTreeMap<i64, Card>,
    next_id: i64,
}

/// Process-local store. Ids come from a counter that only moves forward, so a
/// deleted id is never handed out again.
pub struct InMemoryCardStore {
    inner: RwLock<Inner>,
}

impl Default for InMemoryCardStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCardStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                cards: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Store preloaded with `cards`; new ids start above the largest seeded id.
    pub fn with_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        let cards: BTreeMap<i64, Card> = cards.into_iter().map(|c| (c.id, c)).collect();
        let next_id = cards.keys().next_back().map_or(1, |max| max + 1);

        Self {
            inner: RwLock::new(Inner { cards, next_id }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, ServiceError> {
        self.inner
            .read()
            .map_err(|e| anyhow::anyhow!("Card store lock poisoned: {}", e).into())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, ServiceError> {
        self.inner
            .write()
            .map_err(|e| anyhow::anyhow!("Card store lock poisoned: {}", e).into())
    }
}

fn compare(a: &Card, b: &Card, field: Option<CardField>, direction: SortDirection) -> Ordering {
    let primary = match field {
        Some(CardField::Id) => a.id.cmp(&b.id),
        Some(CardField::Amount) => a.amount.cmp(&b.amount),
        Some(CardField::Owner) => a.owner.cmp(&b.owner),
        None => Ordering::Equal,
    };

    let primary = match direction {
        SortDirection::Asc => primary,
        SortDirection::Desc => primary.reverse(),
    };

    primary.then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl CardStore for InMemoryCardStore {
    async fn find_by_id_and_owner(
        &self,
        id: i64,
        owner: &str,
    ) -> Result<Option<Card>, ServiceError> {
        Ok(self
            .read()?
            .cards
            .get(&id)
            .filter(|card| card.owner == owner)
            .cloned())
    }

    async fn find_page_by_owner(&self, plan: &QueryPlan) -> Result<Vec<Card>, ServiceError> {
        let inner = self.read()?;

        let mut owned: Vec<&Card> = inner
            .cards
            .values()
            .filter(|card| card.owner == plan.owner)
            .collect();

        let field = plan.sort.known_field();
        owned.sort_by(|a, b| compare(a, b, field, plan.sort.direction));

        let offset = usize::try_from(plan.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(plan.limit).unwrap_or(usize::MAX);

        Ok(owned
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn save(&self, draft: CardDraft) -> Result<Card, ServiceError> {
        let mut inner = self.write()?;

        match draft.id {
            None => {
                let id = inner.next_id;
                inner.next_id += 1;

                let card = Card {
                    id,
                    amount: draft.amount,
                    owner: draft.owner,
                };
                inner.cards.insert(id, card.clone());
                Ok(card)
            }
            Some(id) => match inner.cards.get_mut(&id) {
                Some(card) if card.owner == draft.owner => {
                    card.amount = draft.amount;
                    Ok(card.clone())
                }
                _ => Err(ServiceError::CardNotFound),
            },
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError> {
        self.write()?.cards.remove(&id);
        Ok(())
    }

    async fn exists_by_id_and_owner(&self, id: i64, owner: &str) -> Result<bool, ServiceError> {
        Ok(self
            .read()?
            .cards
            .get(&id)
            .is_some_and(|card| card.owner == owner))
    }

    async fn health_check(&self) -> Result<(), ServiceError> {
        self.read().map(|_| ())
    }
}
