//! Card record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored card. `id` and `owner` never change after creation.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    pub amount: Decimal,
    pub owner: String,
}

/// What the service hands to [`CardStore::save`](crate::services::CardStore::save).
///
/// `id: None` asks the store to assign one; `Some(id)` rewrites an existing
/// record owned by `owner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDraft {
    pub id: Option<i64>,
    pub amount: Decimal,
    pub owner: String,
}

impl CardDraft {
    pub fn new_for(owner: &str, amount: Decimal) -> Self {
        Self {
            id: None,
            amount,
            owner: owner.to_string(),
        }
    }

    pub fn replacing(existing: &Card, owner: &str, amount: Decimal) -> Self {
        Self {
            id: Some(existing.id),
            amount,
            owner: owner.to_string(),
        }
    }
}

/// Card attributes a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardField {
    Id,
    Amount,
    Owner,
}

impl CardField {
    /// Property names are matched exactly, like the JSON field names.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Self::Id),
            "amount" => Some(Self::Amount),
            "owner" => Some(Self::Owner),
            _ => None,
        }
    }

    /// Column name in the `cards` table.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Amount => "amount",
            Self::Owner => "owner",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_serializes_amount_as_number() {
        let card = Card {
            id: 99,
            amount: Decimal::new(12345, 2),
            owner: "Owen".to_string(),
        };

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["id"], 99);
        assert_eq!(json["amount"].as_f64(), Some(123.45));
        assert_eq!(json["owner"], "Owen");
    }

    #[test]
    fn test_replacing_keeps_id() {
        let existing = Card {
            id: 7,
            amount: Decimal::ONE,
            owner: "Owen".to_string(),
        };

        let draft = CardDraft::replacing(&existing, "Owen", Decimal::TEN);
        assert_eq!(draft.id, Some(7));
        assert_eq!(draft.amount, Decimal::TEN);
    }

    #[test]
    fn test_field_names_are_exact() {
        assert_eq!(CardField::parse("amount"), Some(CardField::Amount));
        assert_eq!(CardField::parse("Amount"), None);
        assert_eq!(CardField::parse("balance"), None);
    }
}
