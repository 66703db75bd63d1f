//! HTTP handlers for card-service.

pub mod cards;
pub mod health;
pub mod metrics;

pub use cards::{create_card, delete_card, get_card, list_cards, unknown_card_route, update_card};
pub use health::{health_check, readiness_check};
pub use self::metrics::metrics;
