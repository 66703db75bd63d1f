//! Services layer for card-service.
//!
//! Credential resolution, card persistence, and the ownership and pagination
//! rules the handlers go through.

mod cards;
mod credentials;
pub mod error;
pub mod metrics;
mod ownership;
mod pagination;
mod store;

pub use cards::CardService;
pub use credentials::{CredentialStore, Credentials, InMemoryCredentialStore};
pub use error::ServiceError;
pub use ownership::OwnershipGate;
pub use pagination::{PaginationEngine, QueryPlan, SortDirection, SortOrder, DEFAULT_PAGE_SIZE};
pub use store::{CardStore, InMemoryCardStore, PgCardStore};
