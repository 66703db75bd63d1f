pub mod card;
pub mod principal;

pub use card::{Card, CardDraft, CardField};
pub use principal::Principal;
