pub mod calculations;
pub mod models;
pub mod store;

pub use calculations::ValidationError;
pub use models::*;
pub use store::{BracketRepository, BracketStore, InMemoryBracketStore, StoreError};
