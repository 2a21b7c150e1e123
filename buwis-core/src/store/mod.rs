pub mod defaults;
pub mod memory;
pub mod repository;
pub mod source;

pub use memory::InMemoryBracketStore;
pub use repository::BracketRepository;
pub use source::{BracketStore, StoreError};
