pub mod loader;

pub use loader::{BracketTableError, BracketTableLoader, BracketTableRecord};
