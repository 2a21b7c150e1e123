use async_trait::async_trait;
use thiserror::Error;

use crate::models::TaxBracket;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("no bracket table for tax year {0}")]
    NotFound(i32),

    #[error("store error: {0}")]
    Backend(String),

    #[error("connection error: {0}")]
    Connection(String),
}

/// Read-only source of bracket reference data, keyed by tax year.
///
/// Implementations back this with whatever holds the published tables: a
/// database, a bundled CSV, or an in-memory map in tests. The engines never
/// call a store directly; they go through
/// [`crate::store::BracketRepository`], which caches and falls back.
#[async_trait]
pub trait BracketStore: Send + Sync {
    /// All bracket rows for `tax_year`, ordered by ascending `min_income`.
    async fn fetch_brackets(&self, tax_year: i32) -> Result<Vec<TaxBracket>, StoreError>;

    /// Tax years the store has tables for, newest first.
    async fn list_tax_years(&self) -> Result<Vec<i32>, StoreError>;
}
