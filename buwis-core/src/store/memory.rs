use std::collections::HashMap;

use async_trait::async_trait;

use crate::models::TaxBracket;
use crate::store::source::{BracketStore, StoreError};

/// Bracket store backed by an in-memory map.
///
/// Used as the programmatic source for tables parsed from CSV and as the
/// test double for [`crate::store::BracketRepository`].
#[derive(Debug, Default, Clone)]
pub struct InMemoryBracketStore {
    by_year: HashMap<i32, Vec<TaxBracket>>,
}

impl InMemoryBracketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups the given rows by tax year, sorting each year's table by
    /// ascending `min_income`.
    pub fn from_brackets(brackets: impl IntoIterator<Item = TaxBracket>) -> Self {
        let mut by_year: HashMap<i32, Vec<TaxBracket>> = HashMap::new();
        for bracket in brackets {
            by_year.entry(bracket.tax_year).or_default().push(bracket);
        }
        for table in by_year.values_mut() {
            table.sort_by(|a, b| a.min_income.cmp(&b.min_income));
        }
        Self { by_year }
    }

    /// Replaces the table for one tax year.
    pub fn insert_year(
        &mut self,
        tax_year: i32,
        mut brackets: Vec<TaxBracket>,
    ) {
        brackets.sort_by(|a, b| a.min_income.cmp(&b.min_income));
        self.by_year.insert(tax_year, brackets);
    }
}

#[async_trait]
impl BracketStore for InMemoryBracketStore {
    async fn fetch_brackets(&self, tax_year: i32) -> Result<Vec<TaxBracket>, StoreError> {
        self.by_year
            .get(&tax_year)
            .cloned()
            .ok_or(StoreError::NotFound(tax_year))
    }

    async fn list_tax_years(&self) -> Result<Vec<i32>, StoreError> {
        let mut years: Vec<i32> = self.by_year.keys().copied().collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        Ok(years)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::store::defaults::{DEFAULT_TAX_YEAR, default_brackets};

    use super::*;

    #[tokio::test]
    async fn fetch_returns_the_year_table() {
        let store = InMemoryBracketStore::from_brackets(default_brackets());

        let brackets = store.fetch_brackets(DEFAULT_TAX_YEAR).await.unwrap();

        assert_eq!(brackets.len(), 6);
    }

    #[tokio::test]
    async fn fetch_unknown_year_is_not_found() {
        let store = InMemoryBracketStore::from_brackets(default_brackets());

        let result = store.fetch_brackets(1999).await;

        assert_eq!(result, Err(StoreError::NotFound(1999)));
    }

    #[tokio::test]
    async fn from_brackets_sorts_each_table() {
        let mut rows = default_brackets();
        rows.reverse();
        let store = InMemoryBracketStore::from_brackets(rows);

        let brackets = store.fetch_brackets(DEFAULT_TAX_YEAR).await.unwrap();

        assert_eq!(brackets, default_brackets());
    }

    #[tokio::test]
    async fn list_tax_years_is_newest_first() {
        let mut store = InMemoryBracketStore::from_brackets(default_brackets());
        let mut older = default_brackets();
        for bracket in &mut older {
            bracket.tax_year = 2023;
        }
        store.insert_year(2023, older);

        let years = store.list_tax_years().await.unwrap();

        assert_eq!(years, vec![2024, 2023]);
    }
}
