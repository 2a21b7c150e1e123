use std::path::Path;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{FromRow, sqlite::SqlitePool};
use tracing::debug;

use buwis_core::{BracketStore, StoreError, TaxBracket};

/// SQLite-backed bracket store.
///
/// Bracket tables live in a single `tax_brackets` table keyed by
/// `(tax_year, bracket_order)`, with decimal columns stored as TEXT so they
/// round-trip exactly. Schema comes from `migrations/`, reference rows from
/// `seeds/`.
pub struct SqliteBracketStore {
    pool: SqlitePool,
}

impl SqliteBracketStore {
    pub async fn new(database_url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePool::connect(database_url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self { pool })
    }

    pub fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    /// Executes every `.sql` file in `seeds_dir`, in filename order.
    pub async fn run_seeds(
        &self,
        seeds_dir: &Path,
    ) -> Result<(), StoreError> {
        let mut entries: Vec<_> = std::fs::read_dir(seeds_dir)
            .map_err(|e| {
                StoreError::Backend(format!(
                    "cannot read seeds directory '{}': {}",
                    seeds_dir.display(),
                    e
                ))
            })?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "sql"))
            .collect();

        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let sql = std::fs::read_to_string(&path).map_err(|e| {
                StoreError::Backend(format!("cannot read seed file '{}': {}", path.display(), e))
            })?;

            sqlx::raw_sql(&sql).execute(&self.pool).await.map_err(|e| {
                StoreError::Backend(format!("seed file '{}' failed: {}", path.display(), e))
            })?;
            debug!(seed = %path.display(), "applied seed file");
        }

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Replaces the bracket table for one tax year in a single transaction.
    /// Loading the same rows twice leaves the table unchanged.
    pub async fn replace_year(
        &self,
        tax_year: i32,
        brackets: &[TaxBracket],
    ) -> Result<usize, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        sqlx::query("DELETE FROM tax_brackets WHERE tax_year = ?")
            .bind(tax_year)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        for bracket in brackets {
            sqlx::query(
                "INSERT INTO tax_brackets (
                    tax_year, bracket_order, min_income, max_income,
                    base_tax, rate, excess_over_threshold, is_active
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(tax_year)
            .bind(bracket.bracket_order)
            .bind(bracket.min_income.to_string())
            .bind(bracket.max_income.map(|m| m.to_string()))
            .bind(bracket.base_tax.to_string())
            .bind(bracket.rate.to_string())
            .bind(bracket.excess_over_threshold.to_string())
            .bind(bracket.is_active)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        debug!(tax_year, rows = brackets.len(), "replaced bracket table");
        Ok(brackets.len())
    }
}

#[derive(FromRow)]
struct TaxBracketRow {
    tax_year: i32,
    bracket_order: i32,
    min_income: String,
    max_income: Option<String>,
    base_tax: String,
    rate: String,
    excess_over_threshold: String,
    is_active: bool,
}

impl TryFrom<TaxBracketRow> for TaxBracket {
    type Error = StoreError;

    fn try_from(row: TaxBracketRow) -> Result<Self, Self::Error> {
        Ok(TaxBracket {
            tax_year: row.tax_year,
            bracket_order: row.bracket_order,
            min_income: parse_decimal(&row.min_income)?,
            max_income: row
                .max_income
                .as_deref()
                .map(parse_decimal)
                .transpose()?,
            base_tax: parse_decimal(&row.base_tax)?,
            rate: parse_decimal(&row.rate)?,
            excess_over_threshold: parse_decimal(&row.excess_over_threshold)?,
            is_active: row.is_active,
        })
    }
}

fn parse_decimal(s: &str) -> Result<Decimal, StoreError> {
    s.parse::<Decimal>()
        .map_err(|e| StoreError::Backend(format!("cannot parse decimal '{}': {}", s, e)))
}

#[async_trait]
impl BracketStore for SqliteBracketStore {
    async fn fetch_brackets(&self, tax_year: i32) -> Result<Vec<TaxBracket>, StoreError> {
        let rows: Vec<TaxBracketRow> = sqlx::query_as(
            "SELECT tax_year, bracket_order, min_income, max_income,
                    base_tax, rate, excess_over_threshold, is_active
             FROM tax_brackets
             WHERE tax_year = ?
             ORDER BY bracket_order",
        )
        .bind(tax_year)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        if rows.is_empty() {
            return Err(StoreError::NotFound(tax_year));
        }

        rows.into_iter().map(TaxBracket::try_from).collect()
    }

    async fn list_tax_years(&self) -> Result<Vec<i32>, StoreError> {
        let rows: Vec<(i32,)> =
            sqlx::query_as("SELECT DISTINCT tax_year FROM tax_brackets ORDER BY tax_year DESC")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(rows.into_iter().map(|(year,)| year).collect())
    }
}
