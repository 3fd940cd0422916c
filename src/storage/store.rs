use std::path::Path;

use anyhow::Context;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};
use sqlx::{FromRow, Row, SqlitePool};
use thiserror::Error;

use crate::domain::{Cents, EntitySchema, FieldValue, Record, RecordId};

use super::MIGRATION_001_INITIAL;

/// An entity that can be written to and decoded from the store.
pub trait Persisted: EntitySchema + for<'r> FromRow<'r, SqliteRow> {}

impl<E> Persisted for E where E: EntitySchema + for<'r> FromRow<'r, SqliteRow> {}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: RecordId },

    #[error("Store unavailable: {0:#}")]
    Unavailable(#[from] anyhow::Error),
}

/// Row count and column totals over a set of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSums {
    pub count: i64,
    pub sums: Vec<Cents>,
}

/// [`ColumnSums`] for one value of the grouping column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSums {
    pub key: String,
    pub totals: ColumnSums,
}

/// Persistence for every ledger table.
///
/// Each method issues a single statement against one table. The table and
/// its columns come from the entity's [`EntitySchema`]; only values are bound.
#[derive(Clone)]
pub struct RecordStore {
    pool: SqlitePool,
}

impl RecordStore {
    /// Create a new store with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self, StoreError> {
        let store = Self::connect(database_url).await?;
        store.migrate().await?;
        Ok(store)
    }

    /// Insert a record and return its freshly assigned id.
    pub async fn create<E: Persisted>(&self, record: &E) -> Result<RecordId, StoreError> {
        let placeholders = vec!["?"; E::COLUMNS.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            E::TABLE,
            E::COLUMNS.join(", "),
            placeholders
        );

        let result = bind_values(sqlx::query(&sql), record.values())
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to insert into {}", E::TABLE))?;

        Ok(result.last_insert_rowid())
    }

    /// Replace every writable column of an existing record.
    pub async fn update<E: Persisted>(&self, id: RecordId, record: &E) -> Result<(), StoreError> {
        let assignments = E::COLUMNS
            .iter()
            .map(|column| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("UPDATE {} SET {} WHERE id = ?", E::TABLE, assignments);

        let result = bind_values(sqlx::query(&sql), record.values())
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to update {}", E::TABLE))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: E::NAME,
                id,
            });
        }
        Ok(())
    }

    pub async fn delete<E: Persisted>(&self, id: RecordId) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = ?", E::TABLE);

        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to delete from {}", E::TABLE))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: E::NAME,
                id,
            });
        }
        Ok(())
    }

    pub async fn get<E: Persisted>(&self, id: RecordId) -> Result<Record<E>, StoreError> {
        let sql = format!("{} WHERE id = ?", select_sql::<E>());

        sqlx::query_as::<_, Record<E>>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to fetch from {}", E::TABLE))?
            .ok_or(StoreError::NotFound {
                entity: E::NAME,
                id,
            })
    }

    /// List every record in the schema's default order, newest id breaking ties.
    pub async fn list<E: Persisted>(&self) -> Result<Vec<Record<E>>, StoreError> {
        let sql = format!("{} ORDER BY {}", select_sql::<E>(), order_sql::<E>());

        let records = sqlx::query_as::<_, Record<E>>(&sql)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to list {}", E::TABLE))?;
        Ok(records)
    }

    /// Find a record other than `excluding` whose `column` equals `value` exactly.
    pub async fn find_duplicate<E: Persisted>(
        &self,
        column: &str,
        value: &str,
        excluding: Option<RecordId>,
    ) -> Result<Option<RecordId>, StoreError> {
        let sql = format!(
            "SELECT id FROM {} WHERE {} = ? AND id != ? LIMIT 1",
            E::TABLE,
            column
        );

        let row = sqlx::query(&sql)
            .bind(value)
            // Ids start at 1, so 0 excludes nothing.
            .bind(excluding.unwrap_or(0))
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to check {}.{} for duplicates", E::TABLE, column))?;

        let id = row
            .map(|row| row.try_get("id"))
            .transpose()
            .context("Invalid id in duplicate check")?;
        Ok(id)
    }

    /// `COUNT(*)` and `SUM(column)` per distinct value of `group_column`.
    pub async fn group_sums<E: Persisted>(
        &self,
        group_column: &str,
        sum_columns: &[&str],
    ) -> Result<Vec<GroupSums>, StoreError> {
        let sql = format!(
            "SELECT {group_column} AS group_key, {} FROM {} GROUP BY {group_column}",
            aggregate_sql(sum_columns),
            E::TABLE
        );

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to aggregate {} by {}", E::TABLE, group_column))?;

        rows.iter()
            .map(|row| {
                Ok(GroupSums {
                    key: row.try_get(0).context("Invalid group key")?,
                    totals: read_sums(row, 1, sum_columns.len())?,
                })
            })
            .collect()
    }

    /// `COUNT(*)` and `SUM(column)` over the whole table.
    pub async fn column_sums<E: Persisted>(
        &self,
        sum_columns: &[&str],
    ) -> Result<ColumnSums, StoreError> {
        let sql = format!("SELECT {} FROM {}", aggregate_sql(sum_columns), E::TABLE);

        let row = sqlx::query(&sql)
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("Failed to total {}", E::TABLE))?;

        read_sums(&row, 0, sum_columns.len())
    }

    /// Write a consistent copy of the whole database to `path`, which must not exist.
    pub async fn backup_to(&self, path: &Path) -> Result<(), StoreError> {
        let target = path.to_string_lossy().into_owned();
        sqlx::query("VACUUM INTO ?")
            .bind(&target)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to back up database to {}", target))?;
        Ok(())
    }
}

fn select_sql<E: EntitySchema>() -> String {
    format!("SELECT id, {} FROM {}", E::COLUMNS.join(", "), E::TABLE)
}

fn order_sql<E: EntitySchema>() -> String {
    let newest_first = E::ORDER_BY.first().is_none_or(|order| order.descending);
    E::ORDER_BY
        .iter()
        .map(|order| {
            let direction = if order.descending { "DESC" } else { "ASC" };
            format!("{} {}", order.column, direction)
        })
        .chain(std::iter::once(
            if newest_first { "id DESC" } else { "id ASC" }.to_string(),
        ))
        .collect::<Vec<_>>()
        .join(", ")
}

fn aggregate_sql(sum_columns: &[&str]) -> String {
    std::iter::once("COUNT(*) AS row_count".to_string())
        .chain(
            sum_columns
                .iter()
                .enumerate()
                .map(|(i, column)| format!("COALESCE(SUM({column}), 0) AS sum_{i}")),
        )
        .collect::<Vec<_>>()
        .join(", ")
}

fn read_sums(row: &SqliteRow, offset: usize, sum_count: usize) -> Result<ColumnSums, StoreError> {
    let count = row.try_get(offset).context("Invalid row count")?;
    let sums = (0..sum_count)
        .map(|i| row.try_get::<i64, _>(offset + 1 + i))
        .collect::<Result<Vec<_>, _>>()
        .context("Invalid column total")?;
    Ok(ColumnSums { count, sums })
}

fn bind_values<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    values: Vec<FieldValue>,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for value in values {
        query = match value {
            FieldValue::Text(text) => query.bind(text),
            FieldValue::Integer(n) => query.bind(n),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InventoryItem, Trip};

    #[test]
    fn test_order_sql_appends_id_in_leading_direction() {
        assert_eq!(order_sql::<Trip>(), "date DESC, id DESC");
        assert_eq!(order_sql::<InventoryItem>(), "item_name ASC, id ASC");
    }

    #[test]
    fn test_aggregate_sql() {
        assert_eq!(
            aggregate_sql(&["income_cents", "fuel_cents"]),
            "COUNT(*) AS row_count, COALESCE(SUM(income_cents), 0) AS sum_0, COALESCE(SUM(fuel_cents), 0) AS sum_1"
        );
    }

    #[test]
    fn test_select_sql() {
        assert_eq!(
            select_sql::<InventoryItem>(),
            "SELECT id, item_name, quantity, purchase_price_cents, sale_price_cents FROM inventory"
        );
    }
}
