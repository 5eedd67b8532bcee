use crate::DbError;
use core_types::{Parcel, ParcelStatus};
use sqlx::sqlite::SqlitePool;
use sqlx::FromRow;

/// A row fetched from the `parcel` table.
#[derive(Debug, Clone, FromRow)]
struct ParcelRow {
    number: i64,
    client: i64,
    status: String,
    address: String,
    created_at: String,
}

impl From<ParcelRow> for Parcel {
    fn from(row: ParcelRow) -> Self {
        Self {
            number: row.number,
            client: row.client,
            status: ParcelStatus::from(row.status),
            address: row.address,
            created_at: row.created_at,
        }
    }
}

/// The `ParcelStore` is the data-access layer for parcels. Every method runs
/// exactly one SQL statement with all values bound as parameters.
///
/// The guarded mutations (`set_address`, `delete`) check the current status
/// inside the statement's `WHERE` clause, so the check and the write cannot be
/// interleaved with another caller. When the guard does not match they succeed
/// with `0` rows affected rather than returning an error.
#[derive(Debug, Clone)]
pub struct ParcelStore {
    pool: SqlitePool,
}

impl ParcelStore {
    /// Creates a new `ParcelStore` with a shared database connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a parcel and returns the number assigned by the database.
    ///
    /// `parcel.number` is ignored.
    #[tracing::instrument(skip(self, parcel), fields(client = parcel.client))]
    pub async fn add(&self, parcel: &Parcel) -> Result<i64, DbError> {
        let result = sqlx::query(
            "INSERT INTO parcel (client, status, address, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(parcel.client)
        .bind(parcel.status.as_str())
        .bind(&parcel.address)
        .bind(&parcel.created_at)
        .execute(&self.pool)
        .await?;

        let number = result.last_insert_rowid();
        tracing::debug!(number, "Parcel added.");
        Ok(number)
    }

    /// Fetches a single parcel by number.
    ///
    /// Returns `DbError::NotFound` if no such parcel exists.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, number: i64) -> Result<Parcel, DbError> {
        let row = sqlx::query_as::<_, ParcelRow>(
            "SELECT number, client, status, address, created_at FROM parcel WHERE number = $1",
        )
        .bind(number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::RowNotFound = e {
                DbError::NotFound(number)
            } else {
                e.into()
            }
        })?;

        Ok(row.into())
    }

    /// Fetches every parcel belonging to `client`, oldest first.
    /// An unknown client yields an empty list.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_client(&self, client: i64) -> Result<Vec<Parcel>, DbError> {
        let rows = sqlx::query_as::<_, ParcelRow>(
            "SELECT number, client, status, address, created_at FROM parcel WHERE client = $1 ORDER BY number",
        )
        .bind(client)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(count = rows.len(), "Fetched parcels for client.");
        Ok(rows.into_iter().map(Parcel::from).collect())
    }

    /// Overwrites the status of a parcel, whatever its current status is.
    ///
    /// Returns the number of rows changed: `0` means no such parcel.
    #[tracing::instrument(skip(self, status), fields(status = %status))]
    pub async fn set_status(&self, number: i64, status: &ParcelStatus) -> Result<u64, DbError> {
        let result = sqlx::query("UPDATE parcel SET status = $1 WHERE number = $2")
            .bind(status.as_str())
            .bind(number)
            .execute(&self.pool)
            .await?;

        let affected = result.rows_affected();
        tracing::debug!(affected, "Parcel status updated.");
        Ok(affected)
    }

    /// Moves a parcel from `from` to `to`, only if its status is still `from`.
    ///
    /// Returns the number of rows changed: `0` means the parcel does not exist
    /// or its status is no longer `from`.
    #[tracing::instrument(skip(self, from, to), fields(from = %from, to = %to))]
    pub async fn transition(
        &self,
        number: i64,
        from: &ParcelStatus,
        to: &ParcelStatus,
    ) -> Result<u64, DbError> {
        let result =
            sqlx::query("UPDATE parcel SET status = $1 WHERE number = $2 AND status = $3")
                .bind(to.as_str())
                .bind(number)
                .bind(from.as_str())
                .execute(&self.pool)
                .await?;

        let affected = result.rows_affected();
        tracing::debug!(affected, "Parcel status transition attempted.");
        Ok(affected)
    }

    /// Changes the delivery address of a parcel that is still registered.
    ///
    /// Returns the number of rows changed: `0` means the parcel does not exist
    /// or is no longer registered.
    #[tracing::instrument(skip(self, address))]
    pub async fn set_address(&self, number: i64, address: &str) -> Result<u64, DbError> {
        let result =
            sqlx::query("UPDATE parcel SET address = $1 WHERE number = $2 AND status = $3")
                .bind(address)
                .bind(number)
                .bind(ParcelStatus::REGISTERED)
                .execute(&self.pool)
                .await?;

        let affected = result.rows_affected();
        tracing::debug!(affected, "Parcel address update attempted.");
        Ok(affected)
    }

    /// Deletes a parcel that is still registered.
    ///
    /// Returns the number of rows removed: `0` means the parcel does not exist
    /// or is no longer registered, and nothing was changed.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, number: i64) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM parcel WHERE number = $1 AND status = $2")
            .bind(number)
            .bind(ParcelStatus::REGISTERED)
            .execute(&self.pool)
            .await?;

        let affected = result.rows_affected();
        tracing::debug!(affected, "Parcel delete attempted.");
        Ok(affected)
    }
}
