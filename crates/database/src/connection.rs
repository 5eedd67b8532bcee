use crate::error::DbError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

const CREATE_PARCEL_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS parcel (
    number     INTEGER PRIMARY KEY AUTOINCREMENT,
    client     INTEGER NOT NULL,
    status     TEXT    NOT NULL,
    address    TEXT    NOT NULL,
    created_at TEXT    NOT NULL
)
"#;

/// Opens a connection pool to the SQLite database at `url`.
///
/// The database file is created if it does not exist yet, and the `parcel`
/// table is created on first use.
pub async fn connect(url: &str) -> Result<SqlitePool, DbError> {
    let options = SqliteConnectOptions::from_str(url)
        .map_err(|source| DbError::InvalidUrl {
            url: url.to_string(),
            source,
        })?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;

    ensure_schema(&pool).await?;
    tracing::debug!(url, "Connected to parcel database.");

    Ok(pool)
}

/// Opens a private in-memory database holding an empty `parcel` table.
///
/// Every SQLite in-memory connection is its own database, so the pool is
/// pinned to a single connection that is never recycled.
pub async fn connect_in_memory() -> Result<SqlitePool, DbError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    ensure_schema(&pool).await?;

    Ok(pool)
}

/// Creates the `parcel` table if it is missing. Safe to call repeatedly.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), DbError> {
    sqlx::query(CREATE_PARCEL_TABLE).execute(pool).await?;
    Ok(())
}
