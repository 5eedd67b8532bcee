use core_types::ParcelStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] database::DbError),
    #[error("{0}")]
    Core(#[from] core_types::CoreError),
    #[error("Parcel {number} changed to '{actual}' while being moved from '{expected}'")]
    StatusChanged {
        number: i64,
        expected: ParcelStatus,
        actual: ParcelStatus,
    },
}

impl AppError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Database(e) if e.is_not_found())
    }
}
