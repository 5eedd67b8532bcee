use core_types::{Parcel, ParcelStatus};
use database::{DbError, ParcelStore};

use crate::error::AppError;

/// What became of a guarded change (address change or deletion).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The parcel exists but its status did not allow the change.
    Blocked(ParcelStatus),
}

/// The parcel workflows offered by the command line, built on `ParcelStore`.
///
/// The store reports a blocked guard as "0 rows affected"; this layer does
/// the follow-up read to tell a blocked change from a missing parcel.
#[derive(Debug, Clone)]
pub struct ParcelService {
    store: ParcelStore,
}

impl ParcelService {
    pub fn new(store: ParcelStore) -> Self {
        Self { store }
    }

    /// Registers a new parcel for `client` and returns it with its number.
    pub async fn register(&self, client: i64, address: &str) -> Result<Parcel, AppError> {
        let mut parcel = Parcel::register(client, address)?;
        parcel.number = self.store.add(&parcel).await?;

        tracing::info!(
            number = parcel.number,
            client = parcel.client,
            address = %parcel.address,
            "New parcel registered."
        );
        Ok(parcel)
    }

    pub async fn show(&self, number: i64) -> Result<Parcel, AppError> {
        Ok(self.store.get(number).await?)
    }

    pub async fn client_parcels(&self, client: i64) -> Result<Vec<Parcel>, AppError> {
        Ok(self.store.get_by_client(client).await?)
    }

    /// Overwrites the status, failing only if the parcel does not exist.
    pub async fn set_status(&self, number: i64, status: ParcelStatus) -> Result<Parcel, AppError> {
        if self.store.set_status(number, &status).await? == 0 {
            return Err(DbError::NotFound(number).into());
        }
        tracing::info!(number, status = %status, "Parcel status set.");
        Ok(self.store.get(number).await?)
    }

    /// Moves the parcel to the next status of the delivery flow.
    ///
    /// The write only applies if the status is still the one that was read,
    /// so two concurrent advances cannot both claim the same step.
    pub async fn advance(&self, number: i64) -> Result<Parcel, AppError> {
        let parcel = self.store.get(number).await?;
        let next = parcel.status.next()?;

        if self.store.transition(number, &parcel.status, &next).await? == 0 {
            let current = self.store.get(number).await?;
            tracing::warn!(
                number,
                expected = %parcel.status,
                actual = %current.status,
                "Parcel status changed concurrently."
            );
            return Err(AppError::StatusChanged {
                number,
                expected: parcel.status,
                actual: current.status,
            });
        }
        tracing::info!(number, from = %parcel.status, to = %next, "Parcel advanced.");

        Ok(Parcel {
            status: next,
            ..parcel
        })
    }

    pub async fn change_address(&self, number: i64, address: &str) -> Result<Outcome, AppError> {
        if self.store.set_address(number, address).await? > 0 {
            tracing::info!(number, address, "Parcel address changed.");
            return Ok(Outcome::Applied);
        }
        self.blocked(number).await
    }

    pub async fn delete(&self, number: i64) -> Result<Outcome, AppError> {
        if self.store.delete(number).await? > 0 {
            tracing::info!(number, "Parcel deleted.");
            return Ok(Outcome::Applied);
        }
        self.blocked(number).await
    }

    async fn blocked(&self, number: i64) -> Result<Outcome, AppError> {
        let parcel = self.store.get(number).await?;
        tracing::warn!(
            number,
            status = %parcel.status,
            "Parcel is not registered; change refused."
        );
        Ok(Outcome::Blocked(parcel.status))
    }
}
