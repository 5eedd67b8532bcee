use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::ParcelStatus;
use crate::error::CoreError;

/// A tracked shipment.
///
/// `number` is `0` until the parcel has been stored; the database assigns it
/// on insertion and it never changes afterwards. `client` and `created_at`
/// are likewise fixed once the parcel exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    pub number: i64,
    pub client: i64,
    pub status: ParcelStatus,
    pub address: String,
    /// RFC 3339 timestamp, e.g. `2024-01-01T00:00:00Z`.
    pub created_at: String,
}

impl Parcel {
    /// Builds an unsaved, registered parcel stamped with the current UTC time.
    pub fn new(client: i64, address: impl Into<String>) -> Self {
        Self {
            number: 0,
            client,
            status: ParcelStatus::Registered,
            address: address.into(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    /// Builds a new parcel after rejecting an empty address.
    pub fn register(client: i64, address: &str) -> Result<Self, CoreError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(CoreError::InvalidInput(
                "address".to_string(),
                "must not be empty".to_string(),
            ));
        }
        Ok(Self::new(client, address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn new_parcel_is_unsaved_and_registered() {
        let parcel = Parcel::new(1000, "test");
        assert_eq!(parcel.number, 0);
        assert_eq!(parcel.client, 1000);
        assert_eq!(parcel.status, ParcelStatus::Registered);
        assert_eq!(parcel.address, "test");
    }

    #[test]
    fn created_at_is_rfc3339_utc() {
        let parcel = Parcel::new(1, "somewhere");
        assert!(parcel.created_at.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&parcel.created_at).is_ok());
    }

    #[test]
    fn register_rejects_blank_address() {
        let err = Parcel::register(1, "   ").unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidInput("address".to_string(), "must not be empty".to_string())
        );
        assert_eq!(Parcel::register(1, " 5 Main St ").unwrap().address, "5 Main St");
    }
}
