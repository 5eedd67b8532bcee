use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// The lifecycle state of a parcel.
///
/// The recognised states cover the normal delivery flow. Any other token is
/// kept verbatim in `Other`, so a status written by another tool survives a
/// read/write cycle unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParcelStatus {
    /// The only state in which the address may change or the parcel may be deleted.
    Registered,
    Sent,
    Delivered,
    Other(String),
}

impl ParcelStatus {
    pub const REGISTERED: &'static str = "registered";
    pub const SENT: &'static str = "sent";
    pub const DELIVERED: &'static str = "delivered";

    /// Returns the token stored in the `status` column.
    pub fn as_str(&self) -> &str {
        match self {
            ParcelStatus::Registered => Self::REGISTERED,
            ParcelStatus::Sent => Self::SENT,
            ParcelStatus::Delivered => Self::DELIVERED,
            ParcelStatus::Other(s) => s,
        }
    }

    /// Returns the status that follows this one in the delivery flow.
    pub fn next(&self) -> Result<ParcelStatus, CoreError> {
        match self {
            ParcelStatus::Registered => Ok(ParcelStatus::Sent),
            ParcelStatus::Sent => Ok(ParcelStatus::Delivered),
            ParcelStatus::Delivered | ParcelStatus::Other(_) => {
                Err(CoreError::FinalStatus(self.as_str().to_string()))
            }
        }
    }
}

impl fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParcelStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ParcelStatus::from(s))
    }
}

impl From<String> for ParcelStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            Self::REGISTERED => ParcelStatus::Registered,
            Self::SENT => ParcelStatus::Sent,
            Self::DELIVERED => ParcelStatus::Delivered,
            _ => ParcelStatus::Other(s),
        }
    }
}

impl From<&str> for ParcelStatus {
    fn from(s: &str) -> Self {
        s.to_string().into()
    }
}

impl From<ParcelStatus> for String {
    fn from(status: ParcelStatus) -> Self {
        match status {
            ParcelStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tokens_parse_to_variants() {
        assert_eq!("registered".parse::<ParcelStatus>(), Ok(ParcelStatus::Registered));
        assert_eq!("sent".parse::<ParcelStatus>(), Ok(ParcelStatus::Sent));
        assert_eq!("delivered".parse::<ParcelStatus>(), Ok(ParcelStatus::Delivered));
    }

    #[test]
    fn unknown_token_is_kept_verbatim() {
        let status = ParcelStatus::from("lost in transit");
        assert_eq!(status, ParcelStatus::Other("lost in transit".to_string()));
        assert_eq!(status.as_str(), "lost in transit");
        assert_eq!(String::from(status), "lost in transit");
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(
            ParcelStatus::from("Registered"),
            ParcelStatus::Other("Registered".to_string())
        );
        assert_ne!(ParcelStatus::from("Registered").as_str(), ParcelStatus::REGISTERED);
    }

    #[test]
    fn next_follows_delivery_flow() {
        assert_eq!(ParcelStatus::Registered.next(), Ok(ParcelStatus::Sent));
        assert_eq!(ParcelStatus::Sent.next(), Ok(ParcelStatus::Delivered));
        assert_eq!(
            ParcelStatus::Delivered.next(),
            Err(CoreError::FinalStatus("delivered".to_string()))
        );
        assert!(ParcelStatus::Other("returned".to_string()).next().is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&ParcelStatus::Sent).unwrap();
        assert_eq!(json, "\"sent\"");
        let back: ParcelStatus = serde_json::from_str("\"on hold\"").unwrap();
        assert_eq!(back, ParcelStatus::Other("on hold".to_string()));
    }
}
