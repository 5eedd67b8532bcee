use std::collections::HashMap;

use core_types::{Parcel, ParcelStatus};
use database::{connect_in_memory, DbError, ParcelStore};

async fn store() -> ParcelStore {
    let pool = connect_in_memory().await.expect("in-memory database");
    ParcelStore::new(pool)
}

fn test_parcel() -> Parcel {
    Parcel {
        number: 0,
        client: 1000,
        status: ParcelStatus::Registered,
        address: "test".to_string(),
        created_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

#[tokio::test]
async fn add_get_delete() {
    let store = store().await;
    let mut parcel = test_parcel();

    let number = store.add(&parcel).await.unwrap();
    assert!(number > 0);
    parcel.number = number;

    let stored = store.get(number).await.unwrap();
    assert_eq!(stored, parcel);

    let removed = store.delete(number).await.unwrap();
    assert_eq!(removed, 1);

    let err = store.get(number).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound(n) if n == number));
}

#[tokio::test]
async fn add_assigns_distinct_numbers() {
    let store = store().await;
    let first = store.add(&test_parcel()).await.unwrap();
    let second = store.add(&test_parcel()).await.unwrap();
    assert_ne!(first, second);
}

#[tokio::test]
async fn add_ignores_the_incoming_number() {
    let store = store().await;
    let mut parcel = test_parcel();
    parcel.number = 42_000;

    let number = store.add(&parcel).await.unwrap();
    assert_ne!(number, 42_000);
    assert!(store.get(42_000).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn get_unknown_number_is_not_found() {
    let store = store().await;
    let err = store.get(7).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn delete_keeps_parcel_that_is_not_registered() {
    let store = store().await;
    let number = store.add(&test_parcel()).await.unwrap();
    store.set_status(number, &ParcelStatus::Sent).await.unwrap();
    let before = store.get(number).await.unwrap();

    let removed = store.delete(number).await.unwrap();
    assert_eq!(removed, 0);

    let after = store.get(number).await.unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn delete_unknown_number_is_silent() {
    let store = store().await;
    assert_eq!(store.delete(12345).await.unwrap(), 0);
}

#[tokio::test]
async fn set_address_while_registered() {
    let store = store().await;
    let number = store.add(&test_parcel()).await.unwrap();

    let changed = store.set_address(number, "new test address").await.unwrap();
    assert_eq!(changed, 1);

    let parcel = store.get(number).await.unwrap();
    assert_eq!(parcel.address, "new test address");
}

#[tokio::test]
async fn set_address_is_blocked_once_sent() {
    let store = store().await;
    let number = store.add(&test_parcel()).await.unwrap();
    store.set_status(number, &ParcelStatus::Sent).await.unwrap();

    let changed = store.set_address(number, "too late").await.unwrap();
    assert_eq!(changed, 0);

    let parcel = store.get(number).await.unwrap();
    assert_eq!(parcel.address, "test");
}

#[tokio::test]
async fn set_status_is_unconditional() {
    let store = store().await;
    let number = store.add(&test_parcel()).await.unwrap();

    for status in [
        ParcelStatus::Delivered,
        ParcelStatus::Other("new test status".to_string()),
        ParcelStatus::Registered,
    ] {
        let changed = store.set_status(number, &status).await.unwrap();
        assert_eq!(changed, 1);
        assert_eq!(store.get(number).await.unwrap().status, status);
    }
}

#[tokio::test]
async fn set_status_on_unknown_number_changes_nothing() {
    let store = store().await;
    let changed = store.set_status(999, &ParcelStatus::Sent).await.unwrap();
    assert_eq!(changed, 0);
}

#[tokio::test]
async fn transition_applies_only_from_expected_status() {
    let store = store().await;
    let number = store.add(&test_parcel()).await.unwrap();

    let moved = store
        .transition(number, &ParcelStatus::Registered, &ParcelStatus::Sent)
        .await
        .unwrap();
    assert_eq!(moved, 1);

    // A second caller that still believes the parcel is registered loses.
    let stale = store
        .transition(number, &ParcelStatus::Registered, &ParcelStatus::Sent)
        .await
        .unwrap();
    assert_eq!(stale, 0);
    assert_eq!(store.get(number).await.unwrap().status, ParcelStatus::Sent);
}

#[tokio::test]
async fn transition_on_deleted_parcel_changes_nothing() {
    let store = store().await;
    let number = store.add(&test_parcel()).await.unwrap();
    store.delete(number).await.unwrap();

    let moved = store
        .transition(number, &ParcelStatus::Registered, &ParcelStatus::Sent)
        .await
        .unwrap();
    assert_eq!(moved, 0);
    assert!(store.get(number).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn arbitrary_status_round_trips() {
    let store = store().await;
    let mut parcel = test_parcel();
    parcel.status = ParcelStatus::Other("held at customs".to_string());

    let number = store.add(&parcel).await.unwrap();
    let stored = store.get(number).await.unwrap();
    assert_eq!(stored.status.as_str(), "held at customs");

    // Only the exact "registered" token unlocks the guarded operations.
    assert_eq!(store.set_address(number, "elsewhere").await.unwrap(), 0);
    assert_eq!(store.delete(number).await.unwrap(), 0);
}

#[tokio::test]
async fn get_by_client_returns_all_parcels_of_client() {
    let store = store().await;
    let client = 4_242_424;

    let mut expected = HashMap::new();
    for address in ["first", "second", "third"] {
        let mut parcel = test_parcel();
        parcel.client = client;
        parcel.address = address.to_string();

        let number = store.add(&parcel).await.unwrap();
        parcel.number = number;
        expected.insert(number, parcel);
    }
    // Another client's parcel must not leak into the result.
    store.add(&test_parcel()).await.unwrap();

    let stored = store.get_by_client(client).await.unwrap();
    assert_eq!(stored.len(), expected.len());
    for parcel in stored {
        let original = expected.get(&parcel.number).expect("unexpected parcel");
        assert_eq!(&parcel, original);
    }
}

#[tokio::test]
async fn get_by_unknown_client_is_empty() {
    let store = store().await;
    store.add(&test_parcel()).await.unwrap();

    let stored = store.get_by_client(1).await.unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn parcel_lifecycle_scenario() {
    let store = store().await;
    let number = store.add(&test_parcel()).await.unwrap();

    store.set_address(number, "new address").await.unwrap();
    assert_eq!(store.get(number).await.unwrap().address, "new address");

    store.delete(number).await.unwrap();
    assert!(store.get(number).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn address_is_bound_not_interpolated() {
    let store = store().await;
    let mut parcel = test_parcel();
    parcel.address = "x'); DROP TABLE parcel; --".to_string();

    let number = store.add(&parcel).await.unwrap();
    assert_eq!(store.get(number).await.unwrap().address, parcel.address);
}
