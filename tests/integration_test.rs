mod common;

use anyhow::Result;
use common::{charge, service_record, test_service, trip};
use haulage::application::{LedgerError, LedgerService};
use haulage::domain::ValidationError;

#[tokio::test]
async fn test_add_then_list_returns_stored_trip() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let added = service
        .trips()
        .add(&trip("2024-05-05", "John Smith", "1200", "250.50"))
        .await?;

    let trips = service.trips().list().await?;
    assert_eq!(trips.len(), 1);
    assert_eq!(trips[0].id, added.id);
    assert_eq!(trips[0].data.driver, "John Smith");
    assert_eq!(trips[0].data.income_cents, 120000);
    assert_eq!(trips[0].data.fuel_cents, 25050);
    assert_eq!(trips[0].data.net_cents(), 94950);

    Ok(())
}

#[tokio::test]
async fn test_trips_list_most_recent_first() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let trips = service.trips();

    trips.add(&trip("2024-01-10", "A", "100", "10")).await?;
    trips.add(&trip("2024-03-01", "B", "100", "10")).await?;
    let first_same_day = trips.add(&trip("2024-02-15", "C", "100", "10")).await?;
    let second_same_day = trips.add(&trip("2024-02-15", "D", "100", "10")).await?;

    let listed = trips.list().await?;
    let dates: Vec<_> = listed.iter().map(|t| t.data.date.as_str()).collect();
    assert_eq!(dates, ["2024-03-01", "2024-02-15", "2024-02-15", "2024-01-10"]);

    // Newer id first on the same date
    assert_eq!(listed[1].id, second_same_day.id);
    assert_eq!(listed[2].id, first_same_day.id);

    Ok(())
}

#[tokio::test]
async fn test_update_replaces_every_field() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let trips = service.trips();

    let added = trips.add(&trip("2024-05-05", "John", "1200", "250")).await?;

    let mut replacement = trip("2024-05-06", "Maria", "900", "100");
    replacement.client = "XYZ Freight".into();
    trips.update(added.id, &replacement).await?;

    let stored = trips.get(added.id).await?;
    assert_eq!(stored.data.date, "2024-05-06");
    assert_eq!(stored.data.client, "XYZ Freight");
    assert_eq!(stored.data.driver, "Maria");
    assert_eq!(stored.data.income_cents, 90000);
    assert_eq!(stored.data.fuel_cents, 10000);
    assert_eq!(trips.list().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_update_missing_id_is_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service
        .maintenance()
        .update(42, &service_record("TRK-001", "2024-05-01", "80"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(service.maintenance().list().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_delete_removes_only_that_record() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let maintenance = service.maintenance();

    let keep = maintenance
        .add(&service_record("TRK-001", "2024-05-01", "80"))
        .await?;
    let gone = maintenance
        .add(&service_record("TRK-002", "2024-05-02", "120"))
        .await?;

    maintenance.delete(gone.id).await?;

    let remaining = maintenance.list().await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep.id);
    assert!(maintenance.get(gone.id).await.unwrap_err().is_not_found());

    Ok(())
}

#[tokio::test]
async fn test_delete_unknown_id_leaves_store_unchanged() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let customers = service.customers();

    customers.add(&charge("Acme", "100", "0")).await?;
    let before = customers.list().await?;

    let err = customers.delete(999).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { id: 999, .. }));
    assert_eq!(customers.list().await?, before);

    Ok(())
}

#[tokio::test]
async fn test_ids_are_not_reused_after_delete() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let trips = service.trips();

    let first = trips.add(&trip("2024-05-05", "A", "10", "1")).await?;
    trips.delete(first.id).await?;
    let second = trips.add(&trip("2024-05-05", "A", "10", "1")).await?;

    assert!(second.id > first.id);

    Ok(())
}

#[tokio::test]
async fn test_validation_errors_never_reach_the_store() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let trips = service.trips();

    let err = trips
        .add(&trip("2024-05-05", "   ", "1200", "250"))
        .await
        .unwrap_err();
    assert_eq!(err.validation(), Some(&ValidationError::MissingField("driver")));

    let err = trips
        .add(&trip("2024-05-05", "John", "12,00", "250"))
        .await
        .unwrap_err();
    assert_eq!(err.validation(), Some(&ValidationError::InvalidNumber("income")));

    let err = trips
        .add(&trip("2024-05-05", "John", "1200", "-5"))
        .await
        .unwrap_err();
    assert_eq!(
        err.validation(),
        Some(&ValidationError::InvalidNumber("fuel expense"))
    );

    assert!(trips.list().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_missing_field_reported_before_bad_number() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let mut input = service_record("TRK-001", "2024-05-01", "abc");
    input.description = String::new();

    let err = service.maintenance().add(&input).await.unwrap_err();
    assert_eq!(
        err.validation(),
        Some(&ValidationError::MissingField("description"))
    );

    Ok(())
}

#[tokio::test]
async fn test_text_fields_are_trimmed() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let added = service
        .customers()
        .add(&charge("  Acme Corp  ", " 100.5 ", "0"))
        .await?;

    assert_eq!(added.data.customer, "Acme Corp");
    assert_eq!(added.data.owed_cents, 10050);

    Ok(())
}

#[tokio::test]
async fn test_list_is_idempotent() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .maintenance()
        .add(&service_record("TRK-001", "2024-05-01", "80"))
        .await?;
    service
        .maintenance()
        .add(&service_record("TRK-001", "2024-06-01", "95.25"))
        .await?;

    let first = service.maintenance().list().await?;
    let second = service.maintenance().list().await?;
    assert_eq!(first, second);

    Ok(())
}

#[tokio::test]
async fn test_data_survives_reconnect() -> Result<()> {
    let (service, temp) = test_service().await?;
    service
        .trips()
        .add(&trip("2024-05-05", "John", "1200", "250"))
        .await?;
    drop(service);

    let db_path = temp.path().join("test.db");
    let reopened = LedgerService::connect(db_path.to_str().unwrap()).await?;
    assert_eq!(reopened.trips().list().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_connect_to_missing_database_is_unavailable() -> Result<()> {
    let temp = tempfile::TempDir::new()?;
    let db_path = temp.path().join("missing").join("nowhere.db");

    let err = LedgerService::connect(db_path.to_str().unwrap())
        .await
        .err()
        .unwrap();
    assert!(matches!(err, LedgerError::StoreUnavailable(_)));

    Ok(())
}
