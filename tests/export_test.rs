mod common;

use anyhow::Result;
use common::{charge, stock, test_service, trip};
use haulage::application::LedgerService;
use haulage::io::{DatabaseSnapshot, Exporter};

#[tokio::test]
async fn test_export_trips_csv() -> Result<()> {
    let (service, _temp) = test_service().await?;
    service
        .trips()
        .add(&trip("2024-05-05", "John Smith", "1200", "250.5"))
        .await?;

    let mut buf = Vec::new();
    let count = Exporter::new(&service).export_trips_csv(&mut buf).await?;
    assert_eq!(count, 1);

    let csv = String::from_utf8(buf)?;
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("id,date,client,cargo,route,income,fuel,driver")
    );
    assert_eq!(
        lines.next(),
        Some("1,2024-05-05,ABC Shipping,Electronics,NY to Boston,1200.00,250.50,John Smith")
    );
    assert_eq!(lines.next(), None);

    Ok(())
}

#[tokio::test]
async fn test_export_inventory_includes_status() -> Result<()> {
    let (service, _temp) = test_service().await?;
    service
        .inventory()
        .add(&stock("Brake pads", "3", "25", "40"))
        .await?;

    let mut buf = Vec::new();
    Exporter::new(&service)
        .export_inventory_csv(&mut buf)
        .await?;

    let csv = String::from_utf8(buf)?;
    assert!(csv.contains("1,Brake pads,3,25.00,40.00,75.00,LOW"));

    Ok(())
}

#[tokio::test]
async fn test_export_driver_payments_ends_with_total() -> Result<()> {
    let (service, _temp) = test_service().await?;
    service
        .trips()
        .add(&trip("2024-05-01", "X", "500", "100"))
        .await?;
    service
        .trips()
        .add(&trip("2024-05-02", "Y", "1000", "200"))
        .await?;

    let mut buf = Vec::new();
    let drivers = Exporter::new(&service)
        .export_driver_payments_csv(&mut buf)
        .await?;
    assert_eq!(drivers, 2);

    let csv = String::from_utf8(buf)?;
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("Y,"));
    assert_eq!(lines[3], "TOTAL,2,1500.00,300.00,1200.00");

    Ok(())
}

#[tokio::test]
async fn test_export_balances_csv() -> Result<()> {
    let (service, _temp) = test_service().await?;
    service.customers().add(&charge("A", "200", "50")).await?;
    service.customers().add(&charge("B", "10", "10")).await?;

    let mut buf = Vec::new();
    let count = Exporter::new(&service).export_balances_csv(&mut buf).await?;
    assert_eq!(count, 1);
    assert_eq!(String::from_utf8(buf)?, "customer,balance\nA,150.00\n");

    Ok(())
}

#[tokio::test]
async fn test_full_json_export() -> Result<()> {
    let (service, _temp) = test_service().await?;
    service
        .trips()
        .add(&trip("2024-05-01", "X", "500", "100"))
        .await?;
    service
        .inventory()
        .add(&stock("Tires", "8", "120", "180"))
        .await?;
    service.customers().add(&charge("A", "200", "50")).await?;

    let mut buf = Vec::new();
    Exporter::new(&service).export_full_json(&mut buf).await?;

    let snapshot: DatabaseSnapshot = serde_json::from_slice(&buf)?;
    assert_eq!(snapshot.trips.len(), 1);
    assert_eq!(snapshot.trips[0].data.income_cents, 50000);
    assert!(snapshot.maintenance.is_empty());
    assert_eq!(snapshot.inventory[0].data.name, "Tires");
    assert_eq!(snapshot.customer_transactions.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_backup_is_a_usable_copy() -> Result<()> {
    let (service, temp) = test_service().await?;
    service
        .trips()
        .add(&trip("2024-05-01", "X", "500", "100"))
        .await?;

    let backup_dir = temp.path().join("backups");
    let path = service.backup(&backup_dir).await?;
    assert!(path.starts_with(&backup_dir));
    assert!(path.exists());

    let file_name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(file_name.starts_with("haulage_backup_"));
    assert!(file_name.ends_with(".db"));

    // Later writes do not reach the backup
    service
        .trips()
        .add(&trip("2024-05-02", "Y", "500", "100"))
        .await?;

    let restored = LedgerService::connect(path.to_str().unwrap()).await?;
    assert_eq!(restored.trips().list().await?.len(), 1);

    Ok(())
}
