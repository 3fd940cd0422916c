// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use haulage::application::LedgerService;
use haulage::domain::{CustomerTransactionInput, InventoryInput, MaintenanceInput, TripInput};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

pub fn trip(date: &str, driver: &str, income: &str, fuel: &str) -> TripInput {
    TripInput {
        date: date.into(),
        client: "ABC Shipping".into(),
        cargo: "Electronics".into(),
        route: "NY to Boston".into(),
        income: income.into(),
        fuel: fuel.into(),
        driver: driver.into(),
    }
}

pub fn service_record(plate: &str, date: &str, cost: &str) -> MaintenanceInput {
    MaintenanceInput {
        plate: plate.into(),
        service_date: date.into(),
        description: "Oil change".into(),
        cost: cost.into(),
    }
}

pub fn stock(name: &str, quantity: &str, purchase: &str, sale: &str) -> InventoryInput {
    InventoryInput {
        name: name.into(),
        quantity: quantity.into(),
        purchase_price: purchase.into(),
        sale_price: sale.into(),
    }
}

pub fn charge(customer: &str, owed: &str, paid: &str) -> CustomerTransactionInput {
    CustomerTransactionInput {
        customer: customer.into(),
        date: "2024-05-01".into(),
        owed: owed.into(),
        paid: paid.into(),
    }
}
