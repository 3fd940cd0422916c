use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use tracing::info;

use crate::domain::{MaintenanceRecord, Trip, sub_cents};
use crate::storage::RecordStore;

use super::{
    CustomerLedger, DriverPayments, FleetSummary, InventoryLedger, LedgerError, MaintenanceLedger,
    TripLedger,
};

/// Entry point for any client (CLI, tests, a future UI).
///
/// Owns one ledger per table plus the read-side views. The only state held
/// outside the database is the inventory low-stock threshold.
pub struct LedgerService {
    store: RecordStore,
    trips: TripLedger,
    maintenance: MaintenanceLedger,
    inventory: InventoryLedger,
    customers: CustomerLedger,
    driver_payments: DriverPayments,
}

impl LedgerService {
    pub fn new(store: RecordStore) -> Self {
        Self {
            trips: TripLedger::new(store.clone()),
            maintenance: MaintenanceLedger::new(store.clone()),
            inventory: InventoryLedger::new(store.clone()),
            customers: CustomerLedger::new(store.clone()),
            driver_payments: DriverPayments::new(store.clone()),
            store,
        }
    }

    /// Create (if needed) and migrate the database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, LedgerError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let store = RecordStore::init(&db_url).await?;
        info!(database = database_path, "database ready");
        Ok(Self::new(store))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, LedgerError> {
        let db_url = format!("sqlite:{}", database_path);
        let store = RecordStore::connect(&db_url).await?;
        Ok(Self::new(store))
    }

    pub fn trips(&self) -> &TripLedger {
        &self.trips
    }

    pub fn maintenance(&self) -> &MaintenanceLedger {
        &self.maintenance
    }

    pub fn inventory(&self) -> &InventoryLedger {
        &self.inventory
    }

    /// Mutable access, for changing the low-stock threshold.
    pub fn inventory_mut(&mut self) -> &mut InventoryLedger {
        &mut self.inventory
    }

    pub fn customers(&self) -> &CustomerLedger {
        &self.customers
    }

    pub fn driver_payments(&self) -> &DriverPayments {
        &self.driver_payments
    }

    /// Trip, fuel and maintenance totals across the whole business.
    pub async fn summary(&self) -> Result<FleetSummary, LedgerError> {
        let trips = self
            .store
            .column_sums::<Trip>(&["income_cents", "fuel_cents"])
            .await?;
        let maintenance = self
            .store
            .column_sums::<MaintenanceRecord>(&["cost_cents"])
            .await?;

        let (total_income, total_fuel) = (trips.sums[0], trips.sums[1]);
        let maintenance_cost = maintenance.sums[0];

        let gross = sub_cents(total_income, total_fuel, "net profit")?;
        let net_profit = sub_cents(gross, maintenance_cost, "net profit")?;

        Ok(FleetSummary {
            trip_count: trips.count,
            total_income,
            total_fuel,
            maintenance_count: maintenance.count,
            maintenance_cost,
            net_profit,
        })
    }

    /// Copy the database into `dir` under a timestamped name and return the new path.
    pub async fn backup(&self, dir: &Path) -> Result<PathBuf, LedgerError> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create backup directory {}", dir.display()))
            .map_err(LedgerError::StoreUnavailable)?;

        let file_name = format!(
            "haulage_backup_{}.db",
            Local::now().format("%Y%m%d_%H%M%S")
        );
        let path = dir.join(file_name);

        self.store.backup_to(&path).await?;
        info!(path = %path.display(), "database backed up");
        Ok(path)
    }
}
