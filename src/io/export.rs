use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{
    CustomerTransaction, InventoryItem, MaintenanceRecord, Record, Trip, format_cents,
};

/// Database snapshot for full export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub trips: Vec<Record<Trip>>,
    pub maintenance: Vec<Record<MaintenanceRecord>>,
    pub inventory: Vec<Record<InventoryItem>>,
    pub customer_transactions: Vec<Record<CustomerTransaction>>,
}

/// Writes already-computed ledger rows out as CSV or JSON.
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export trips to CSV format
    pub async fn export_trips_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let trips = self.service.trips().list().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id", "date", "client", "cargo", "route", "income", "fuel", "driver",
        ])?;

        for trip in &trips {
            let t = &trip.data;
            csv_writer.write_record([
                trip.id.to_string(),
                t.date.clone(),
                t.client.clone(),
                t.cargo.clone(),
                t.route.clone(),
                format_cents(t.income_cents),
                format_cents(t.fuel_cents),
                t.driver.clone(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(trips.len())
    }

    /// Export maintenance records to CSV format
    pub async fn export_maintenance_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let records = self.service.maintenance().list().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "plate", "service_date", "description", "cost"])?;

        for record in &records {
            let m = &record.data;
            csv_writer.write_record([
                record.id.to_string(),
                m.plate.clone(),
                m.service_date.clone(),
                m.description.clone(),
                format_cents(m.cost_cents),
            ])?;
        }

        csv_writer.flush()?;
        Ok(records.len())
    }

    /// Export inventory with status and stock value to CSV format
    pub async fn export_inventory_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let items = self.service.inventory().list().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "name",
            "quantity",
            "purchase_price",
            "sale_price",
            "total_value",
            "status",
        ])?;

        for stocked in &items {
            let item = &stocked.item;
            csv_writer.write_record([
                stocked.id.to_string(),
                item.name.clone(),
                item.quantity.to_string(),
                format_cents(item.purchase_price_cents),
                format_cents(item.sale_price_cents),
                format_cents(stocked.total_value_cents),
                stocked.status.to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(items.len())
    }

    /// Export customer transactions to CSV format
    pub async fn export_customer_transactions_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let transactions = self.service.customers().list().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "customer", "date", "amount_owed", "amount_paid", "balance"])?;

        for tx in &transactions {
            let c = &tx.data;
            csv_writer.write_record([
                tx.id.to_string(),
                c.customer.clone(),
                c.date.clone(),
                format_cents(c.owed_cents),
                format_cents(c.paid_cents),
                format_cents(c.balance_cents()),
            ])?;
        }

        csv_writer.flush()?;
        Ok(transactions.len())
    }

    /// Export non-zero customer balances to CSV format
    pub async fn export_balances_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let balances = self.service.customers().balances().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["customer", "balance"])?;

        for entry in &balances {
            csv_writer.write_record([entry.customer.clone(), format_cents(entry.balance)])?;
        }

        csv_writer.flush()?;
        Ok(balances.len())
    }

    /// Export driver payments to CSV format, with the TOTAL line last.
    /// Returns the number of driver rows, not counting the total.
    pub async fn export_driver_payments_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let report = self.service.driver_payments().compute().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["driver", "trips", "income", "fuel", "net_payment"])?;

        for line in report.lines() {
            let (income, fuel, net) = line.amounts();
            csv_writer.write_record([
                line.label().to_string(),
                line.trip_count().to_string(),
                format_cents(income),
                format_cents(fuel),
                format_cents(net),
            ])?;
        }

        csv_writer.flush()?;
        Ok(report.drivers.len())
    }

    /// Export all four tables as a JSON snapshot
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<DatabaseSnapshot> {
        let snapshot = DatabaseSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            trips: self.service.trips().list().await?,
            maintenance: self.service.maintenance().list().await?,
            inventory: self
                .service
                .inventory()
                .list()
                .await?
                .into_iter()
                .map(|stocked| Record {
                    id: stocked.id,
                    data: stocked.item,
                })
                .collect(),
            customer_transactions: self.service.customers().list().await?,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
