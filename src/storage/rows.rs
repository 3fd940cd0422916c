//! Row decoding for every persisted entity.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use crate::domain::{CustomerTransaction, InventoryItem, MaintenanceRecord, Record, Trip};

impl<'r, E> FromRow<'r, SqliteRow> for Record<E>
where
    E: FromRow<'r, SqliteRow>,
{
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Record {
            id: row.try_get("id")?,
            data: E::from_row(row)?,
        })
    }
}

impl FromRow<'_, SqliteRow> for Trip {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Trip {
            date: row.try_get("date")?,
            client: row.try_get("client_name")?,
            cargo: row.try_get("cargo_type")?,
            route: row.try_get("route")?,
            income_cents: row.try_get("income_cents")?,
            fuel_cents: row.try_get("fuel_cents")?,
            driver: row.try_get("driver_name")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for MaintenanceRecord {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(MaintenanceRecord {
            plate: row.try_get("vehicle_plate_number")?,
            service_date: row.try_get("service_date")?,
            description: row.try_get("description")?,
            cost_cents: row.try_get("cost_cents")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for InventoryItem {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(InventoryItem {
            name: row.try_get("item_name")?,
            quantity: row.try_get("quantity")?,
            purchase_price_cents: row.try_get("purchase_price_cents")?,
            sale_price_cents: row.try_get("sale_price_cents")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for CustomerTransaction {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(CustomerTransaction {
            customer: row.try_get("customer_name")?,
            date: row.try_get("date")?,
            owed_cents: row.try_get("amount_owed_cents")?,
            paid_cents: row.try_get("amount_paid_cents")?,
        })
    }
}
