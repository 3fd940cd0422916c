use serde::{Deserialize, Serialize};

use super::schema::{self, EntitySchema, FieldValue, OrderBy, ValidationError};
use super::Cents;

/// A completed haul: who it was for, what was carried, and what it earned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub date: String,
    pub client: String,
    pub cargo: String,
    pub route: String,
    pub income_cents: Cents,
    pub fuel_cents: Cents,
    pub driver: String,
}

/// Trip fields as entered, before validation.
#[derive(Debug, Clone, Default)]
pub struct TripInput {
    pub date: String,
    pub client: String,
    pub cargo: String,
    pub route: String,
    pub income: String,
    pub fuel: String,
    pub driver: String,
}

impl Trip {
    /// Income left after fuel.
    pub fn net_cents(&self) -> Cents {
        self.income_cents - self.fuel_cents
    }
}

impl EntitySchema for Trip {
    type Input = TripInput;

    const TABLE: &'static str = "trips";
    const NAME: &'static str = "Trip";
    const COLUMNS: &'static [&'static str] = &[
        "date",
        "client_name",
        "cargo_type",
        "route",
        "income_cents",
        "fuel_cents",
        "driver_name",
    ];
    const ORDER_BY: &'static [OrderBy] = &[OrderBy::desc("date")];

    fn validate(input: &TripInput) -> Result<Self, ValidationError> {
        schema::require_present(&[
            ("date", &input.date),
            ("client", &input.client),
            ("cargo", &input.cargo),
            ("route", &input.route),
            ("income", &input.income),
            ("fuel expense", &input.fuel),
            ("driver", &input.driver),
        ])?;

        Ok(Trip {
            date: schema::text(&input.date),
            client: schema::text(&input.client),
            cargo: schema::text(&input.cargo),
            route: schema::text(&input.route),
            income_cents: schema::non_negative_amount("income", &input.income)?,
            fuel_cents: schema::non_negative_amount("fuel expense", &input.fuel)?,
            driver: schema::text(&input.driver),
        })
    }

    fn values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Text(self.date.clone()),
            FieldValue::Text(self.client.clone()),
            FieldValue::Text(self.cargo.clone()),
            FieldValue::Text(self.route.clone()),
            FieldValue::Integer(self.income_cents),
            FieldValue::Integer(self.fuel_cents),
            FieldValue::Text(self.driver.clone()),
        ]
    }
}
