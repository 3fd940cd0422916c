use serde::{Deserialize, Serialize};

use super::schema::{self, EntitySchema, FieldValue, OrderBy, ValidationError};
use super::Cents;

/// A service performed on one vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub plate: String,
    pub service_date: String,
    pub description: String,
    pub cost_cents: Cents,
}

#[derive(Debug, Clone, Default)]
pub struct MaintenanceInput {
    pub plate: String,
    pub service_date: String,
    pub description: String,
    pub cost: String,
}

impl EntitySchema for MaintenanceRecord {
    type Input = MaintenanceInput;

    const TABLE: &'static str = "maintenance";
    const NAME: &'static str = "Maintenance record";
    const COLUMNS: &'static [&'static str] = &[
        "vehicle_plate_number",
        "service_date",
        "description",
        "cost_cents",
    ];
    const ORDER_BY: &'static [OrderBy] = &[OrderBy::desc("service_date")];

    fn validate(input: &MaintenanceInput) -> Result<Self, ValidationError> {
        schema::require_present(&[
            ("plate", &input.plate),
            ("service date", &input.service_date),
            ("description", &input.description),
            ("cost", &input.cost),
        ])?;

        Ok(MaintenanceRecord {
            plate: schema::text(&input.plate),
            service_date: schema::text(&input.service_date),
            description: schema::text(&input.description),
            cost_cents: schema::non_negative_amount("cost", &input.cost)?,
        })
    }

    fn values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Text(self.plate.clone()),
            FieldValue::Text(self.service_date.clone()),
            FieldValue::Text(self.description.clone()),
            FieldValue::Integer(self.cost_cents),
        ]
    }
}
