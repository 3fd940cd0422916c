use crate::domain::{Trip, sub_cents};
use crate::storage::RecordStore;

use super::{DriverPayment, DriverPaymentReport, LedgerError};

/// Read-only view of what each driver's trips earned.
#[derive(Clone)]
pub struct DriverPayments {
    store: RecordStore,
}

impl DriverPayments {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Group every trip by driver. Recomputed from the trip rows on every call.
    pub async fn compute(&self) -> Result<DriverPaymentReport, LedgerError> {
        let groups = self
            .store
            .group_sums::<Trip>("driver_name", &["income_cents", "fuel_cents"])
            .await?;

        let drivers = groups
            .into_iter()
            .map(|group| -> Result<DriverPayment, LedgerError> {
                let (income, fuel) = (group.totals.sums[0], group.totals.sums[1]);
                Ok(DriverPayment {
                    driver: group.key,
                    trip_count: group.totals.count,
                    total_income: income,
                    total_fuel: fuel,
                    net_payment: sub_cents(income, fuel, "driver net payment")?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DriverPaymentReport::from_drivers(drivers)?)
    }
}
