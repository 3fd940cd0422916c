use serde::{Deserialize, Serialize};

use crate::domain::{AmountOverflow, Cents, add_cents};

/// Net position of one customer across all their transactions.
/// Positive means the customer owes the business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerBalance {
    pub customer: String,
    pub balance: Cents,
}

/// What one driver's trips brought in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverPayment {
    pub driver: String,
    pub trip_count: i64,
    pub total_income: Cents,
    pub total_fuel: Cents,
    pub net_payment: Cents,
}

/// Sum over every driver row of a [`DriverPaymentReport`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTotals {
    pub trip_count: i64,
    pub total_income: Cents,
    pub total_fuel: Cents,
    pub net_payment: Cents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverPaymentReport {
    /// Highest net payment first.
    pub drivers: Vec<DriverPayment>,
    pub total: PaymentTotals,
}

/// One display line of a [`DriverPaymentReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentLine<'a> {
    Driver(&'a DriverPayment),
    Total(&'a PaymentTotals),
}

impl PaymentLine<'_> {
    pub const TOTAL_LABEL: &'static str = "TOTAL";

    pub fn label(&self) -> &str {
        match self {
            PaymentLine::Driver(payment) => &payment.driver,
            PaymentLine::Total(_) => Self::TOTAL_LABEL,
        }
    }

    pub fn trip_count(&self) -> i64 {
        match self {
            PaymentLine::Driver(payment) => payment.trip_count,
            PaymentLine::Total(total) => total.trip_count,
        }
    }

    pub fn amounts(&self) -> (Cents, Cents, Cents) {
        match self {
            PaymentLine::Driver(p) => (p.total_income, p.total_fuel, p.net_payment),
            PaymentLine::Total(t) => (t.total_income, t.total_fuel, t.net_payment),
        }
    }

    pub fn is_total(&self) -> bool {
        matches!(self, PaymentLine::Total(_))
    }
}

impl DriverPaymentReport {
    /// Build the report from unordered per-driver rows.
    pub fn from_drivers(mut drivers: Vec<DriverPayment>) -> Result<Self, AmountOverflow> {
        drivers.sort_by(|a, b| {
            b.net_payment
                .cmp(&a.net_payment)
                .then_with(|| a.driver.cmp(&b.driver))
        });

        let total = drivers
            .iter()
            .try_fold(PaymentTotals::default(), |acc, p| {
                Ok::<_, AmountOverflow>(PaymentTotals {
                    trip_count: acc.trip_count + p.trip_count,
                    total_income: add_cents(acc.total_income, p.total_income, "total income")?,
                    total_fuel: add_cents(acc.total_fuel, p.total_fuel, "total fuel")?,
                    net_payment: add_cents(acc.net_payment, p.net_payment, "total net payment")?,
                })
            })?;

        Ok(Self { drivers, total })
    }

    /// Driver rows followed by the total line.
    pub fn lines(&self) -> impl Iterator<Item = PaymentLine<'_>> {
        self.drivers
            .iter()
            .map(PaymentLine::Driver)
            .chain(std::iter::once(PaymentLine::Total(&self.total)))
    }
}

/// Whole-business totals for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetSummary {
    pub trip_count: i64,
    pub total_income: Cents,
    pub total_fuel: Cents,
    pub maintenance_count: i64,
    pub maintenance_cost: Cents,
    /// Income less fuel and maintenance.
    pub net_profit: Cents,
}
