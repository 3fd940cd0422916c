use serde::{Deserialize, Serialize};

use super::schema::{self, EntitySchema, FieldValue, OrderBy, ValidationError};
use super::Cents;

/// One charge and/or payment on a customer's account.
///
/// Either amount may be zero; a pure payment has `owed_cents == 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerTransaction {
    pub customer: String,
    pub date: String,
    pub owed_cents: Cents,
    pub paid_cents: Cents,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerTransactionInput {
    pub customer: String,
    pub date: String,
    pub owed: String,
    pub paid: String,
}

impl CustomerTransaction {
    /// Positive when the customer owes the business.
    pub fn balance_cents(&self) -> Cents {
        self.owed_cents - self.paid_cents
    }
}

impl EntitySchema for CustomerTransaction {
    type Input = CustomerTransactionInput;

    const TABLE: &'static str = "customer_transactions";
    const NAME: &'static str = "Customer transaction";
    const COLUMNS: &'static [&'static str] =
        &["customer_name", "date", "amount_owed_cents", "amount_paid_cents"];
    const ORDER_BY: &'static [OrderBy] = &[OrderBy::desc("date")];

    fn validate(input: &CustomerTransactionInput) -> Result<Self, ValidationError> {
        schema::require_present(&[
            ("customer", &input.customer),
            ("date", &input.date),
            ("amount owed", &input.owed),
            ("amount paid", &input.paid),
        ])?;

        Ok(CustomerTransaction {
            customer: schema::text(&input.customer),
            date: schema::text(&input.date),
            owed_cents: schema::amount("amount owed", &input.owed)?,
            paid_cents: schema::amount("amount paid", &input.paid)?,
        })
    }

    fn values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Text(self.customer.clone()),
            FieldValue::Text(self.date.clone()),
            FieldValue::Integer(self.owed_cents),
            FieldValue::Integer(self.paid_cents),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_sign_convention() {
        let charge = CustomerTransaction {
            customer: "ABC Shipping".into(),
            date: "2024-05-01".into(),
            owed_cents: 250000,
            paid_cents: 150000,
        };
        assert_eq!(charge.balance_cents(), 100000);

        let overpayment = CustomerTransaction {
            paid_cents: 300000,
            ..charge
        };
        assert_eq!(overpayment.balance_cents(), -50000);
    }

    #[test]
    fn test_zero_amounts_are_present() {
        let input = CustomerTransactionInput {
            customer: "A".into(),
            date: "2024-05-01".into(),
            owed: "0".into(),
            paid: "60".into(),
        };
        let tx = CustomerTransaction::validate(&input).unwrap();
        assert_eq!(tx.owed_cents, 0);
        assert_eq!(tx.paid_cents, 6000);
    }
}
