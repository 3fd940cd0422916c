use crate::domain::{
    CustomerTransaction, CustomerTransactionInput, Record, RecordId, ValidationError, sub_cents,
};
use crate::storage::RecordStore;

use super::{CustomerBalance, CustomerTransactions, LedgerError};

/// Customer charges and payments, plus per-customer balances derived from them.
#[derive(Clone)]
pub struct CustomerLedger {
    transactions: CustomerTransactions,
    store: RecordStore,
}

impl CustomerLedger {
    pub fn new(store: RecordStore) -> Self {
        Self {
            transactions: CustomerTransactions::new(store.clone()),
            store,
        }
    }

    pub fn validate(
        &self,
        input: &CustomerTransactionInput,
    ) -> Result<CustomerTransaction, ValidationError> {
        self.transactions.validate(input)
    }

    pub async fn add(
        &self,
        input: &CustomerTransactionInput,
    ) -> Result<Record<CustomerTransaction>, LedgerError> {
        self.transactions.add(input).await
    }

    pub async fn update(
        &self,
        id: RecordId,
        input: &CustomerTransactionInput,
    ) -> Result<Record<CustomerTransaction>, LedgerError> {
        self.transactions.update(id, input).await
    }

    pub async fn delete(&self, id: RecordId) -> Result<(), LedgerError> {
        self.transactions.delete(id).await
    }

    pub async fn get(&self, id: RecordId) -> Result<Record<CustomerTransaction>, LedgerError> {
        self.transactions.get(id).await
    }

    /// Transactions, most recent date first.
    pub async fn list(&self) -> Result<Vec<Record<CustomerTransaction>>, LedgerError> {
        self.transactions.list().await
    }

    /// Σowed − Σpaid per customer, largest debt first.
    ///
    /// Customers whose balance is exactly zero are left out. Recomputed from
    /// the raw rows on every call.
    pub async fn balances(&self) -> Result<Vec<CustomerBalance>, LedgerError> {
        let groups = self
            .store
            .group_sums::<CustomerTransaction>(
                "customer_name",
                &["amount_owed_cents", "amount_paid_cents"],
            )
            .await?;

        let mut balances = Vec::new();
        for group in groups {
            let (owed, paid) = (group.totals.sums[0], group.totals.sums[1]);
            let balance = sub_cents(owed, paid, "customer balance")?;
            if balance != 0 {
                balances.push(CustomerBalance {
                    customer: group.key,
                    balance,
                });
            }
        }

        balances.sort_by(|a, b| {
            b.balance
                .cmp(&a.balance)
                .then_with(|| a.customer.cmp(&b.customer))
        });

        Ok(balances)
    }
}
