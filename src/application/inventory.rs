use tracing::{debug, warn};

use crate::domain::{
    InventoryInput, InventoryItem, LowStockWarning, Record, RecordId, StockPolicy, StockedItem,
    ValidationError,
};
use crate::storage::RecordStore;

use super::{Ledger, LedgerError};

/// Result of an inventory add or update.
#[derive(Debug, Clone)]
pub struct InventoryWrite {
    pub item: StockedItem,
    /// Set when the written quantity is at or below the threshold.
    /// Advisory only: the write has already happened.
    pub low_stock: Option<LowStockWarning>,
}

/// Inventory CRUD plus the low-stock policy.
///
/// The threshold belongs to this instance and is never persisted.
#[derive(Clone)]
pub struct InventoryLedger {
    items: Ledger<InventoryItem>,
    policy: StockPolicy,
}

impl InventoryLedger {
    pub fn new(store: RecordStore) -> Self {
        Self {
            items: Ledger::new(store),
            policy: StockPolicy::default(),
        }
    }

    pub fn with_threshold(store: RecordStore, threshold: i64) -> Result<Self, ValidationError> {
        Ok(Self {
            items: Ledger::new(store),
            policy: StockPolicy::new(threshold)?,
        })
    }

    pub fn threshold(&self) -> i64 {
        self.policy.threshold()
    }

    pub fn set_threshold(&mut self, threshold: i64) -> Result<(), ValidationError> {
        self.policy = StockPolicy::new(threshold)?;
        debug!(threshold, "low-stock threshold changed");
        Ok(())
    }

    pub fn validate(&self, input: &InventoryInput) -> Result<InventoryItem, ValidationError> {
        self.items.validate(input)
    }

    pub async fn add(&self, input: &InventoryInput) -> Result<InventoryWrite, LedgerError> {
        let record = self.items.add(input).await?;
        self.written(record)
    }

    pub async fn update(
        &self,
        id: RecordId,
        input: &InventoryInput,
    ) -> Result<InventoryWrite, LedgerError> {
        let record = self.items.update(id, input).await?;
        self.written(record)
    }

    pub async fn delete(&self, id: RecordId) -> Result<(), LedgerError> {
        self.items.delete(id).await
    }

    pub async fn get(&self, id: RecordId) -> Result<StockedItem, LedgerError> {
        let record = self.items.get(id).await?;
        self.annotate(record)
    }

    /// Every item by name, annotated with status and total value.
    pub async fn list(&self) -> Result<Vec<StockedItem>, LedgerError> {
        let records = self.items.list().await?;
        records.into_iter().map(|r| self.annotate(r)).collect()
    }

    /// Items currently at or below the threshold. Read-only.
    pub async fn check_low_stock(&self) -> Result<Vec<StockedItem>, LedgerError> {
        let mut items = self.list().await?;
        items.retain(StockedItem::is_low);
        Ok(items)
    }

    fn annotate(&self, record: Record<InventoryItem>) -> Result<StockedItem, LedgerError> {
        Ok(StockedItem::new(record.id, record.data, &self.policy)?)
    }

    fn written(&self, record: Record<InventoryItem>) -> Result<InventoryWrite, LedgerError> {
        let item = self.annotate(record)?;
        let low_stock = item.is_low().then(|| LowStockWarning {
            item_name: item.item.name.clone(),
            quantity: item.item.quantity,
            threshold: self.policy.threshold(),
        });

        if let Some(warning) = &low_stock {
            warn!(id = item.id, "{}", warning);
        }

        Ok(InventoryWrite { item, low_stock })
    }
}
