use std::marker::PhantomData;

use tracing::debug;

use crate::domain::{
    CustomerTransaction, EntitySchema, MaintenanceRecord, Record, RecordId, Trip, ValidationError,
};
use crate::storage::{Persisted, RecordStore};

use super::LedgerError;

pub type TripLedger = Ledger<Trip>;
pub type MaintenanceLedger = Ledger<MaintenanceRecord>;
pub type CustomerTransactions = Ledger<CustomerTransaction>;

/// CRUD over one entity table.
///
/// Writes are validated before they reach the store and each call is a
/// single statement. Updates replace the whole record.
pub struct Ledger<E> {
    store: RecordStore,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Ledger<E> {
    fn clone(&self) -> Self {
        Self::new(self.store.clone())
    }
}

impl<E> Ledger<E> {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }
}

impl<E: Persisted> Ledger<E> {
    /// Validate input without touching the store.
    pub fn validate(&self, input: &E::Input) -> Result<E, ValidationError> {
        E::validate(input)
    }

    pub async fn add(&self, input: &E::Input) -> Result<Record<E>, LedgerError> {
        let data = E::validate(input)?;
        self.ensure_unique(&data, None).await?;

        let id = self.store.create(&data).await?;
        debug!(table = E::TABLE, id, "record added");

        Ok(Record { id, data })
    }

    pub async fn update(&self, id: RecordId, input: &E::Input) -> Result<Record<E>, LedgerError> {
        let data = E::validate(input)?;
        self.ensure_unique(&data, Some(id)).await?;

        self.store.update(id, &data).await?;
        debug!(table = E::TABLE, id, "record updated");

        Ok(Record { id, data })
    }

    pub async fn delete(&self, id: RecordId) -> Result<(), LedgerError> {
        self.store.delete::<E>(id).await?;
        debug!(table = E::TABLE, id, "record deleted");
        Ok(())
    }

    pub async fn get(&self, id: RecordId) -> Result<Record<E>, LedgerError> {
        Ok(self.store.get(id).await?)
    }

    /// All records in the entity's default order.
    pub async fn list(&self) -> Result<Vec<Record<E>>, LedgerError> {
        Ok(self.store.list().await?)
    }

    async fn ensure_unique(&self, data: &E, excluding: Option<RecordId>) -> Result<(), LedgerError> {
        let (Some(column), Some(value)) = (E::UNIQUE_COLUMN, data.unique_value()) else {
            return Ok(());
        };

        if self
            .store
            .find_duplicate::<E>(column, value, excluding)
            .await?
            .is_some()
        {
            return Err(ValidationError::DuplicateName(value.to_string()).into());
        }
        Ok(())
    }
}
