//! Entity schemas and the shared two-phase validation.
//!
//! Every ledger manages one entity type. The entity describes itself through
//! [`EntitySchema`]: which table it lives in, which columns it writes, how it
//! is listed, whether one of its columns must be unique, and how raw form
//! input turns into a validated value.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Cents, parse_cents};

/// Store-assigned row identifier. Monotonically increasing, never reused.
pub type RecordId = i64;

/// A persisted entity together with its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record<E> {
    pub id: RecordId,
    #[serde(flatten)]
    pub data: E,
}

/// A value bound into a write statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
}

/// One term of an `ORDER BY` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: &'static str,
    pub descending: bool,
}

impl OrderBy {
    pub const fn asc(column: &'static str) -> Self {
        Self {
            column,
            descending: false,
        }
    }

    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            descending: true,
        }
    }
}

/// Capability description of a ledger entity.
///
/// `COLUMNS` and [`EntitySchema::values`] must agree in length and order;
/// the store binds them positionally.
pub trait EntitySchema: Sized + Clone + Send + Sync + Unpin + 'static {
    /// Raw, unvalidated input as typed by a user.
    type Input;

    /// Backing table.
    const TABLE: &'static str;
    /// Singular name used in messages.
    const NAME: &'static str;
    /// Writable columns, excluding `id`.
    const COLUMNS: &'static [&'static str];
    /// Default listing order. `id` is always appended as the final tie-break.
    const ORDER_BY: &'static [OrderBy];
    /// Column whose value must be unique across rows.
    const UNIQUE_COLUMN: Option<&'static str> = None;

    /// Run presence and type/range checks, producing a value ready to write.
    fn validate(input: &Self::Input) -> Result<Self, ValidationError>;

    /// Column values in `COLUMNS` order.
    fn values(&self) -> Vec<FieldValue>;

    /// Value of `UNIQUE_COLUMN` for this record.
    fn unique_value(&self) -> Option<&str> {
        None
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid number for {0}")]
    InvalidNumber(&'static str),

    #[error("Invalid low-stock threshold {0}: must be zero or greater")]
    InvalidThreshold(i64),

    #[error("An item named '{0}' already exists")]
    DuplicateName(String),
}

/// Phase one: every field must be non-empty after trimming.
/// Fields are checked in order and the first missing one is reported.
pub fn require_present(fields: &[(&'static str, &str)]) -> Result<(), ValidationError> {
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((name, _)) => Err(ValidationError::MissingField(name)),
        None => Ok(()),
    }
}

/// Trimmed copy of a text field.
pub fn text(value: &str) -> String {
    value.trim().to_string()
}

/// Phase two: a signed decimal amount.
pub fn amount(field: &'static str, value: &str) -> Result<Cents, ValidationError> {
    parse_cents(value).map_err(|_| ValidationError::InvalidNumber(field))
}

/// Phase two: a decimal amount that may not be negative.
pub fn non_negative_amount(field: &'static str, value: &str) -> Result<Cents, ValidationError> {
    match amount(field, value)? {
        cents if cents < 0 => Err(ValidationError::InvalidNumber(field)),
        cents => Ok(cents),
    }
}

/// Phase two: a whole quantity that may not be negative.
pub fn quantity(field: &'static str, value: &str) -> Result<i64, ValidationError> {
    match value.trim().parse::<i64>() {
        Ok(n) if n >= 0 => Ok(n),
        _ => Err(ValidationError::InvalidNumber(field)),
    }
}
