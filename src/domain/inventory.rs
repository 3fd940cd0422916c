use std::fmt;

use serde::{Deserialize, Serialize};

use super::schema::{self, EntitySchema, FieldValue, OrderBy, RecordId, ValidationError};
use super::{AmountOverflow, Cents};

/// Quantity at or below which an item is flagged when no threshold is configured.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    pub quantity: i64,
    pub purchase_price_cents: Cents,
    pub sale_price_cents: Cents,
}

#[derive(Debug, Clone, Default)]
pub struct InventoryInput {
    pub name: String,
    pub quantity: String,
    pub purchase_price: String,
    pub sale_price: String,
}

impl InventoryItem {
    /// Stock value at purchase price, `None` if it does not fit in [`Cents`].
    pub fn total_value_cents(&self) -> Option<Cents> {
        self.quantity.checked_mul(self.purchase_price_cents)
    }
}

impl EntitySchema for InventoryItem {
    type Input = InventoryInput;

    const TABLE: &'static str = "inventory";
    const NAME: &'static str = "Inventory item";
    const COLUMNS: &'static [&'static str] = &[
        "item_name",
        "quantity",
        "purchase_price_cents",
        "sale_price_cents",
    ];
    const ORDER_BY: &'static [OrderBy] = &[OrderBy::asc("item_name")];
    const UNIQUE_COLUMN: Option<&'static str> = Some("item_name");

    fn validate(input: &InventoryInput) -> Result<Self, ValidationError> {
        schema::require_present(&[
            ("name", &input.name),
            ("quantity", &input.quantity),
            ("purchase price", &input.purchase_price),
            ("sale price", &input.sale_price),
        ])?;

        let item = InventoryItem {
            name: schema::text(&input.name),
            quantity: schema::quantity("quantity", &input.quantity)?,
            purchase_price_cents: schema::non_negative_amount(
                "purchase price",
                &input.purchase_price,
            )?,
            sale_price_cents: schema::non_negative_amount("sale price", &input.sale_price)?,
        };

        // Stock value must stay representable.
        if item.total_value_cents().is_none() {
            return Err(ValidationError::InvalidNumber("quantity"));
        }
        Ok(item)
    }

    fn values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Text(self.name.clone()),
            FieldValue::Integer(self.quantity),
            FieldValue::Integer(self.purchase_price_cents),
            FieldValue::Integer(self.sale_price_cents),
        ]
    }

    fn unique_value(&self) -> Option<&str> {
        Some(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StockStatus {
    Low,
    Ok,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Low => "LOW",
            StockStatus::Ok => "OK",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Low-stock classification rule. Lives with the ledger instance that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockPolicy {
    threshold: i64,
}

impl Default for StockPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

impl StockPolicy {
    pub fn new(threshold: i64) -> Result<Self, ValidationError> {
        if threshold < 0 {
            return Err(ValidationError::InvalidThreshold(threshold));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    /// `quantity <= threshold` is low; the boundary itself counts as low.
    pub fn classify(&self, quantity: i64) -> StockStatus {
        if quantity <= self.threshold {
            StockStatus::Low
        } else {
            StockStatus::Ok
        }
    }
}

/// An inventory item annotated for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockedItem {
    pub id: RecordId,
    #[serde(flatten)]
    pub item: InventoryItem,
    pub total_value_cents: Cents,
    pub status: StockStatus,
}

impl StockedItem {
    pub fn new(
        id: RecordId,
        item: InventoryItem,
        policy: &StockPolicy,
    ) -> Result<Self, AmountOverflow> {
        Ok(Self {
            id,
            total_value_cents: item
                .total_value_cents()
                .ok_or(AmountOverflow("stock value"))?,
            status: policy.classify(item.quantity),
            item,
        })
    }

    pub fn is_low(&self) -> bool {
        self.status == StockStatus::Low
    }
}

/// Non-blocking advisory raised after a write leaves an item at or below the threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowStockWarning {
    pub item_name: String,
    pub quantity: i64,
    pub threshold: i64,
}

impl fmt::Display for LowStockWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Low stock: '{}' has {} unit(s) left (threshold {})",
            self.item_name, self.quantity, self.threshold
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i64) -> InventoryItem {
        InventoryItem {
            name: "Engine Oil".into(),
            quantity,
            purchase_price_cents: 1500,
            sale_price_cents: 2200,
        }
    }

    #[test]
    fn test_default_threshold_is_five() {
        assert_eq!(StockPolicy::default().threshold(), 5);
    }

    #[test]
    fn test_threshold_boundary_is_low() {
        let policy = StockPolicy::default();
        assert_eq!(policy.classify(3), StockStatus::Low);
        assert_eq!(policy.classify(5), StockStatus::Low);
        assert_eq!(policy.classify(6), StockStatus::Ok);
        assert_eq!(policy.classify(10), StockStatus::Ok);
    }

    #[test]
    fn test_negative_threshold_rejected() {
        assert_eq!(
            StockPolicy::new(-1),
            Err(ValidationError::InvalidThreshold(-1))
        );
        assert_eq!(StockPolicy::new(0).unwrap().classify(0), StockStatus::Low);
    }

    #[test]
    fn test_stocked_item_total_value() {
        let stocked = StockedItem::new(1, item(24), &StockPolicy::default()).unwrap();
        assert_eq!(stocked.total_value_cents, 36000);
        assert!(!stocked.is_low());
    }

    #[test]
    fn test_unrepresentable_stock_value() {
        let mut huge = item(i64::MAX / 1000);
        huge.purchase_price_cents = 1001;
        assert_eq!(huge.total_value_cents(), None);
        assert_eq!(
            StockedItem::new(1, huge, &StockPolicy::default()),
            Err(AmountOverflow("stock value"))
        );

        let input = InventoryInput {
            name: "Bulk Bolts".into(),
            quantity: "9223372036854776".into(),
            purchase_price: "10.00".into(),
            sale_price: "12".into(),
        };
        assert_eq!(
            InventoryItem::validate(&input),
            Err(ValidationError::InvalidNumber("quantity"))
        );
    }

    #[test]
    fn test_quantity_must_be_integral() {
        let input = InventoryInput {
            name: "Air Filter".into(),
            quantity: "1.5".into(),
            purchase_price: "10".into(),
            sale_price: "18".into(),
        };
        assert_eq!(
            InventoryItem::validate(&input),
            Err(ValidationError::InvalidNumber("quantity"))
        );
    }

    #[test]
    fn test_status_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&StockStatus::Low).unwrap(), "\"LOW\"");
    }
}
