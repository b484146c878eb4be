//! Bills

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier for a bill line item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Creates an item id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A single line item on a bill. Immutable once entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillItem {
    /// Unique id within the bill.
    pub id: ItemId,
    /// Display name, as captured or entered.
    pub name: String,
    /// Non-negative price of the item.
    pub amount: Decimal,
    /// Free-form category label (`"food"`, `"drinks"`, ...).
    #[serde(default)]
    pub category: String,
}

impl BillItem {
    /// Creates a line item.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        amount: Decimal,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: ItemId::new(id),
            name: name.into(),
            amount,
            category: category.into(),
        }
    }
}

/// A discount recorded on a bill.
///
/// A bill may hold several discounts; they apply independently and their
/// effective amounts are summed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Discount {
    /// Percentage off every member's item shares.
    Percentage {
        /// Percent of the total shared base, `0..=100`.
        percent: Decimal,
    },
    /// Fixed amount off the bill.
    Flat {
        /// Absolute amount, not scaled.
        amount: Decimal,
    },
    /// Percentage off items in a single category.
    Category {
        /// Category the discount is restricted to.
        category: String,
        /// Percent of the matching-category base, `0..=100`.
        percent: Decimal,
    },
}

impl Discount {
    /// Nominal value of the discount against the given items, ignoring
    /// member assignment. Used only for the derived bill total.
    pub(crate) fn face_value(&self, items: &[BillItem]) -> Decimal {
        match self {
            Discount::Percentage { percent } => {
                let total: Decimal = items.iter().map(|item| item.amount).sum();
                total * *percent / Decimal::ONE_HUNDRED
            }
            Discount::Flat { amount } => *amount,
            Discount::Category { category, percent } => {
                let total: Decimal = items
                    .iter()
                    .filter(|item| &item.category == category)
                    .map(|item| item.amount)
                    .sum();
                total * *percent / Decimal::ONE_HUNDRED
            }
        }
    }
}

/// A captured bill, already normalized by whatever entered it (manual entry
/// or OCR).
///
/// `grand_total` is a persisted snapshot the engine trusts for payment
/// reconciliation; member-level totals are always computed independently
/// from items, discounts, taxes and tips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillData {
    /// Line items, in bill order.
    pub items: Vec<BillItem>,
    /// Recorded subtotal of all items.
    pub subtotal: Decimal,
    /// Aggregate tax amount for the whole bill.
    #[serde(default)]
    pub taxes: Decimal,
    /// Discounts, applied independently.
    #[serde(default)]
    pub discounts: Vec<Discount>,
    /// Tip amount.
    #[serde(default)]
    pub tips: Decimal,
    /// Service charges, pooled with tips during allocation.
    #[serde(default)]
    pub service_charges: Decimal,
    /// Snapshot of the bill total, when one was recorded.
    #[serde(default)]
    pub grand_total: Option<Decimal>,
}

impl BillData {
    /// The total a single payer is credited with: the recorded grand total
    /// when present, otherwise one derived from the bill's parts.
    pub fn recorded_total(&self) -> Decimal {
        self.grand_total.unwrap_or_else(|| {
            let discounts: Decimal = self
                .discounts
                .iter()
                .map(|discount| discount.face_value(&self.items))
                .sum();

            self.subtotal + self.taxes + self.tips + self.service_charges - discounts
        })
    }
}
