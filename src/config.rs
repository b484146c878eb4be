//! Split configuration

use std::collections::BTreeSet;
use std::fmt;

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{bill::ItemId, members::MemberId, payment::PaymentRecord};

/// How an aggregate charge is divided among eligible members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStrategy {
    /// Every eligible member gets the same share.
    Equal,
    /// Shares follow each member's base amount. Degrades to [`Self::Equal`]
    /// when no base exists.
    #[default]
    Proportional,
    /// Shares follow a caller-supplied percentage table. Degrades to
    /// [`Self::Equal`] when the table is missing or does not sum to 100.
    Custom,
}

/// The aggregate charge a strategy or ratio table applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeKind {
    /// Discount distribution.
    Discount,
    /// Tax distribution.
    Tax,
    /// Pooled tips and service charges.
    TipService,
}

impl fmt::Display for ChargeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChargeKind::Discount => f.write_str("discount"),
            ChargeKind::Tax => f.write_str("tax"),
            ChargeKind::TipService => f.write_str("tip/service"),
        }
    }
}

/// Member → percentage table for [`AllocationStrategy::Custom`].
///
/// Percentages are on the `0..=100` scale and must sum to 100 (within 0.01)
/// to be honored.
pub type RatioMap = FxHashMap<MemberId, Decimal>;

/// Custom percentage tables, one per charge kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomRatios {
    /// Ratios used when the discount strategy is custom.
    #[serde(default)]
    pub discount: Option<RatioMap>,
    /// Ratios used when the tax strategy is custom.
    #[serde(default)]
    pub tax: Option<RatioMap>,
    /// Ratios used when the tip strategy is custom.
    #[serde(default)]
    pub tip: Option<RatioMap>,
}

impl CustomRatios {
    /// Returns the ratio table for a charge kind, if one was supplied.
    pub fn for_charge(&self, charge: ChargeKind) -> Option<&RatioMap> {
        match charge {
            ChargeKind::Discount => self.discount.as_ref(),
            ChargeKind::Tax => self.tax.as_ref(),
            ChargeKind::TipService => self.tip.as_ref(),
        }
    }
}

/// Item → sharers map. Order is irrelevant; an item missing from the map or
/// mapped to an empty set contributes nothing and raises a warning.
pub type ItemSelections = FxHashMap<ItemId, BTreeSet<MemberId>>;

/// Full configuration for one split calculation.
///
/// Passed to the engine together with the bill and roster; the engine holds
/// no state between invocations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Which members share each item.
    #[serde(default)]
    pub item_selections: ItemSelections,
    /// Strategy for pooled tips and service charges.
    #[serde(default)]
    pub tip_strategy: AllocationStrategy,
    /// Strategy for discount distribution.
    #[serde(default)]
    pub discount_strategy: AllocationStrategy,
    /// Strategy for tax distribution.
    #[serde(default)]
    pub tax_strategy: AllocationStrategy,
    /// Percentage tables for any custom strategies.
    #[serde(default)]
    pub custom_ratios: CustomRatios,
    /// Who paid the bill. `None` is a configuration error the caller should
    /// catch via validation before calculating.
    #[serde(default, with = "serde_norway::with::singleton_map_recursive")]
    pub payment: Option<PaymentRecord>,
}
