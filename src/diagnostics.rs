//! Diagnostics

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{bill::ItemId, config::ChargeKind};

/// A degenerate condition observed during a calculation.
///
/// None of these abort the calculation; each one marks a documented fallback
/// or a zero-contribution path. They are returned on
/// [`SplitResult::warnings`](crate::split::SplitResult::warnings) rather than
/// logged, so callers and tests can assert on them.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum Warning {
    /// An item had no sharers and contributed nothing.
    #[error("item \"{name}\" ({id}) is not assigned to any member; it contributes nothing")]
    UnassignedItem {
        /// Id of the unassigned item.
        id: ItemId,
        /// Display name of the unassigned item.
        name: String,
    },

    /// A custom strategy was selected but no ratio table was supplied.
    #[error("custom ratios for {charge} are missing or empty; fell back to an equal split")]
    MissingCustomRatios {
        /// Which charge fell back.
        charge: ChargeKind,
    },

    /// A custom ratio table did not sum to 100 within tolerance.
    #[error("custom ratios for {charge} sum to {total}, not 100; fell back to an equal split")]
    UnbalancedCustomRatios {
        /// Which charge fell back.
        charge: ChargeKind,
        /// The off-target sum that was rejected.
        total: Decimal,
    },

    /// A proportional split had no base amounts to weight by.
    #[error("no base amounts to weight a proportional {charge} split; fell back to an equal split")]
    ZeroProportionalBase {
        /// Which charge fell back.
        charge: ChargeKind,
    },

    /// Tax allocation found no taxable base under a non-equal strategy.
    #[error("no taxable base; tax was distributed equally")]
    ZeroTaxableBase,

    /// No payment record was configured; reconciliation assumed zero
    /// payments for everyone.
    #[error("no bill payment was recorded; settlements assume nobody has paid")]
    MissingPayment,
}
