//! Generic distribution of an aggregate amount among members.
//!
//! One primitive serves discount, tax, and tip/service allocation: given a
//! total, the eligible members, a base-amount map for weighting, and a
//! strategy, it returns each member's share. Every degenerate input degrades
//! to an equal split and pushes a [`Warning`] instead of failing.

use rust_decimal::Decimal;

use crate::{
    config::{AllocationStrategy, ChargeKind, RatioMap},
    diagnostics::Warning,
    members::{MemberAmounts, MemberId},
};

/// Tolerance for a custom ratio table's distance from 100.
fn ratio_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

/// Splits `amount` across `eligible` according to `strategy`.
///
/// Returns a share map covering only the eligible members. Eligibility is
/// decided by the caller per charge (all members for tax and tip, the
/// relevant subset for discounts); `bases` weights proportional splits and
/// `ratios` feeds custom ones. Shares are exact `Decimal` fractions with no
/// intermediate rounding.
pub(crate) fn distribute(
    amount: Decimal,
    eligible: &[MemberId],
    bases: &MemberAmounts,
    strategy: AllocationStrategy,
    ratios: Option<&RatioMap>,
    charge: ChargeKind,
    warnings: &mut Vec<Warning>,
) -> MemberAmounts {
    if eligible.is_empty() || amount == Decimal::ZERO {
        return MemberAmounts::default();
    }

    match strategy {
        AllocationStrategy::Equal => equal_shares(amount, eligible),
        AllocationStrategy::Proportional => {
            let total_base: Decimal = eligible.iter().map(|member| bases.amount(member)).sum();

            if total_base <= Decimal::ZERO {
                warnings.push(Warning::ZeroProportionalBase { charge });
                return equal_shares(amount, eligible);
            }

            eligible
                .iter()
                .map(|member| {
                    (
                        member.clone(),
                        amount * bases.amount(member) / total_base,
                    )
                })
                .collect()
        }
        AllocationStrategy::Custom => {
            let Some(ratios) = ratios.filter(|ratios| !ratios.is_empty()) else {
                warnings.push(Warning::MissingCustomRatios { charge });
                return equal_shares(amount, eligible);
            };

            let total: Decimal = ratios.values().copied().sum();
            if (total - Decimal::ONE_HUNDRED).abs() > ratio_tolerance() {
                warnings.push(Warning::UnbalancedCustomRatios { charge, total });
                return equal_shares(amount, eligible);
            }

            eligible
                .iter()
                .map(|member| {
                    let percent = ratios.get(member).copied().unwrap_or(Decimal::ZERO);
                    (member.clone(), amount * percent / Decimal::ONE_HUNDRED)
                })
                .collect()
        }
    }
}

/// Same share for every eligible member, regardless of base.
fn equal_shares(amount: Decimal, eligible: &[MemberId]) -> MemberAmounts {
    let share = amount / Decimal::from(eligible.len());

    eligible
        .iter()
        .map(|member| (member.clone(), share))
        .collect()
}
