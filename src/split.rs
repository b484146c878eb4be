//! Split engine
//!
//! The calculation pipeline: item shares, discounts, tax, tips and service
//! charges, payment reconciliation, final amounts, settlements, then a single
//! rounding pass. Pure and synchronous; every invocation works only on its
//! arguments and returns a freshly built [`SplitResult`].

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{
    allocate::distribute,
    bill::{BillData, BillItem, Discount, ItemId},
    config::{AllocationStrategy, ChargeKind, SplitConfig},
    diagnostics::Warning,
    members::{Member, MemberAmounts, MemberId},
    payment::PaymentRecord,
    settlement::{self, Settlement},
};

/// One member's share of a single item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberShare {
    /// The sharer.
    pub member: MemberId,
    /// Their share of the item's amount.
    pub amount: Decimal,
}

/// How a single item was divided among its sharers.
///
/// An unassigned item keeps an entry with no shares, so the bill stays fully
/// accounted for in the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSplit {
    /// Id of the item.
    pub item_id: ItemId,
    /// Display name of the item.
    pub name: String,
    /// Category label of the item.
    pub category: String,
    /// The item's full amount.
    pub total: Decimal,
    /// Equal shares, one per sharer; empty for unassigned items.
    pub shares: SmallVec<[MemberShare; 4]>,
}

/// Aggregate totals across the whole calculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    /// Total of all assigned item shares.
    pub total_items: Decimal,
    /// Sum of every discount's effective amount.
    pub total_discounts: Decimal,
    /// Aggregate tax distributed.
    pub total_taxes: Decimal,
    /// Pooled tips and service charges distributed.
    pub total_tip_service: Decimal,
}

impl Breakdown {
    fn round_to_cents(&mut self) {
        for total in [
            &mut self.total_items,
            &mut self.total_discounts,
            &mut self.total_taxes,
            &mut self.total_tip_service,
        ] {
            *total = total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        }
    }
}

/// Complete outcome of one split calculation.
///
/// A pure value: computed once per "calculate" action, persisted verbatim by
/// callers, and superseded wholesale by any recalculation. All monetary
/// fields are rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitResult {
    /// Per-item share breakdown, in bill order.
    pub item_splits: Vec<ItemSplit>,
    /// Each member's share of the items themselves.
    pub base_costs: MemberAmounts,
    /// Each member's share of the discounts (subtracted from their total).
    pub discount_contributions: MemberAmounts,
    /// Each member's share of the tax.
    pub tax_contributions: MemberAmounts,
    /// Each member's share of tips and service charges.
    pub tip_service_contributions: MemberAmounts,
    /// What each member owes: base − discount + tax + tip/service.
    pub final_amounts: MemberAmounts,
    /// What each member is recorded as having paid.
    pub payments: MemberAmounts,
    /// Suggested transfers reconciling payments against obligations.
    pub settlements: Vec<Settlement>,
    /// Aggregate totals.
    pub breakdown: Breakdown,
    /// Degenerate conditions encountered along the way.
    pub warnings: Vec<Warning>,
}

/// Runs the full split calculation for one bill.
///
/// Never fails: degenerate inputs (unassigned items, bad ratio tables, a
/// missing payment record) degrade along documented fallbacks and are
/// reported in [`SplitResult::warnings`]. Callers wanting to block bad
/// configurations up front should run
/// [`validate_split`](crate::validate::validate_split) first.
pub fn calculate_split(bill: &BillData, members: &[Member], config: &SplitConfig) -> SplitResult {
    let roster: Vec<MemberId> = members.iter().map(|member| member.id.clone()).collect();
    let mut warnings = Vec::new();
    let mut breakdown = Breakdown::default();

    let mut base_costs = MemberAmounts::zeroed(members);
    let mut item_splits = split_items(bill, config, &mut base_costs, &mut warnings);
    breakdown.total_items = base_costs.total();

    let mut discount_contributions = MemberAmounts::zeroed(members);
    breakdown.total_discounts = bill
        .discounts
        .iter()
        .map(|discount| {
            apply_discount(
                discount,
                bill,
                config,
                &roster,
                &base_costs,
                &mut discount_contributions,
                &mut warnings,
            )
        })
        .sum();

    let mut tax_contributions = MemberAmounts::zeroed(members);
    if bill.taxes > Decimal::ZERO {
        allocate_taxes(
            bill,
            config,
            &roster,
            &base_costs,
            &discount_contributions,
            &mut tax_contributions,
            &mut warnings,
        );
        breakdown.total_taxes = bill.taxes;
    }

    let mut tip_service_contributions = MemberAmounts::zeroed(members);
    let tip_pool = bill.tips + bill.service_charges;
    if tip_pool > Decimal::ZERO {
        allocate_tip_service(
            tip_pool,
            config,
            &roster,
            &base_costs,
            &discount_contributions,
            &tax_contributions,
            &mut tip_service_contributions,
            &mut warnings,
        );
        breakdown.total_tip_service = tip_pool;
    }

    let mut payments = reconcile_payments(bill, config, members, &mut warnings);

    let mut final_amounts = MemberAmounts::zeroed(members);
    for member in &roster {
        final_amounts.set(
            member,
            base_costs.amount(member) - discount_contributions.amount(member)
                + tax_contributions.amount(member)
                + tip_service_contributions.amount(member),
        );
    }

    // Settlements work on the unrounded balances; their own amounts are
    // rounded as they are recorded.
    let settlements = settlement::generate_settlements(&final_amounts, &payments, members);

    round_item_splits(&mut item_splits);
    base_costs.round_to_cents();
    discount_contributions.round_to_cents();
    tax_contributions.round_to_cents();
    tip_service_contributions.round_to_cents();
    final_amounts.round_to_cents();
    payments.round_to_cents();
    breakdown.round_to_cents();

    SplitResult {
        item_splits,
        base_costs,
        discount_contributions,
        tax_contributions,
        tip_service_contributions,
        final_amounts,
        payments,
        settlements,
        breakdown,
        warnings,
    }
}

/// Divides each item equally among its sharers, accumulating base costs.
fn split_items(
    bill: &BillData,
    config: &SplitConfig,
    base_costs: &mut MemberAmounts,
    warnings: &mut Vec<Warning>,
) -> Vec<ItemSplit> {
    bill.items
        .iter()
        .map(|item| {
            let sharers = config.item_selections.get(&item.id);
            let Some(sharers) = sharers.filter(|sharers| !sharers.is_empty()) else {
                warnings.push(Warning::UnassignedItem {
                    id: item.id.clone(),
                    name: item.name.clone(),
                });
                return ItemSplit {
                    item_id: item.id.clone(),
                    name: item.name.clone(),
                    category: item.category.clone(),
                    total: item.amount,
                    shares: SmallVec::new(),
                };
            };

            let share = item.amount / Decimal::from(sharers.len());
            let shares = sharers
                .iter()
                .map(|member| {
                    base_costs.add(member, share);
                    MemberShare {
                        member: member.clone(),
                        amount: share,
                    }
                })
                .collect();

            ItemSplit {
                item_id: item.id.clone(),
                name: item.name.clone(),
                category: item.category.clone(),
                total: item.amount,
                shares,
            }
        })
        .collect()
}

/// Per-member share of a single item, restricted to items `keep` accepts.
fn relevant_item_costs(
    bill: &BillData,
    config: &SplitConfig,
    keep: impl Fn(&BillItem) -> bool,
) -> MemberAmounts {
    let mut costs = MemberAmounts::default();

    for item in bill.items.iter().filter(|item| keep(item)) {
        let Some(sharers) = config.item_selections.get(&item.id) else {
            continue;
        };
        if sharers.is_empty() {
            continue;
        }

        let share = item.amount / Decimal::from(sharers.len());
        for member in sharers {
            costs.add(member, share);
        }
    }

    costs
}

/// Computes one discount's effective amount and distributes it.
///
/// Returns the effective amount so the caller can total discounts across the
/// bill. Distribution only happens when the amount is positive and somebody
/// is eligible; the effective amount still counts either way.
fn apply_discount(
    discount: &Discount,
    bill: &BillData,
    config: &SplitConfig,
    roster: &[MemberId],
    base_costs: &MemberAmounts,
    contributions: &mut MemberAmounts,
    warnings: &mut Vec<Warning>,
) -> Decimal {
    let (relevant_costs, effective) = match discount {
        Discount::Percentage { percent } => {
            let costs = relevant_item_costs(bill, config, |_| true);
            let effective = costs.total() * *percent / Decimal::ONE_HUNDRED;
            (costs, effective)
        }
        Discount::Flat { amount } => {
            let costs: MemberAmounts = roster
                .iter()
                .filter(|member| base_costs.amount(member) > Decimal::ZERO)
                .map(|member| (member.clone(), base_costs.amount(member)))
                .collect();
            (costs, *amount)
        }
        Discount::Category { category, percent } => {
            let costs = relevant_item_costs(bill, config, |item| &item.category == category);
            let effective = costs.total() * *percent / Decimal::ONE_HUNDRED;
            (costs, effective)
        }
    };

    // Eligibility in roster order keeps the calculation deterministic.
    let eligible: Vec<MemberId> = roster
        .iter()
        .filter(|member| relevant_costs.contains(member))
        .cloned()
        .collect();

    if effective > Decimal::ZERO && !eligible.is_empty() {
        let shares = distribute(
            effective,
            &eligible,
            &relevant_costs,
            config.discount_strategy,
            config.custom_ratios.for_charge(ChargeKind::Discount),
            ChargeKind::Discount,
            warnings,
        );
        contributions.merge(&shares);
    }

    effective
}

/// Distributes the bill's aggregate tax across all members.
fn allocate_taxes(
    bill: &BillData,
    config: &SplitConfig,
    roster: &[MemberId],
    base_costs: &MemberAmounts,
    discount_contributions: &MemberAmounts,
    tax_contributions: &mut MemberAmounts,
    warnings: &mut Vec<Warning>,
) {
    let taxable: MemberAmounts = roster
        .iter()
        .map(|member| {
            let base = base_costs.amount(member) - discount_contributions.amount(member);
            (member.clone(), base.max(Decimal::ZERO))
        })
        .collect();

    let mut strategy = config.tax_strategy;
    let mut ratios = config.custom_ratios.for_charge(ChargeKind::Tax);
    if taxable.total() <= Decimal::ZERO && strategy != AllocationStrategy::Equal {
        warnings.push(Warning::ZeroTaxableBase);
        strategy = AllocationStrategy::Equal;
        ratios = None;
    }

    let shares = distribute(
        bill.taxes,
        roster,
        &taxable,
        strategy,
        ratios,
        ChargeKind::Tax,
        warnings,
    );
    tax_contributions.merge(&shares);
}

/// Distributes the pooled tips and service charges across all members.
#[allow(clippy::too_many_arguments, reason = "one call site inside the pipeline")]
fn allocate_tip_service(
    pool: Decimal,
    config: &SplitConfig,
    roster: &[MemberId],
    base_costs: &MemberAmounts,
    discount_contributions: &MemberAmounts,
    tax_contributions: &MemberAmounts,
    tip_service_contributions: &mut MemberAmounts,
    warnings: &mut Vec<Warning>,
) {
    let pre_tip: MemberAmounts = roster
        .iter()
        .map(|member| {
            (
                member.clone(),
                base_costs.amount(member) - discount_contributions.amount(member)
                    + tax_contributions.amount(member),
            )
        })
        .collect();

    let shares = distribute(
        pool,
        roster,
        &pre_tip,
        config.tip_strategy,
        config.custom_ratios.for_charge(ChargeKind::TipService),
        ChargeKind::TipService,
        warnings,
    );
    tip_service_contributions.merge(&shares);
}

/// Builds the per-member payments map from the configured payment record.
///
/// The engine never invents a payment: with no record (or an empty
/// multi-payer list) everyone stays at zero and a warning marks the
/// degenerate configuration.
fn reconcile_payments(
    bill: &BillData,
    config: &SplitConfig,
    members: &[Member],
    warnings: &mut Vec<Warning>,
) -> MemberAmounts {
    let mut payments = MemberAmounts::zeroed(members);

    match &config.payment {
        None => warnings.push(Warning::MissingPayment),
        Some(PaymentRecord::Single { payer }) => {
            payments.set(payer, bill.recorded_total());
        }
        Some(PaymentRecord::Multi(multi)) => {
            if multi.is_empty() {
                warnings.push(Warning::MissingPayment);
            }
            for entry in multi.entries() {
                payments.add(&entry.payer, entry.amount);
            }
        }
    }

    payments
}

fn round_item_splits(item_splits: &mut [ItemSplit]) {
    for split in item_splits {
        split.total = split
            .total
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        for share in &mut split.shares {
            share.amount = share
                .amount
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        }
    }
}
