//! Settlements

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::members::{Member, MemberAmounts, MemberId};

/// Balances smaller than this are treated as already settled.
fn balance_epsilon() -> Decimal {
    Decimal::new(1, 3)
}

/// Transfers at or below this are not worth recording.
fn min_transfer() -> Decimal {
    Decimal::new(1, 2)
}

/// A suggested peer-to-peer transfer closing the gap between what a member
/// owes and what they already paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    /// The debtor making the transfer.
    pub from: MemberId,
    /// The creditor receiving it.
    pub to: MemberId,
    /// Transfer amount, rounded to cents.
    pub amount: Decimal,
}

/// Net balance (paid minus owed) per roster member, in roster order.
///
/// Positive balances are creditors, negative ones debtors.
pub fn net_balances(
    final_amounts: &MemberAmounts,
    payments: &MemberAmounts,
    members: &[Member],
) -> Vec<(MemberId, Decimal)> {
    members
        .iter()
        .map(|member| {
            (
                member.id.clone(),
                payments.amount(&member.id) - final_amounts.amount(&member.id),
            )
        })
        .collect()
}

/// Generates transfers that net everyone's balance to (near) zero.
///
/// Greedy largest-creditor / largest-debtor matching: repeatedly settles
/// `min(creditor_remaining, debtor_remaining)` between the two current
/// largest outstanding balances, advancing whichever side drops to (near)
/// zero. Deterministic and correct — applying every transfer reconciles all
/// balances within rounding tolerance — but not guaranteed to be
/// transaction-minimal, and callers must not assume it is.
pub fn generate_settlements(
    final_amounts: &MemberAmounts,
    payments: &MemberAmounts,
    members: &[Member],
) -> Vec<Settlement> {
    let balances = net_balances(final_amounts, payments, members);
    let epsilon = balance_epsilon();
    let floor = min_transfer();

    let mut creditors: Vec<(MemberId, Decimal)> = balances
        .iter()
        .filter(|(_, balance)| *balance > epsilon)
        .cloned()
        .collect();
    creditors.sort_by(|a, b| b.1.cmp(&a.1));

    let mut debtors: Vec<(MemberId, Decimal)> = balances
        .iter()
        .filter(|(_, balance)| *balance < -epsilon)
        .map(|(member, balance)| (member.clone(), -*balance))
        .collect();
    debtors.sort_by(|a, b| b.1.cmp(&a.1));

    let mut settlements = Vec::new();
    let (mut i, mut j) = (0, 0);

    while let (Some(creditor), Some(debtor)) = (creditors.get(i).cloned(), debtors.get(j).cloned())
    {
        let settled = creditor.1.min(debtor.1);

        if settled > floor {
            settlements.push(Settlement {
                from: debtor.0,
                to: creditor.0,
                amount: settled.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            });
        }

        if let Some(creditor) = creditors.get_mut(i) {
            creditor.1 -= settled;
            if creditor.1 <= floor {
                i += 1;
            }
        }
        if let Some(debtor) = debtors.get_mut(j) {
            debtor.1 -= settled;
            if debtor.1 <= floor {
                j += 1;
            }
        }
    }

    settlements
}
