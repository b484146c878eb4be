//! Rendered summaries
//!
//! Text-table views of a [`SplitResult`] for terminal display or export:
//! per-member totals, the bill-level breakdown, and the settlement plan.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{Table, Tabled, settings::Style};

use crate::{
    members::{Member, member_name},
    split::SplitResult,
};

/// Formats an amount in the given currency, symbol included.
fn money(amount: Decimal, currency: &'static Currency) -> String {
    Money::from_decimal(amount, currency).to_string()
}

#[derive(Tabled)]
struct MemberRow {
    #[tabled(rename = "Member")]
    member: String,
    #[tabled(rename = "Items")]
    items: String,
    #[tabled(rename = "Discount")]
    discount: String,
    #[tabled(rename = "Tax")]
    tax: String,
    #[tabled(rename = "Tip/Service")]
    tip_service: String,
    #[tabled(rename = "Owes")]
    owes: String,
    #[tabled(rename = "Paid")]
    paid: String,
}

#[derive(Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Charge")]
    charge: &'static str,
    #[tabled(rename = "Total")]
    total: String,
}

#[derive(Tabled)]
struct SettlementRow {
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Renders per-member contributions and obligations, one row per roster
/// member in roster order.
pub fn member_table(result: &SplitResult, members: &[Member], currency: &'static Currency) -> String {
    let rows = members.iter().map(|member| MemberRow {
        member: member.name.clone(),
        items: money(result.base_costs.amount(&member.id), currency),
        discount: money(result.discount_contributions.amount(&member.id), currency),
        tax: money(result.tax_contributions.amount(&member.id), currency),
        tip_service: money(result.tip_service_contributions.amount(&member.id), currency),
        owes: money(result.final_amounts.amount(&member.id), currency),
        paid: money(result.payments.amount(&member.id), currency),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Renders the bill-level totals.
pub fn breakdown_table(result: &SplitResult, currency: &'static Currency) -> String {
    let breakdown = &result.breakdown;
    let rows = [
        BreakdownRow {
            charge: "Items",
            total: money(breakdown.total_items, currency),
        },
        BreakdownRow {
            charge: "Discounts",
            total: money(breakdown.total_discounts, currency),
        },
        BreakdownRow {
            charge: "Taxes",
            total: money(breakdown.total_taxes, currency),
        },
        BreakdownRow {
            charge: "Tips & service",
            total: money(breakdown.total_tip_service, currency),
        },
    ];

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Renders the settlement plan, resolving member names from the roster.
///
/// Returns a fixed message when nothing needs to move.
pub fn settlement_table(
    result: &SplitResult,
    members: &[Member],
    currency: &'static Currency,
) -> String {
    if result.settlements.is_empty() {
        return "All settled; no transfers needed.".to_owned();
    }

    let rows = result.settlements.iter().map(|settlement| SettlementRow {
        from: member_name(members, &settlement.from).to_owned(),
        to: member_name(members, &settlement.to).to_owned(),
        amount: money(settlement.amount, currency),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rust_decimal_macros::dec;
    use rusty_money::iso;

    use crate::{
        bill::{BillData, BillItem, ItemId},
        config::SplitConfig,
        members::MemberId,
        payment::PaymentRecord,
        split::calculate_split,
    };

    use super::*;

    fn rendered() -> (SplitResult, Vec<Member>) {
        let members = vec![Member::new("a", "Alice"), Member::new("b", "Bob")];
        let bill = BillData {
            items: vec![BillItem::new("i1", "Platter", dec!(100), "food")],
            subtotal: dec!(100),
            taxes: Decimal::ZERO,
            discounts: vec![],
            tips: Decimal::ZERO,
            service_charges: Decimal::ZERO,
            grand_total: Some(dec!(100)),
        };
        let sharers: BTreeSet<MemberId> =
            [MemberId::from("a"), MemberId::from("b")].into_iter().collect();
        let config = SplitConfig {
            item_selections: [(ItemId::from("i1"), sharers)].into_iter().collect(),
            payment: Some(PaymentRecord::Single {
                payer: MemberId::from("a"),
            }),
            ..SplitConfig::default()
        };

        (calculate_split(&bill, &members, &config), members)
    }

    #[test]
    fn member_table_shows_names_and_amounts() {
        let (result, members) = rendered();

        let table = member_table(&result, &members, iso::USD);

        assert!(table.contains("Alice"));
        assert!(table.contains("Bob"));
        assert!(table.contains("$50.00"));
        assert!(table.contains("$100.00"));
    }

    #[test]
    fn settlement_table_resolves_names() {
        let (result, members) = rendered();

        let table = settlement_table(&result, &members, iso::USD);

        assert!(table.contains("Bob"));
        assert!(table.contains("Alice"));
        assert!(table.contains("$50.00"));
    }

    #[test]
    fn settlement_table_reports_when_nothing_moves() {
        let (mut result, members) = rendered();
        result.settlements.clear();

        assert_eq!(
            settlement_table(&result, &members, iso::USD),
            "All settled; no transfers needed."
        );
    }

    #[test]
    fn breakdown_table_lists_every_charge() {
        let (result, _) = rendered();

        let table = breakdown_table(&result, iso::USD);

        assert!(table.contains("Items"));
        assert!(table.contains("Discounts"));
        assert!(table.contains("Tips & service"));
    }
}
