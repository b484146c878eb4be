//! Validation

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::{
    bill::BillData,
    config::{AllocationStrategy, ChargeKind, RatioMap, SplitConfig},
    members::{Member, MemberId},
    payment::PaymentRecord,
};

/// A configuration problem the UI should fix before calculating.
///
/// The engine itself never runs these checks; it degrades with warnings
/// instead. [`validate_split`] is the pre-check entry point callers invoke
/// on the same inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// An item has no sharers.
    #[error("item \"{name}\" is not assigned to any member")]
    UnassignedItem {
        /// Display name of the item.
        name: String,
    },

    /// No payment record, or an empty multi-payer list.
    #[error("no bill payment is recorded")]
    MissingPayment,

    /// An item selection names a member outside the roster.
    #[error("item \"{item}\" is assigned to unknown member \"{member}\"")]
    UnknownSelectionMember {
        /// Display name of the item.
        item: String,
        /// The id that matched nobody.
        member: MemberId,
    },

    /// A payment entry names a payer outside the roster.
    #[error("payer \"{payer}\" is not a member of the group")]
    UnknownPayer {
        /// The id that matched nobody.
        payer: MemberId,
    },

    /// A multi-payer entry records a negative amount.
    #[error("payment of {amount} by \"{payer}\" is negative")]
    NegativePayment {
        /// The payer with the bad entry.
        payer: MemberId,
        /// The rejected amount.
        amount: Decimal,
    },

    /// A custom ratio table names a member outside the roster.
    #[error("unknown member \"{member}\" in {charge} ratios")]
    UnknownRatioMember {
        /// Which table holds the bad entry.
        charge: ChargeKind,
        /// The id that matched nobody.
        member: MemberId,
    },

    /// A custom ratio is negative.
    #[error("ratio {ratio} for \"{member}\" in {charge} ratios is negative")]
    NegativeRatio {
        /// Which table holds the bad entry.
        charge: ChargeKind,
        /// The member with the bad ratio.
        member: MemberId,
        /// The rejected percentage.
        ratio: Decimal,
    },

    /// A custom ratio table in use does not sum to 100 within tolerance.
    #[error("{charge} ratios sum to {total}, not 100")]
    UnbalancedRatios {
        /// Which table is off.
        charge: ChargeKind,
        /// The off-target sum.
        total: Decimal,
    },
}

/// Checks a bill, roster, and configuration for problems that would degrade
/// the calculation.
///
/// Returns every problem found, in a deterministic order (items in bill
/// order, then payment, then ratio tables). An empty list means the
/// configuration is clean.
pub fn validate_split(
    bill: &BillData,
    members: &[Member],
    config: &SplitConfig,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let known: FxHashSet<&MemberId> = members.iter().map(|member| &member.id).collect();

    for item in &bill.items {
        match config.item_selections.get(&item.id) {
            None => errors.push(ValidationError::UnassignedItem {
                name: item.name.clone(),
            }),
            Some(sharers) if sharers.is_empty() => errors.push(ValidationError::UnassignedItem {
                name: item.name.clone(),
            }),
            Some(sharers) => {
                for member in sharers {
                    if !known.contains(member) {
                        errors.push(ValidationError::UnknownSelectionMember {
                            item: item.name.clone(),
                            member: member.clone(),
                        });
                    }
                }
            }
        }
    }

    match &config.payment {
        None => errors.push(ValidationError::MissingPayment),
        Some(PaymentRecord::Single { payer }) => {
            if !known.contains(payer) {
                errors.push(ValidationError::UnknownPayer {
                    payer: payer.clone(),
                });
            }
        }
        Some(PaymentRecord::Multi(multi)) => {
            if multi.is_empty() {
                errors.push(ValidationError::MissingPayment);
            }
            for entry in multi.entries() {
                if !known.contains(&entry.payer) {
                    errors.push(ValidationError::UnknownPayer {
                        payer: entry.payer.clone(),
                    });
                }
                if entry.amount < Decimal::ZERO {
                    errors.push(ValidationError::NegativePayment {
                        payer: entry.payer.clone(),
                        amount: entry.amount,
                    });
                }
            }
        }
    }

    for (charge, strategy) in [
        (ChargeKind::Discount, config.discount_strategy),
        (ChargeKind::Tax, config.tax_strategy),
        (ChargeKind::TipService, config.tip_strategy),
    ] {
        if let Some(ratios) = config.custom_ratios.for_charge(charge) {
            validate_ratios(charge, strategy, ratios, &known, &mut errors);
        }
    }

    errors
}

/// Checks one ratio table. Membership and sign problems are always reported;
/// an off-target sum only matters when the table's strategy is custom.
fn validate_ratios(
    charge: ChargeKind,
    strategy: AllocationStrategy,
    ratios: &RatioMap,
    known: &FxHashSet<&MemberId>,
    errors: &mut Vec<ValidationError>,
) {
    let mut entries: Vec<(&MemberId, Decimal)> =
        ratios.iter().map(|(member, ratio)| (member, *ratio)).collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    for (member, ratio) in &entries {
        if !known.contains(member) {
            errors.push(ValidationError::UnknownRatioMember {
                charge,
                member: (*member).clone(),
            });
        }
        if *ratio < Decimal::ZERO {
            errors.push(ValidationError::NegativeRatio {
                charge,
                member: (*member).clone(),
                ratio: *ratio,
            });
        }
    }

    if strategy == AllocationStrategy::Custom && !ratios.is_empty() {
        let total: Decimal = entries.iter().map(|(_, ratio)| *ratio).sum();
        if (total - Decimal::ONE_HUNDRED).abs() > Decimal::new(1, 2) {
            errors.push(ValidationError::UnbalancedRatios { charge, total });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rust_decimal_macros::dec;

    use crate::{
        bill::{BillItem, ItemId},
        config::CustomRatios,
        payment::BillPayments,
    };

    use super::*;

    fn members() -> Vec<Member> {
        vec![Member::new("a", "Alice"), Member::new("b", "Bob")]
    }

    fn bill() -> BillData {
        BillData {
            items: vec![BillItem::new("i1", "Platter", dec!(100), "food")],
            subtotal: dec!(100),
            taxes: Decimal::ZERO,
            discounts: vec![],
            tips: Decimal::ZERO,
            service_charges: Decimal::ZERO,
            grand_total: Some(dec!(100)),
        }
    }

    fn assigned_config() -> SplitConfig {
        let sharers: BTreeSet<MemberId> =
            [MemberId::from("a"), MemberId::from("b")].into_iter().collect();
        SplitConfig {
            item_selections: [(ItemId::from("i1"), sharers)].into_iter().collect(),
            payment: Some(PaymentRecord::Single {
                payer: MemberId::from("a"),
            }),
            ..SplitConfig::default()
        }
    }

    #[test]
    fn clean_configuration_passes() {
        assert!(validate_split(&bill(), &members(), &assigned_config()).is_empty());
    }

    #[test]
    fn unassigned_item_and_missing_payment_are_reported() {
        let config = SplitConfig::default();

        let errors = validate_split(&bill(), &members(), &config);

        assert_eq!(
            errors,
            vec![
                ValidationError::UnassignedItem {
                    name: "Platter".into()
                },
                ValidationError::MissingPayment,
            ]
        );
    }

    #[test]
    fn unknown_sharer_is_reported() {
        let mut config = assigned_config();
        if let Some(sharers) = config.item_selections.get_mut(&ItemId::from("i1")) {
            sharers.insert(MemberId::from("zz"));
        }

        let errors = validate_split(&bill(), &members(), &config);

        assert_eq!(
            errors,
            vec![ValidationError::UnknownSelectionMember {
                item: "Platter".into(),
                member: MemberId::from("zz"),
            }]
        );
    }

    #[test]
    fn unknown_and_negative_multi_payments_are_reported() {
        let mut config = assigned_config();
        let payments: BillPayments = [
            (MemberId::from("zz"), dec!(50)),
            (MemberId::from("b"), dec!(-10)),
        ]
        .into_iter()
        .collect();
        config.payment = Some(PaymentRecord::Multi(payments));

        let errors = validate_split(&bill(), &members(), &config);

        assert!(errors.contains(&ValidationError::UnknownPayer {
            payer: MemberId::from("zz")
        }));
        assert!(errors.contains(&ValidationError::NegativePayment {
            payer: MemberId::from("b"),
            amount: dec!(-10),
        }));
    }

    #[test]
    fn empty_multi_payment_counts_as_missing() {
        let mut config = assigned_config();
        config.payment = Some(PaymentRecord::Multi(BillPayments::new()));

        let errors = validate_split(&bill(), &members(), &config);

        assert_eq!(errors, vec![ValidationError::MissingPayment]);
    }

    #[test]
    fn ratio_problems_are_reported_per_table() {
        let mut config = assigned_config();
        config.tax_strategy = AllocationStrategy::Custom;
        config.custom_ratios = CustomRatios {
            tax: Some(
                [
                    (MemberId::from("a"), dec!(60)),
                    (MemberId::from("zz"), dec!(-1)),
                ]
                .into_iter()
                .collect(),
            ),
            ..CustomRatios::default()
        };

        let errors = validate_split(&bill(), &members(), &config);

        assert!(errors.contains(&ValidationError::UnknownRatioMember {
            charge: ChargeKind::Tax,
            member: MemberId::from("zz"),
        }));
        assert!(errors.contains(&ValidationError::NegativeRatio {
            charge: ChargeKind::Tax,
            member: MemberId::from("zz"),
            ratio: dec!(-1),
        }));
        assert!(errors.contains(&ValidationError::UnbalancedRatios {
            charge: ChargeKind::Tax,
            total: dec!(59),
        }));
    }

    #[test]
    fn balanced_custom_ratios_pass() {
        let mut config = assigned_config();
        config.tip_strategy = AllocationStrategy::Custom;
        config.custom_ratios = CustomRatios {
            tip: Some(
                [
                    (MemberId::from("a"), dec!(70)),
                    (MemberId::from("b"), dec!(30)),
                ]
                .into_iter()
                .collect(),
            ),
            ..CustomRatios::default()
        };

        assert!(validate_split(&bill(), &members(), &config).is_empty());
    }

    #[test]
    fn errors_render_as_human_readable_messages() {
        let error = ValidationError::UnassignedItem {
            name: "Platter".into(),
        };

        assert_eq!(
            error.to_string(),
            "item \"Platter\" is not assigned to any member"
        );
    }
}
