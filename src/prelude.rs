//! Tabshare prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    bill::{BillData, BillItem, Discount, ItemId},
    config::{AllocationStrategy, ChargeKind, CustomRatios, ItemSelections, RatioMap, SplitConfig},
    diagnostics::Warning,
    members::{Member, MemberAmounts, MemberId},
    payment::{BillPayments, PaymentEntry, PaymentRecord},
    scenario::{Scenario, ScenarioError},
    settlement::{Settlement, generate_settlements, net_balances},
    split::{Breakdown, ItemSplit, MemberShare, SplitResult, calculate_split},
    validate::{ValidationError, validate_split},
};
