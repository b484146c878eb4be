//! Members

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Identifier for a group member.
///
/// Ids are supplied by whatever manages the group; the engine only compares
/// and hashes them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    /// Creates a member id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A group member taking part in a split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Unique id within the group.
    pub id: MemberId,
    /// Display name.
    pub name: String,
}

impl Member {
    /// Creates a member with the given id and display name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: MemberId::new(id),
            name: name.into(),
        }
    }
}

/// Looks up a member's display name in a roster, falling back to the raw id.
pub fn member_name<'a>(members: &'a [Member], id: &'a MemberId) -> &'a str {
    members
        .iter()
        .find(|member| &member.id == id)
        .map_or(id.as_str(), |member| member.name.as_str())
}

/// Per-member monetary totals keyed by [`MemberId`].
///
/// Every lookup defaults to zero, so members without an entry simply
/// contribute nothing. Amounts accumulate at full [`Decimal`] precision;
/// rounding to cents happens once, at the end of a calculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberAmounts(FxHashMap<MemberId, Decimal>);

impl MemberAmounts {
    /// Creates a map with a zero entry for every roster member.
    pub fn zeroed(members: &[Member]) -> Self {
        Self(
            members
                .iter()
                .map(|member| (member.id.clone(), Decimal::ZERO))
                .collect(),
        )
    }

    /// Returns the amount recorded for a member, or zero.
    pub fn amount(&self, member: &MemberId) -> Decimal {
        self.0.get(member).copied().unwrap_or(Decimal::ZERO)
    }

    /// Returns whether the member has an entry (even a zero one).
    pub fn contains(&self, member: &MemberId) -> bool {
        self.0.contains_key(member)
    }

    /// Adds to a member's running total, creating the entry if needed.
    pub fn add(&mut self, member: &MemberId, amount: Decimal) {
        *self.0.entry(member.clone()).or_insert(Decimal::ZERO) += amount;
    }

    /// Replaces a member's total.
    pub fn set(&mut self, member: &MemberId, amount: Decimal) {
        self.0.insert(member.clone(), amount);
    }

    /// Adds every entry of `other` into this map.
    pub fn merge(&mut self, other: &MemberAmounts) {
        for (member, amount) in &other.0 {
            self.add(member, *amount);
        }
    }

    /// Sum of all recorded amounts.
    pub fn total(&self) -> Decimal {
        self.0.values().copied().sum()
    }

    /// Iterates over `(member, amount)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&MemberId, Decimal)> {
        self.0.iter().map(|(member, amount)| (member, *amount))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rounds every amount to two decimal places, midpoint away from zero.
    pub fn round_to_cents(&mut self) {
        for amount in self.0.values_mut() {
            *amount = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        }
    }
}

impl FromIterator<(MemberId, Decimal)> for MemberAmounts {
    fn from_iter<I: IntoIterator<Item = (MemberId, Decimal)>>(iter: I) -> Self {
        let mut amounts = Self::default();
        for (member, amount) in iter {
            amounts.add(&member, amount);
        }
        amounts
    }
}
