//! Bill payments

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::members::MemberId;

/// Who paid the bill.
///
/// The system started with one payer covering the whole bill and later grew
/// multi-payer support; both shapes are accepted, with the single-payer form
/// treated as the degenerate one-entry case during reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentRecord {
    /// One member covered the bill's recorded total.
    Single {
        /// The member credited with the full amount.
        payer: MemberId,
    },
    /// Several members each paid a part of the bill.
    Multi(BillPayments),
}

/// One multi-payer entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentEntry {
    /// Who paid.
    pub payer: MemberId,
    /// How much they paid.
    pub amount: Decimal,
}

/// Ordered multi-payer entries.
///
/// Adding an amount for a payer that already has an entry merges the two by
/// summation; a payer never appears twice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BillPayments {
    entries: Vec<PaymentEntry>,
}

impl BillPayments {
    /// Creates an empty payment list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an amount paid by a member, merging with any existing entry
    /// for the same payer.
    pub fn add(&mut self, payer: MemberId, amount: Decimal) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.payer == payer) {
            entry.amount += amount;
        } else {
            self.entries.push(PaymentEntry { payer, amount });
        }
    }

    /// The recorded entries, in insertion order.
    pub fn entries(&self) -> &[PaymentEntry] {
        &self.entries
    }

    /// Sum of all recorded payments.
    pub fn total_paid(&self) -> Decimal {
        self.entries.iter().map(|entry| entry.amount).sum()
    }

    /// Returns whether no payment has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(MemberId, Decimal)> for BillPayments {
    fn from_iter<I: IntoIterator<Item = (MemberId, Decimal)>>(iter: I) -> Self {
        let mut payments = Self::new();
        for (payer, amount) in iter {
            payments.add(payer, amount);
        }
        payments
    }
}
