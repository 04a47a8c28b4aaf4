//! The ledger entry union the recalculation engine folds over.
//!
//! Transactions and investments are distinct row types with one shared
//! effect: a signed pair of balance changes (`origin -= amount`,
//! `destination += amount`). `LedgerEntry` gives the fold a uniform view of
//! both so the balance logic lives in exactly one place.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Investment, Transaction};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerEntry {
    Transaction(Transaction),
    Investment(Investment),
}

impl LedgerEntry {
    #[must_use]
    pub fn entry_id(&self) -> Uuid {
        match self {
            Self::Transaction(tx) => tx.id,
            Self::Investment(inv) => inv.id,
        }
    }

    /// Stable label used in integrity-error messages.
    #[must_use]
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Transaction(_) => "transaction",
            Self::Investment(_) => "investment",
        }
    }

    #[must_use]
    pub fn origin_account_id(&self) -> Uuid {
        match self {
            Self::Transaction(tx) => tx.origin_account_id,
            Self::Investment(inv) => inv.origin_account_id,
        }
    }

    #[must_use]
    pub fn destination_account_id(&self) -> Uuid {
        match self {
            Self::Transaction(tx) => tx.destination_account_id,
            Self::Investment(inv) => inv.destination_account_id,
        }
    }

    #[must_use]
    pub fn amount_minor(&self) -> i64 {
        match self {
            Self::Transaction(tx) => tx.amount_minor,
            Self::Investment(inv) => inv.amount_minor,
        }
    }

    #[must_use]
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::Transaction(tx) => tx.occurred_at,
            Self::Investment(inv) => inv.occurred_at,
        }
    }

    /// Whether the entry contributes to balances.
    ///
    /// Pending transactions do not; investments always do.
    #[must_use]
    pub fn affects_balances(&self) -> bool {
        match self {
            Self::Transaction(tx) => tx.affects_balances(),
            Self::Investment(_) => true,
        }
    }

    /// Whether the entry references `account_id` on either side.
    #[must_use]
    pub fn touches(&self, account_id: Uuid) -> bool {
        self.origin_account_id() == account_id || self.destination_account_id() == account_id
    }

    /// Signed contribution of this entry to `account_id`, or zero if the
    /// entry does not touch the account or does not affect balances.
    #[must_use]
    pub fn contribution_for(&self, account_id: Uuid) -> i64 {
        if !self.affects_balances() {
            return 0;
        }
        let mut contribution = 0;
        if self.origin_account_id() == account_id {
            contribution -= self.amount_minor();
        }
        if self.destination_account_id() == account_id {
            contribution += self.amount_minor();
        }
        contribution
    }
}
