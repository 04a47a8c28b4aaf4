//! Balance recalculation.
//!
//! Account balances are denormalized caches over the ledger. These sweeps are
//! the single source of truth that regenerates them: used at maintenance time
//! and after any out-of-band correction that could desynchronize the cache.

use std::collections::{HashMap, HashSet};

use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{EngineError, LedgerEntry, Money, ResultEngine, accounts, util::parse_uuid};

use super::{Engine, load_ledger_entries, load_ledger_entries_for_account, require_account, with_tx};

/// Outcome of a full recalculation sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RecalcSummary {
    /// Accounts whose cached balance was rewritten.
    pub accounts_updated: usize,
    /// Qualifying ledger entries folded into the balances.
    pub entries_processed: usize,
}

fn integrity_error(entry: &LedgerEntry, missing_account: Uuid) -> EngineError {
    EngineError::LedgerIntegrity(format!(
        "{} {} references missing account {}",
        entry.kind_label(),
        entry.entry_id(),
        missing_account
    ))
}

impl Engine {
    /// Recomputes every cached account balance from the full ledger.
    ///
    /// - Every account starts from zero.
    /// - Every entry's origin and destination must reference an existing
    ///   account, pending transactions included; a missing reference fails
    ///   the whole sweep (rollback), nothing is partially applied.
    /// - Completed transactions and all investments apply
    ///   `origin -= amount; destination += amount`; pending transactions are
    ///   validated but not folded.
    pub async fn recalculate_all(&self) -> ResultEngine<RecalcSummary> {
        let _guard = self.balance_lock.lock().await;
        with_tx!(self, |db_tx| {
            let account_models = accounts::Entity::find().all(&db_tx).await?;

            let mut balances: HashMap<Uuid, Money> = HashMap::with_capacity(account_models.len());
            for model in &account_models {
                balances.insert(parse_uuid(&model.id, "account")?, Money::ZERO);
            }

            // Replay the ledger in chronological order so the first integrity
            // violation reported is stable.
            let entries = load_ledger_entries(&db_tx).await?;
            let mut entries_processed = 0usize;
            for entry in &entries {
                let origin = entry.origin_account_id();
                let destination = entry.destination_account_id();

                for side in [origin, destination] {
                    if !balances.contains_key(&side) {
                        return Err(integrity_error(entry, side));
                    }
                }
                if !entry.affects_balances() {
                    continue;
                }

                let amount = Money::new(entry.amount_minor());
                if let Some(balance) = balances.get_mut(&origin) {
                    *balance -= amount;
                }
                if let Some(balance) = balances.get_mut(&destination) {
                    *balance += amount;
                }
                entries_processed += 1;
            }

            for (account_id, balance) in &balances {
                let model = accounts::ActiveModel {
                    id: ActiveValue::Set(account_id.to_string()),
                    balance_minor: ActiveValue::Set(balance.minor()),
                    ..Default::default()
                };
                model.update(&db_tx).await?;
            }

            let summary = RecalcSummary {
                accounts_updated: balances.len(),
                entries_processed,
            };
            tracing::info!(
                accounts = summary.accounts_updated,
                entries = summary.entries_processed,
                "balances recalculated"
            );
            Ok(summary)
        })
    }

    /// Recomputes one account's cached balance from the entries touching it.
    ///
    /// Produces the same balance as filtering [`Engine::recalculate_all`]'s
    /// result to this account, without a full-ledger rewrite. Entries
    /// touching the account get the same reference validation as the full
    /// sweep: a missing counterparty fails the operation.
    pub async fn recalculate_for_account(&self, account_id: Uuid) -> ResultEngine<i64> {
        let _guard = self.balance_lock.lock().await;
        with_tx!(self, |db_tx| {
            require_account(&db_tx, account_id).await?;

            let account_models = accounts::Entity::find().all(&db_tx).await?;
            let mut known: HashSet<Uuid> = HashSet::with_capacity(account_models.len());
            for model in &account_models {
                known.insert(parse_uuid(&model.id, "account")?);
            }

            let entries = load_ledger_entries_for_account(&db_tx, account_id).await?;
            let mut balance = Money::ZERO;
            for entry in &entries {
                for side in [entry.origin_account_id(), entry.destination_account_id()] {
                    if !known.contains(&side) {
                        return Err(integrity_error(entry, side));
                    }
                }
                balance += Money::new(entry.contribution_for(account_id));
            }

            let model = accounts::ActiveModel {
                id: ActiveValue::Set(account_id.to_string()),
                balance_minor: ActiveValue::Set(balance.minor()),
                ..Default::default()
            };
            model.update(&db_tx).await?;

            Ok(balance.minor())
        })
    }
}
