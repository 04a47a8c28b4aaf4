use sea_orm::{
    Condition, ConnectionTrait, DatabaseConnection, PaginatorTrait, QueryOrder, prelude::*,
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{EngineError, LedgerEntry, ResultEngine};

mod accounts;
mod balances;
mod investments;
mod transactions;

pub use balances::RecalcSummary;
pub use investments::NewInvestmentCmd;
pub use transactions::{NewTransactionCmd, TransactionListFilter, UpdateTransactionCmd};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The engine behind every balance-affecting operation.
///
/// Balance-mutating paths (entry create/update/delete and the recalculation
/// sweeps) are serialized through `balance_lock`: a sweep reads the full
/// ledger and rewrites every cached balance, so it must never interleave with
/// an incremental update. A later operation simply awaits the lock until the
/// in-progress one commits.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    balance_lock: Mutex<()>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidAccount(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Fetch an account row or fail with `KeyNotFound`.
pub(crate) async fn require_account<C: ConnectionTrait>(
    db: &C,
    account_id: Uuid,
) -> ResultEngine<crate::accounts::Model> {
    crate::accounts::Entity::find_by_id(account_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("account not exists".to_string()))
}

/// Apply a signed delta to one cached account balance.
pub(crate) async fn shift_balance<C: ConnectionTrait>(
    db: &C,
    account_id: Uuid,
    delta_minor: i64,
) -> ResultEngine<()> {
    let model = require_account(db, account_id).await?;
    let updated = crate::accounts::ActiveModel {
        id: sea_orm::ActiveValue::Set(model.id),
        balance_minor: sea_orm::ActiveValue::Set(model.balance_minor + delta_minor),
        ..Default::default()
    };
    updated.update(db).await?;
    Ok(())
}

/// Apply one ledger entry's pair of deltas: origin loses, destination gains.
pub(crate) async fn apply_entry<C: ConnectionTrait>(
    db: &C,
    origin_account_id: Uuid,
    destination_account_id: Uuid,
    amount_minor: i64,
) -> ResultEngine<()> {
    shift_balance(db, origin_account_id, -amount_minor).await?;
    shift_balance(db, destination_account_id, amount_minor).await?;
    Ok(())
}

/// Load the complete ledger (transactions + investments) in chronological
/// order. Pending transactions are included; the fold decides whether an
/// entry qualifies.
pub(crate) async fn load_ledger_entries<C: ConnectionTrait>(
    db: &C,
) -> ResultEngine<Vec<LedgerEntry>> {
    let tx_models = crate::transactions::Entity::find()
        .order_by_asc(crate::transactions::Column::OccurredAt)
        .order_by_asc(crate::transactions::Column::Id)
        .all(db)
        .await?;
    let investment_models = crate::investments::Entity::find()
        .order_by_asc(crate::investments::Column::OccurredAt)
        .order_by_asc(crate::investments::Column::Id)
        .all(db)
        .await?;

    let mut entries = Vec::with_capacity(tx_models.len() + investment_models.len());
    for model in tx_models {
        entries.push(LedgerEntry::Transaction(crate::Transaction::try_from(
            model,
        )?));
    }
    for model in investment_models {
        entries.push(LedgerEntry::Investment(crate::Investment::try_from(model)?));
    }
    entries.sort_by_key(LedgerEntry::occurred_at);
    Ok(entries)
}

/// Load only the ledger entries touching one account, in chronological
/// order. Targeted recalculation uses this to avoid a full-ledger scan.
pub(crate) async fn load_ledger_entries_for_account<C: ConnectionTrait>(
    db: &C,
    account_id: Uuid,
) -> ResultEngine<Vec<LedgerEntry>> {
    let id = account_id.to_string();
    let tx_models = crate::transactions::Entity::find()
        .filter(
            Condition::any()
                .add(crate::transactions::Column::OriginAccountId.eq(id.clone()))
                .add(crate::transactions::Column::DestinationAccountId.eq(id.clone())),
        )
        .order_by_asc(crate::transactions::Column::OccurredAt)
        .order_by_asc(crate::transactions::Column::Id)
        .all(db)
        .await?;
    let investment_models = crate::investments::Entity::find()
        .filter(
            Condition::any()
                .add(crate::investments::Column::OriginAccountId.eq(id.clone()))
                .add(crate::investments::Column::DestinationAccountId.eq(id)),
        )
        .order_by_asc(crate::investments::Column::OccurredAt)
        .order_by_asc(crate::investments::Column::Id)
        .all(db)
        .await?;

    let mut entries = Vec::with_capacity(tx_models.len() + investment_models.len());
    for model in tx_models {
        entries.push(LedgerEntry::Transaction(crate::Transaction::try_from(
            model,
        )?));
    }
    for model in investment_models {
        entries.push(LedgerEntry::Investment(crate::Investment::try_from(model)?));
    }
    entries.sort_by_key(LedgerEntry::occurred_at);
    Ok(entries)
}

/// Count ledger rows referencing an account on either side.
pub(crate) async fn count_references<C: ConnectionTrait>(
    db: &C,
    account_id: Uuid,
) -> ResultEngine<u64> {
    let id = account_id.to_string();
    let tx_count = crate::transactions::Entity::find()
        .filter(
            Condition::any()
                .add(crate::transactions::Column::OriginAccountId.eq(id.clone()))
                .add(crate::transactions::Column::DestinationAccountId.eq(id.clone())),
        )
        .count(db)
        .await?;
    let investment_count = crate::investments::Entity::find()
        .filter(
            Condition::any()
                .add(crate::investments::Column::OriginAccountId.eq(id.clone()))
                .add(crate::investments::Column::DestinationAccountId.eq(id)),
        )
        .count(db)
        .await?;
    Ok(tx_count + investment_count)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            balance_lock: Mutex::new(()),
        })
    }
}
