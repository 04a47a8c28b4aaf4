//! Transaction operations.
//!
//! Every mutation here updates the cached account balances incrementally and
//! is serialized against recalculation sweeps via the engine balance lock.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, Condition, QueryOrder, QuerySelect, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Currency, EngineError, ResultEngine, Transaction, TransactionStatus, transactions,
};

use super::{Engine, apply_entry, normalize_optional_text, require_account, with_tx};

/// Command for [`Engine::new_transaction`].
#[derive(Clone, Debug)]
pub struct NewTransactionCmd {
    pub origin_account_id: Uuid,
    pub destination_account_id: Uuid,
    pub amount_minor: i64,
    pub status: TransactionStatus,
    pub occurred_at: DateTime<Utc>,
    pub voucher: Option<String>,
    pub note: Option<String>,
    pub created_by: Option<String>,
}

/// Command for [`Engine::update_transaction`].
///
/// Accounts cannot be re-targeted through an update; delete and recreate the
/// entry instead.
#[derive(Clone, Debug, Default)]
pub struct UpdateTransactionCmd {
    pub transaction_id: Uuid,
    pub amount_minor: Option<i64>,
    pub voucher: Option<String>,
    pub note: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Filters for listing transactions.
///
/// `from` is inclusive and `to` is exclusive (`[from, to)`), both in UTC.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// If present, only transactions with this status are returned.
    pub status: Option<TransactionStatus>,
    /// If present, only transactions touching this account are returned.
    pub account_id: Option<Uuid>,
}

fn validate_list_filter(filter: &TransactionListFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from >= to
    {
        return Err(EngineError::InvalidAmount(
            "invalid range: from must be < to".to_string(),
        ));
    }
    Ok(())
}

impl Engine {
    /// Create a transaction between two distinct, existing accounts.
    ///
    /// A `Completed` transaction immediately applies
    /// `origin -= amount; destination += amount` to the cached balances; a
    /// `Pending` one is recorded without touching them.
    pub async fn new_transaction(&self, cmd: NewTransactionCmd) -> ResultEngine<Uuid> {
        let _guard = self.balance_lock.lock().await;
        with_tx!(self, |db_tx| {
            require_account(&db_tx, cmd.origin_account_id).await?;
            require_account(&db_tx, cmd.destination_account_id).await?;

            let tx = Transaction::new(
                cmd.origin_account_id,
                cmd.destination_account_id,
                cmd.amount_minor,
                Currency::default(),
                cmd.status,
                cmd.occurred_at,
                normalize_optional_text(cmd.voucher.as_deref()),
                normalize_optional_text(cmd.note.as_deref()),
                normalize_optional_text(cmd.created_by.as_deref()),
            )?;
            let id = tx.id;
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;

            if tx.affects_balances() {
                apply_entry(
                    &db_tx,
                    tx.origin_account_id,
                    tx.destination_account_id,
                    tx.amount_minor,
                )
                .await?;
            }
            tracing::debug!(transaction = %id, status = tx.status.as_str(), "transaction created");
            Ok(id)
        })
    }

    /// Mark a pending transaction completed, applying its balance deltas.
    pub async fn complete_transaction(&self, transaction_id: Uuid) -> ResultEngine<()> {
        let _guard = self.balance_lock.lock().await;
        with_tx!(self, |db_tx| {
            let tx = self.require_transaction(&db_tx, transaction_id).await?;
            if tx.status == TransactionStatus::Completed {
                return Err(EngineError::StatusConflict(
                    "transaction already completed".to_string(),
                ));
            }

            let updated = transactions::ActiveModel {
                id: ActiveValue::Set(transaction_id.to_string()),
                status: ActiveValue::Set(TransactionStatus::Completed.as_str().to_string()),
                ..Default::default()
            };
            updated.update(&db_tx).await?;

            apply_entry(
                &db_tx,
                tx.origin_account_id,
                tx.destination_account_id,
                tx.amount_minor,
            )
            .await?;
            Ok(())
        })
    }

    /// Update the amount/metadata of an existing transaction.
    ///
    /// For a completed transaction the cached balances are re-based by
    /// `-old +new`; a pending one never touched them in the first place.
    pub async fn update_transaction(&self, cmd: UpdateTransactionCmd) -> ResultEngine<()> {
        if let Some(amount_minor) = cmd.amount_minor
            && amount_minor <= 0
        {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }

        let _guard = self.balance_lock.lock().await;
        with_tx!(self, |db_tx| {
            let tx = self.require_transaction(&db_tx, cmd.transaction_id).await?;
            let new_amount = cmd.amount_minor.unwrap_or(tx.amount_minor);

            let updated = transactions::ActiveModel {
                id: ActiveValue::Set(cmd.transaction_id.to_string()),
                amount_minor: ActiveValue::Set(new_amount),
                voucher: ActiveValue::Set(
                    normalize_optional_text(cmd.voucher.as_deref()).or(tx.voucher.clone()),
                ),
                note: ActiveValue::Set(
                    normalize_optional_text(cmd.note.as_deref()).or(tx.note.clone()),
                ),
                occurred_at: ActiveValue::Set(cmd.occurred_at.unwrap_or(tx.occurred_at)),
                ..Default::default()
            };
            updated.update(&db_tx).await?;

            if tx.affects_balances() && new_amount != tx.amount_minor {
                // Re-base: revert the old contribution, apply the new one.
                apply_entry(
                    &db_tx,
                    tx.origin_account_id,
                    tx.destination_account_id,
                    new_amount - tx.amount_minor,
                )
                .await?;
            }
            Ok(())
        })
    }

    /// Hard-delete a transaction, reverting its balance effect if completed.
    pub async fn delete_transaction(&self, transaction_id: Uuid) -> ResultEngine<()> {
        let _guard = self.balance_lock.lock().await;
        with_tx!(self, |db_tx| {
            let tx = self.require_transaction(&db_tx, transaction_id).await?;

            transactions::Entity::delete_by_id(transaction_id.to_string())
                .exec(&db_tx)
                .await?;

            if tx.affects_balances() {
                apply_entry(
                    &db_tx,
                    tx.origin_account_id,
                    tx.destination_account_id,
                    -tx.amount_minor,
                )
                .await?;
            }
            tracing::debug!(transaction = %transaction_id, "transaction deleted");
            Ok(())
        })
    }

    /// Return a transaction (snapshot from DB).
    pub async fn transaction(&self, transaction_id: Uuid) -> ResultEngine<Transaction> {
        self.require_transaction(&self.database, transaction_id)
            .await
    }

    /// List transactions, newest first.
    pub async fn list_transactions(
        &self,
        filter: &TransactionListFilter,
        limit: u64,
    ) -> ResultEngine<Vec<Transaction>> {
        validate_list_filter(filter)?;

        let mut query = transactions::Entity::find()
            .order_by_desc(transactions::Column::OccurredAt)
            .order_by_desc(transactions::Column::Id)
            .limit(limit);

        if let Some(from) = filter.from {
            query = query.filter(transactions::Column::OccurredAt.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(transactions::Column::OccurredAt.lt(to));
        }
        if let Some(status) = filter.status {
            query = query.filter(transactions::Column::Status.eq(status.as_str()));
        }
        if let Some(account_id) = filter.account_id {
            let id = account_id.to_string();
            query = query.filter(
                Condition::any()
                    .add(transactions::Column::OriginAccountId.eq(id.clone()))
                    .add(transactions::Column::DestinationAccountId.eq(id)),
            );
        }

        let models = query.all(&self.database).await?;
        models.into_iter().map(Transaction::try_from).collect()
    }

    async fn require_transaction<C: sea_orm::ConnectionTrait>(
        &self,
        db: &C,
        transaction_id: Uuid,
    ) -> ResultEngine<Transaction> {
        let model = transactions::Entity::find_by_id(transaction_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;
        Transaction::try_from(model)
    }
}
