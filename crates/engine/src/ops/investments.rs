//! Investment operations.
//!
//! Investments have no pending state: creating one applies its balance deltas
//! immediately, deleting one reverts them.

use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, QuerySelect, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Currency, EngineError, Investment, ResultEngine, investments};

use super::{Engine, apply_entry, normalize_optional_text, require_account, with_tx};

/// Command for [`Engine::new_investment`].
#[derive(Clone, Debug)]
pub struct NewInvestmentCmd {
    pub origin_account_id: Uuid,
    pub destination_account_id: Uuid,
    pub amount_minor: i64,
    pub occurred_at: DateTime<Utc>,
    pub note: Option<String>,
    pub created_by: Option<String>,
}

impl Engine {
    /// Create an investment between two distinct, existing accounts and apply
    /// its balance deltas.
    pub async fn new_investment(&self, cmd: NewInvestmentCmd) -> ResultEngine<Uuid> {
        let _guard = self.balance_lock.lock().await;
        with_tx!(self, |db_tx| {
            require_account(&db_tx, cmd.origin_account_id).await?;
            require_account(&db_tx, cmd.destination_account_id).await?;

            let investment = Investment::new(
                cmd.origin_account_id,
                cmd.destination_account_id,
                cmd.amount_minor,
                Currency::default(),
                cmd.occurred_at,
                normalize_optional_text(cmd.note.as_deref()),
                normalize_optional_text(cmd.created_by.as_deref()),
            )?;
            let id = investment.id;
            investments::ActiveModel::from(&investment)
                .insert(&db_tx)
                .await?;

            apply_entry(
                &db_tx,
                investment.origin_account_id,
                investment.destination_account_id,
                investment.amount_minor,
            )
            .await?;
            tracing::debug!(investment = %id, "investment created");
            Ok(id)
        })
    }

    /// Hard-delete an investment and revert its balance effect.
    pub async fn delete_investment(&self, investment_id: Uuid) -> ResultEngine<()> {
        let _guard = self.balance_lock.lock().await;
        with_tx!(self, |db_tx| {
            let investment = self.require_investment(&db_tx, investment_id).await?;

            investments::Entity::delete_by_id(investment_id.to_string())
                .exec(&db_tx)
                .await?;

            apply_entry(
                &db_tx,
                investment.origin_account_id,
                investment.destination_account_id,
                -investment.amount_minor,
            )
            .await?;
            Ok(())
        })
    }

    /// Return an investment (snapshot from DB).
    pub async fn investment(&self, investment_id: Uuid) -> ResultEngine<Investment> {
        self.require_investment(&self.database, investment_id).await
    }

    /// List investments, newest first.
    pub async fn list_investments(&self, limit: u64) -> ResultEngine<Vec<Investment>> {
        let models = investments::Entity::find()
            .order_by_desc(investments::Column::OccurredAt)
            .order_by_desc(investments::Column::Id)
            .limit(limit)
            .all(&self.database)
            .await?;
        models.into_iter().map(Investment::try_from).collect()
    }

    async fn require_investment<C: sea_orm::ConnectionTrait>(
        &self,
        db: &C,
        investment_id: Uuid,
    ) -> ResultEngine<Investment> {
        let model = investments::Entity::find_by_id(investment_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("investment not exists".to_string()))?;
        Investment::try_from(model)
    }
}
