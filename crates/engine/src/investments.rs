//! Investment primitives.
//!
//! An `Investment` has the same ledger effect as a completed transaction
//! (origin loses, destination gains) but is tracked as a separate entry type
//! and has **no pending state**: it always affects balances.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, EngineError, ResultEngine, util};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investment {
    pub id: Uuid,
    pub origin_account_id: Uuid,
    pub destination_account_id: Uuid,
    pub amount_minor: i64,
    pub currency: Currency,
    pub occurred_at: DateTime<Utc>,
    pub note: Option<String>,
    pub created_by: Option<String>,
}

impl Investment {
    pub fn new(
        origin_account_id: Uuid,
        destination_account_id: Uuid,
        amount_minor: i64,
        currency: Currency,
        occurred_at: DateTime<Utc>,
        note: Option<String>,
        created_by: Option<String>,
    ) -> ResultEngine<Self> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        if origin_account_id == destination_account_id {
            return Err(EngineError::InvalidAccount(
                "origin and destination must differ".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            origin_account_id,
            destination_account_id,
            amount_minor,
            currency,
            occurred_at,
            note,
            created_by,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "investments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub origin_account_id: String,
    pub destination_account_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub occurred_at: DateTimeUtc,
    pub note: Option<String>,
    pub created_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::OriginAccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    OriginAccount,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::DestinationAccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    DestinationAccount,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Investment> for ActiveModel {
    fn from(investment: &Investment) -> Self {
        Self {
            id: ActiveValue::Set(investment.id.to_string()),
            origin_account_id: ActiveValue::Set(investment.origin_account_id.to_string()),
            destination_account_id: ActiveValue::Set(
                investment.destination_account_id.to_string(),
            ),
            amount_minor: ActiveValue::Set(investment.amount_minor),
            currency: ActiveValue::Set(investment.currency.code().to_string()),
            occurred_at: ActiveValue::Set(investment.occurred_at),
            note: ActiveValue::Set(investment.note.clone()),
            created_by: ActiveValue::Set(investment.created_by.clone()),
        }
    }
}

impl TryFrom<Model> for Investment {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: util::parse_uuid(&model.id, "investment")?,
            origin_account_id: util::parse_uuid(&model.origin_account_id, "origin account")?,
            destination_account_id: util::parse_uuid(
                &model.destination_account_id,
                "destination account",
            )?,
            amount_minor: model.amount_minor,
            currency: Currency::try_from(model.currency.as_str()).unwrap_or_default(),
            occurred_at: model.occurred_at,
            note: model.note,
            created_by: model.created_by,
        })
    }
}
