//! Transaction primitives.
//!
//! A `Transaction` moves money from an origin account to a destination
//! account. Only **completed** transactions affect cached balances; a pending
//! one is recorded but contributes nothing until it is completed.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, EngineError, ResultEngine, util};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl TryFrom<&str> for TransactionStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid transaction status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub origin_account_id: Uuid,
    pub destination_account_id: Uuid,
    pub amount_minor: i64,
    pub currency: Currency,
    pub status: TransactionStatus,
    pub occurred_at: DateTime<Utc>,
    /// Opaque reference to attached evidence (voucher file/URL).
    pub voucher: Option<String>,
    pub note: Option<String>,
    pub created_by: Option<String>,
}

impl Transaction {
    pub fn new(
        origin_account_id: Uuid,
        destination_account_id: Uuid,
        amount_minor: i64,
        currency: Currency,
        status: TransactionStatus,
        occurred_at: DateTime<Utc>,
        voucher: Option<String>,
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
            status,
            occurred_at,
            voucher,
            note,
            created_by,
        })
    }

    /// Whether this transaction contributes to balances.
    #[must_use]
    pub fn affects_balances(&self) -> bool {
        self.status == TransactionStatus::Completed
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub origin_account_id: String,
    pub destination_account_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub status: String,
    pub occurred_at: DateTimeUtc,
    pub voucher: Option<String>,
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

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            origin_account_id: ActiveValue::Set(tx.origin_account_id.to_string()),
            destination_account_id: ActiveValue::Set(tx.destination_account_id.to_string()),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            currency: ActiveValue::Set(tx.currency.code().to_string()),
            status: ActiveValue::Set(tx.status.as_str().to_string()),
            occurred_at: ActiveValue::Set(tx.occurred_at),
            voucher: ActiveValue::Set(tx.voucher.clone()),
            note: ActiveValue::Set(tx.note.clone()),
            created_by: ActiveValue::Set(tx.created_by.clone()),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: util::parse_uuid(&model.id, "transaction")?,
            origin_account_id: util::parse_uuid(&model.origin_account_id, "origin account")?,
            destination_account_id: util::parse_uuid(
                &model.destination_account_id,
                "destination account",
            )?,
            amount_minor: model.amount_minor,
            currency: Currency::try_from(model.currency.as_str()).unwrap_or_default(),
            status: TransactionStatus::try_from(model.status.as_str())?,
            occurred_at: model.occurred_at,
            voucher: model.voucher,
            note: model.note,
            created_by: model.created_by,
        })
    }
}
