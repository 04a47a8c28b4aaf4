//! Account primitives.
//!
//! An `Account` is a balance-carrying counterparty or internal cash box. The
//! `balance_minor` column is a denormalized cache over the ledger; the single
//! source of truth that regenerates it is `Engine::recalculate_all` /
//! `Engine::recalculate_for_account`.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, EngineError, ResultEngine, util};

/// Closed set of account kinds.
///
/// Every counterparty is one of these variants; dispatch on kind goes
/// through this enum rather than string tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    /// Mine the business buys from.
    Mina,
    /// Buyer of material.
    Comprador,
    /// Trucker hauling material.
    Volquetero,
    /// Internal cash/bank account controlled by the business.
    Rodmar,
    /// Generic third party (credit card, loan, ...).
    Tercero,
}

impl AccountKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mina => "mina",
            Self::Comprador => "comprador",
            Self::Volquetero => "volquetero",
            Self::Rodmar => "rodmar",
            Self::Tercero => "tercero",
        }
    }
}

impl TryFrom<&str> for AccountKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "mina" => Ok(Self::Mina),
            "comprador" => Ok(Self::Comprador),
            "volquetero" => Ok(Self::Volquetero),
            "rodmar" => Ok(Self::Rodmar),
            "tercero" => Ok(Self::Tercero),
            other => Err(EngineError::InvalidAccount(format!(
                "invalid account kind: {other}"
            ))),
        }
    }
}

/// An account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Stable identifier, generated once and persisted so the account can be
    /// renamed without breaking ledger references.
    pub id: Uuid,
    pub kind: AccountKind,
    pub name: String,
    /// Cached fold of all qualifying ledger entries touching this account.
    pub balance_minor: i64,
    pub currency: Currency,
    pub archived: bool,
}

impl Account {
    pub fn new(name: String, kind: AccountKind, currency: Currency) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            name,
            balance_minor: 0,
            currency,
            archived: false,
        }
    }

    pub fn archive(&mut self) {
        self.archived = true;
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub name: String,
    /// Normalized uniqueness key for `name` (accent/case-insensitive).
    pub name_key: String,
    pub balance_minor: i64,
    pub currency: String,
    pub archived: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Account> for ActiveModel {
    fn from(account: &Account) -> Self {
        let name_key = util::normalize_lookup_key(&account.name).unwrap_or_default();
        Self {
            id: ActiveValue::Set(account.id.to_string()),
            kind: ActiveValue::Set(account.kind.as_str().to_string()),
            name: ActiveValue::Set(account.name.clone()),
            name_key: ActiveValue::Set(name_key),
            balance_minor: ActiveValue::Set(account.balance_minor),
            currency: ActiveValue::Set(account.currency.code().to_string()),
            archived: ActiveValue::Set(account.archived),
        }
    }
}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: util::parse_uuid(&model.id, "account")?,
            kind: AccountKind::try_from(model.kind.as_str())?,
            name: model.name,
            balance_minor: model.balance_minor,
            currency: Currency::try_from(model.currency.as_str()).unwrap_or_default(),
            archived: model.archived,
        })
    }
}
