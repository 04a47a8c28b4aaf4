//! Account operations.

use sea_orm::{ActiveValue, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Account, AccountKind, Currency, EngineError, ResultEngine, accounts,
    util::normalize_lookup_key,
};

use super::{Engine, count_references, normalize_required_name, require_account, with_tx};

impl Engine {
    /// Create a new account.
    ///
    /// Names are unique under an accent/case-insensitive key, so
    /// "Mina El Níspero" and "mina el nispero" collide.
    pub async fn new_account(&self, name: &str, kind: AccountKind) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "account")?;
        let name_key = normalize_lookup_key(&name).ok_or_else(|| {
            EngineError::InvalidAccount("account name must contain letters or digits".to_string())
        })?;

        with_tx!(self, |db_tx| {
            let existing = accounts::Entity::find()
                .filter(accounts::Column::NameKey.eq(name_key.clone()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(name));
            }

            let account = Account::new(name, kind, Currency::default());
            let id = account.id;
            accounts::ActiveModel::from(&account).insert(&db_tx).await?;
            tracing::debug!(account = %id, kind = kind.as_str(), "account created");
            Ok(id)
        })
    }

    /// Return an account (snapshot from DB).
    pub async fn account(&self, account_id: Uuid) -> ResultEngine<Account> {
        let model = require_account(&self.database, account_id).await?;
        Account::try_from(model)
    }

    /// List all accounts, ordered by name.
    pub async fn list_accounts(&self) -> ResultEngine<Vec<Account>> {
        let models = accounts::Entity::find()
            .order_by_asc(accounts::Column::NameKey)
            .all(&self.database)
            .await?;
        models.into_iter().map(Account::try_from).collect()
    }

    /// Rename an account, keeping the normalized-name uniqueness invariant.
    pub async fn rename_account(&self, account_id: Uuid, name: &str) -> ResultEngine<()> {
        let name = normalize_required_name(name, "account")?;
        let name_key = normalize_lookup_key(&name).ok_or_else(|| {
            EngineError::InvalidAccount("account name must contain letters or digits".to_string())
        })?;

        with_tx!(self, |db_tx| {
            let model = require_account(&db_tx, account_id).await?;
            let clash = accounts::Entity::find()
                .filter(accounts::Column::NameKey.eq(name_key.clone()))
                .filter(accounts::Column::Id.ne(model.id.clone()))
                .one(&db_tx)
                .await?;
            if clash.is_some() {
                return Err(EngineError::ExistingKey(name));
            }

            let updated = accounts::ActiveModel {
                id: ActiveValue::Set(model.id),
                name: ActiveValue::Set(name),
                name_key: ActiveValue::Set(name_key),
                ..Default::default()
            };
            updated.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Archive an account (soft hide; its ledger history stays intact).
    pub async fn archive_account(&self, account_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = require_account(&db_tx, account_id).await?;
            let updated = accounts::ActiveModel {
                id: ActiveValue::Set(model.id),
                archived: ActiveValue::Set(true),
                ..Default::default()
            };
            updated.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Hard-delete an account.
    ///
    /// Rejected while any transaction or investment references the account;
    /// archive instead.
    pub async fn delete_account(&self, account_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = require_account(&db_tx, account_id).await?;
            let references = count_references(&db_tx, account_id).await?;
            if references > 0 {
                return Err(EngineError::AccountInUse(format!(
                    "account {} is referenced by {references} ledger entries",
                    model.name
                )));
            }
            accounts::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })
    }
}
