//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when an item is not found.
//! - [`LedgerIntegrity`] thrown when a ledger entry references a missing
//!   account; a recalculation sweep that hits it is rolled back whole.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`LedgerIntegrity`]: EngineError::LedgerIntegrity
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid account: {0}")]
    InvalidAccount(String),
    #[error("Account in use: {0}")]
    AccountInUse(String),
    #[error("Status conflict: {0}")]
    StatusConflict(String),
    #[error("Ledger integrity violation: {0}")]
    LedgerIntegrity(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidAccount(a), Self::InvalidAccount(b)) => a == b,
            (Self::AccountInUse(a), Self::AccountInUse(b)) => a == b,
            (Self::StatusConflict(a), Self::StatusConflict(b)) => a == b,
            (Self::LedgerIntegrity(a), Self::LedgerIntegrity(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
