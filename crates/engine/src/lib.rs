pub use accounts::{Account, AccountKind};
pub use currency::Currency;
pub use error::EngineError;
pub use investments::Investment;
pub use ledger::LedgerEntry;
pub use money::Money;
pub use ops::{
    Engine, EngineBuilder, NewInvestmentCmd, NewTransactionCmd, RecalcSummary,
    TransactionListFilter, UpdateTransactionCmd,
};
pub use transactions::{Transaction, TransactionStatus};

mod accounts;
mod currency;
mod error;
mod investments;
mod ledger;
mod money;
mod ops;
mod transactions;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
