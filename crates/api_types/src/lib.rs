use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Cop,
}

pub mod account {
    use super::*;

    /// Kind of party an account tracks.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AccountKind {
        Mina,
        Comprador,
        Volquetero,
        Rodmar,
        Tercero,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: String,
        pub kind: AccountKind,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        pub id: Uuid,
        pub kind: AccountKind,
        pub name: String,
        /// Cached balance in minor units (centavos), signed.
        pub balance_minor: i64,
        pub currency: Currency,
        pub archived: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountsResponse {
        pub accounts: Vec<AccountView>,
    }

    /// Request body for PATCH /accounts/{id}.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountUpdate {
        pub name: Option<String>,
        pub archived: Option<bool>,
    }

    /// Response body for POST /accounts/{id}/recalculate.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountRecalculated {
        pub id: Uuid,
        pub balance_minor: i64,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionStatus {
        Pending,
        Completed,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub origin_account_id: Uuid,
        pub destination_account_id: Uuid,
        /// Must be > 0, in minor units (centavos).
        pub amount_minor: i64,
        pub status: TransactionStatus,
        /// RFC3339 timestamp.
        pub occurred_at: DateTime<Utc>,
        pub voucher: Option<String>,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub origin_account_id: Uuid,
        pub destination_account_id: Uuid,
        pub amount_minor: i64,
        pub currency: Currency,
        pub status: TransactionStatus,
        pub occurred_at: DateTime<Utc>,
        pub voucher: Option<String>,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }

    /// Query parameters for GET /transactions.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionList {
        pub from: Option<DateTime<Utc>>,
        pub to: Option<DateTime<Utc>>,
        pub status: Option<TransactionStatus>,
        pub account_id: Option<Uuid>,
        pub limit: Option<u64>,
    }

    /// Request body for PATCH /transactions/{id}. Absent fields are kept.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub amount_minor: Option<i64>,
        pub occurred_at: Option<DateTime<Utc>>,
        pub voucher: Option<String>,
        pub note: Option<String>,
    }
}

pub mod investment {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvestmentNew {
        pub origin_account_id: Uuid,
        pub destination_account_id: Uuid,
        /// Must be > 0, in minor units (centavos).
        pub amount_minor: i64,
        /// RFC3339 timestamp.
        pub occurred_at: DateTime<Utc>,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvestmentCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvestmentView {
        pub id: Uuid,
        pub origin_account_id: Uuid,
        pub destination_account_id: Uuid,
        pub amount_minor: i64,
        pub currency: Currency,
        pub occurred_at: DateTime<Utc>,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvestmentListResponse {
        pub investments: Vec<InvestmentView>,
    }

    /// Query parameters for GET /investments.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct InvestmentList {
        pub limit: Option<u64>,
    }
}

pub mod maintenance {
    use super::*;

    /// Response body for POST /maintenance/recalculate.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecalculateResponse {
        pub accounts_updated: usize,
        pub entries_processed: usize,
    }
}
