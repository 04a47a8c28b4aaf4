//! Transactions API endpoints

use api_types::transaction::{
    TransactionCreated, TransactionList, TransactionListResponse, TransactionNew,
    TransactionStatus as ApiStatus, TransactionUpdate, TransactionView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, accounts::map_currency, server::ServerState};

fn map_status(status: engine::TransactionStatus) -> ApiStatus {
    match status {
        engine::TransactionStatus::Pending => ApiStatus::Pending,
        engine::TransactionStatus::Completed => ApiStatus::Completed,
    }
}

fn map_api_status(status: ApiStatus) -> engine::TransactionStatus {
    match status {
        ApiStatus::Pending => engine::TransactionStatus::Pending,
        ApiStatus::Completed => engine::TransactionStatus::Completed,
    }
}

fn view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        origin_account_id: tx.origin_account_id,
        destination_account_id: tx.destination_account_id,
        amount_minor: tx.amount_minor,
        currency: map_currency(tx.currency),
        status: map_status(tx.status),
        occurred_at: tx.occurred_at,
        voucher: tx.voucher,
        note: tx.note,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(payload): Query<TransactionList>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let limit = payload.limit.unwrap_or(50);
    let filter = engine::TransactionListFilter {
        from: payload.from,
        to: payload.to,
        status: payload.status.map(map_api_status),
        account_id: payload.account_id,
    };

    let transactions = state.engine.list_transactions(&filter, limit).await?;
    Ok(Json(TransactionListResponse {
        transactions: transactions.into_iter().map(view).collect(),
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let id = state
        .engine
        .new_transaction(engine::NewTransactionCmd {
            origin_account_id: payload.origin_account_id,
            destination_account_id: payload.destination_account_id,
            amount_minor: payload.amount_minor,
            status: map_api_status(payload.status),
            occurred_at: payload.occurred_at,
            voucher: payload.voucher,
            note: payload.note,
            created_by: None,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(TransactionCreated { id })))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_transaction(engine::UpdateTransactionCmd {
            transaction_id: id,
            amount_minor: payload.amount_minor,
            voucher: payload.voucher,
            note: payload.note,
            occurred_at: payload.occurred_at,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn complete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.complete_transaction(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
