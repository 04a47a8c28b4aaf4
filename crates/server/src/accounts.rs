//! Accounts API endpoints

use api_types::account::{
    AccountCreated, AccountKind as ApiKind, AccountNew, AccountRecalculated, AccountUpdate,
    AccountView, AccountsResponse,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_kind(kind: engine::AccountKind) -> ApiKind {
    match kind {
        engine::AccountKind::Mina => ApiKind::Mina,
        engine::AccountKind::Comprador => ApiKind::Comprador,
        engine::AccountKind::Volquetero => ApiKind::Volquetero,
        engine::AccountKind::Rodmar => ApiKind::Rodmar,
        engine::AccountKind::Tercero => ApiKind::Tercero,
    }
}

fn map_api_kind(kind: ApiKind) -> engine::AccountKind {
    match kind {
        ApiKind::Mina => engine::AccountKind::Mina,
        ApiKind::Comprador => engine::AccountKind::Comprador,
        ApiKind::Volquetero => engine::AccountKind::Volquetero,
        ApiKind::Rodmar => engine::AccountKind::Rodmar,
        ApiKind::Tercero => engine::AccountKind::Tercero,
    }
}

pub(crate) fn map_currency(currency: engine::Currency) -> api_types::Currency {
    match currency {
        engine::Currency::Cop => api_types::Currency::Cop,
    }
}

fn view(account: engine::Account) -> AccountView {
    AccountView {
        id: account.id,
        kind: map_kind(account.kind),
        name: account.name,
        balance_minor: account.balance_minor,
        currency: map_currency(account.currency),
        archived: account.archived,
    }
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<AccountsResponse>, ServerError> {
    let accounts = state.engine.list_accounts().await?;
    Ok(Json(AccountsResponse {
        accounts: accounts.into_iter().map(view).collect(),
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<AccountNew>,
) -> Result<(StatusCode, Json<AccountCreated>), ServerError> {
    let id = state
        .engine
        .new_account(&payload.name, map_api_kind(payload.kind))
        .await?;
    Ok((StatusCode::CREATED, Json(AccountCreated { id })))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountView>, ServerError> {
    let account = state.engine.account(id).await?;
    Ok(Json(view(account)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AccountUpdate>,
) -> Result<StatusCode, ServerError> {
    if let Some(name) = payload.name.as_deref() {
        state.engine.rename_account(id, name).await?;
    }
    match payload.archived {
        Some(true) => state.engine.archive_account(id).await?,
        Some(false) => {
            return Err(ServerError::Generic(
                "unarchiving is not supported".to_string(),
            ));
        }
        None => {}
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_account(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn recalculate(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountRecalculated>, ServerError> {
    let balance_minor = state.engine.recalculate_for_account(id).await?;
    Ok(Json(AccountRecalculated { id, balance_minor }))
}
