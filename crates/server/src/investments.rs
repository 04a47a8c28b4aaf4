//! Investments API endpoints

use api_types::investment::{
    InvestmentCreated, InvestmentList, InvestmentListResponse, InvestmentNew, InvestmentView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, accounts::map_currency, server::ServerState};

fn view(investment: engine::Investment) -> InvestmentView {
    InvestmentView {
        id: investment.id,
        origin_account_id: investment.origin_account_id,
        destination_account_id: investment.destination_account_id,
        amount_minor: investment.amount_minor,
        currency: map_currency(investment.currency),
        occurred_at: investment.occurred_at,
        note: investment.note,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(payload): Query<InvestmentList>,
) -> Result<Json<InvestmentListResponse>, ServerError> {
    let limit = payload.limit.unwrap_or(50);
    let investments = state.engine.list_investments(limit).await?;
    Ok(Json(InvestmentListResponse {
        investments: investments.into_iter().map(view).collect(),
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<InvestmentNew>,
) -> Result<(StatusCode, Json<InvestmentCreated>), ServerError> {
    let id = state
        .engine
        .new_investment(engine::NewInvestmentCmd {
            origin_account_id: payload.origin_account_id,
            destination_account_id: payload.destination_account_id,
            amount_minor: payload.amount_minor,
            occurred_at: payload.occurred_at,
            note: payload.note,
            created_by: None,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(InvestmentCreated { id })))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_investment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
