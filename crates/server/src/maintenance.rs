//! Maintenance API endpoints

use api_types::maintenance::RecalculateResponse;
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

/// Rebuild every cached account balance from the ledger.
pub async fn recalculate(
    State(state): State<ServerState>,
) -> Result<Json<RecalculateResponse>, ServerError> {
    let summary = state.engine.recalculate_all().await?;
    Ok(Json(RecalculateResponse {
        accounts_updated: summary.accounts_updated,
        entries_processed: summary.entries_processed,
    }))
}
