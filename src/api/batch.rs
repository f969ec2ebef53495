// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Batch request and confirmation endpoints used by the indexer poller.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{parse_address, ApiError},
    models::{AccountBatchRequest, BatchRequestResponse, SweepResponse},
    monitor::{BlockchainAccountBatchRequest, BlockchainAccountBatchUpdates},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/v1/batch-request",
    tag = "Batch",
    responses((status = 200, body = BatchRequestResponse))
)]
pub async fn get_batch_request(State(state): State<AppState>) -> Json<BatchRequestResponse> {
    let monitor = state.monitor.read().await;
    let accounts = monitor
        .make_batch_request()
        .into_iter()
        .map(|(account_address, request)| AccountBatchRequest {
            account_address,
            request,
        })
        .collect();
    Json(BatchRequestResponse { accounts })
}

#[utoipa::path(
    get,
    path = "/v1/accounts/{address}/batch-request",
    params(
        ("address" = String, Path, description = "Account address")
    ),
    tag = "Batch",
    responses((status = 200, body = BlockchainAccountBatchRequest))
)]
pub async fn get_account_batch_request(
    Path(address): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<BlockchainAccountBatchRequest>, ApiError> {
    let address = parse_address(address)?;

    let monitor = state.monitor.read().await;
    let request = monitor
        .account(&address)
        .map(|account| account.make_batch_request())
        .unwrap_or_default();
    Ok(Json(request))
}

#[utoipa::path(
    post,
    path = "/v1/accounts/{address}/batch-updates",
    params(
        ("address" = String, Path, description = "Account address")
    ),
    request_body = BlockchainAccountBatchUpdates,
    tag = "Batch",
    responses((status = 204, description = "Reported assets now wait for notification"))
)]
pub async fn apply_batch_updates(
    Path(address): Path<String>,
    State(state): State<AppState>,
    Json(updates): Json<BlockchainAccountBatchUpdates>,
) -> Result<StatusCode, ApiError> {
    let address = parse_address(address)?;

    if !updates.is_empty() {
        let mut monitor = state.monitor.write().await;
        monitor.apply_batch_updates(&address, &updates);
        tracing::info!(
            address = %address,
            opted_in = updates.opted_in_assets.len(),
            opted_out = updates.opted_out_assets.len(),
            sent_collectibles = updates.sent_pure_collectible_assets.len(),
            "Applied batch confirmations"
        );
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/v1/sweep",
    tag = "Batch",
    responses((status = 200, body = SweepResponse))
)]
pub async fn sweep(State(state): State<AppState>) -> Json<SweepResponse> {
    let mut monitor = state.monitor.write().await;
    monitor.remove_completed_updates();
    Json(SweepResponse {
        monitored_accounts: monitor.account_count(),
    })
}
