// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-account update endpoints.
//!
//! Every route is parameterized by [`UpdateKind`]; the handler dispatches to
//! the matching family of the monitor. Confirming or finishing an asset that
//! is not tracked is a silent no-op and still answers `204`.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::{ensure_text_len, parse_address, ApiError},
    models::{
        AccountAddress, AccountSummary, MonitoredUpdate, PendingRequestResponse,
        StartMonitoringRequest, UpdateKind, UpdateListQuery,
    },
    monitor::{
        AssetId, BlockchainUpdate, BlockchainUpdateStatus, BlockchainUpdatesMonitor,
        MonitoredRequest, OptInBlockchainRequest, OptOutBlockchainRequest,
        SendPureCollectibleAssetBlockchainRequest,
    },
    state::AppState,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct FinishQuery {
    /// The transaction was never sent (signing failed or was abandoned).
    #[serde(default)]
    pub cancelled: bool,
}

fn views<R: MonitoredRequest>(
    kind: UpdateKind,
    updates: HashMap<AssetId, BlockchainUpdate<R>>,
) -> impl Iterator<Item = MonitoredUpdate> {
    updates
        .into_values()
        .map(move |update| MonitoredUpdate::from_update(kind, &update))
}

/// Collect one account's updates of `kind`, optionally restricted to a status.
pub fn collect_updates(
    monitor: &BlockchainUpdatesMonitor,
    address: &AccountAddress,
    kind: UpdateKind,
    status: Option<BlockchainUpdateStatus>,
) -> Vec<MonitoredUpdate> {
    let want_pending = status != Some(BlockchainUpdateStatus::WaitingForNotification);
    let want_waiting = status != Some(BlockchainUpdateStatus::Pending);

    let mut updates: Vec<MonitoredUpdate> = Vec::new();
    match kind {
        UpdateKind::OptIn => {
            if want_pending {
                updates.extend(views(kind, monitor.filter_pending_opt_in_asset_updates_for(address)));
            }
            if want_waiting {
                updates.extend(views(kind, monitor.filter_opted_in_asset_updates_for(address)));
            }
        }
        UpdateKind::OptOut => {
            if want_pending {
                updates.extend(views(kind, monitor.filter_pending_opt_out_asset_updates_for(address)));
            }
            if want_waiting {
                updates.extend(views(kind, monitor.filter_opted_out_asset_updates_for(address)));
            }
        }
        UpdateKind::SendPureCollectible => {
            if want_pending {
                updates.extend(views(
                    kind,
                    monitor.filter_pending_send_pure_collectible_asset_updates_for(address),
                ));
            }
            if want_waiting {
                updates.extend(views(
                    kind,
                    monitor.filter_sent_pure_collectible_asset_updates_for(address),
                ));
            }
        }
    }

    updates.sort_by_key(|update| update.asset.id);
    updates
}

#[utoipa::path(
    get,
    path = "/v1/accounts/{address}",
    params(
        ("address" = String, Path, description = "Account address")
    ),
    tag = "Accounts",
    responses((status = 200, body = AccountSummary))
)]
pub async fn get_account(
    Path(address): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<AccountSummary>, ApiError> {
    let address = parse_address(address)?;

    let monitor = state.monitor.read().await;
    let summary = monitor
        .account(&address)
        .map(|account| account.summary())
        .unwrap_or_else(|| AccountSummary::empty(address));
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/v1/accounts/{address}/updates/{kind}",
    params(
        ("address" = String, Path, description = "Account address"),
        ("kind" = UpdateKind, Path, description = "Update family"),
        UpdateListQuery
    ),
    tag = "Updates",
    responses((status = 200, body = [MonitoredUpdate]))
)]
pub async fn list_updates(
    Path((address, kind)): Path<(String, UpdateKind)>,
    Query(query): Query<UpdateListQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<MonitoredUpdate>>, ApiError> {
    let address = parse_address(address)?;

    let monitor = state.monitor.read().await;
    Ok(Json(collect_updates(&monitor, &address, kind, query.status)))
}

#[utoipa::path(
    post,
    path = "/v1/accounts/{address}/updates/{kind}",
    params(
        ("address" = String, Path, description = "Account address"),
        ("kind" = UpdateKind, Path, description = "Update family")
    ),
    request_body = StartMonitoringRequest,
    tag = "Updates",
    responses(
        (status = 201, body = MonitoredUpdate),
        (status = 400, description = "Empty account address"),
        (status = 422, description = "Asset text fields too long")
    )
)]
pub async fn start_monitoring(
    Path((address, kind)): Path<(String, UpdateKind)>,
    State(state): State<AppState>,
    Json(request): Json<StartMonitoringRequest>,
) -> Result<(StatusCode, Json<MonitoredUpdate>), ApiError> {
    let address = parse_address(address)?;

    let asset = request.asset;
    ensure_text_len("asset name", asset.name.as_deref())?;
    ensure_text_len("asset unit name", asset.unit_name.as_deref())?;
    ensure_text_len("collectible title", asset.collectible_title.as_deref())?;
    ensure_text_len("collection name", asset.collectible_collection_name.as_deref())?;
    ensure_text_len(
        "collectible thumbnail image",
        asset.collectible_thumbnail_image.as_deref(),
    )?;
    let asset_id = asset.id;

    let mut monitor = state.monitor.write().await;
    match kind {
        UpdateKind::OptIn => {
            monitor.start_monitoring_opt_in_updates(OptInBlockchainRequest::new(address.clone(), asset))
        }
        UpdateKind::OptOut => {
            monitor.start_monitoring_opt_out_updates(OptOutBlockchainRequest::new(address.clone(), asset))
        }
        UpdateKind::SendPureCollectible => monitor.start_monitoring_send_pure_collectible_asset_updates(
            SendPureCollectibleAssetBlockchainRequest::new(address.clone(), asset),
        ),
    }

    let update = collect_updates(&monitor, &address, kind, Some(BlockchainUpdateStatus::Pending))
        .into_iter()
        .find(|update| update.asset.id == asset_id)
        .ok_or_else(|| {
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Update was not recorded")
        })?;

    tracing::info!(address = %address, kind = %kind, asset_id, "Started monitoring update");
    Ok((StatusCode::CREATED, Json(update)))
}

#[utoipa::path(
    get,
    path = "/v1/accounts/{address}/updates/{kind}/{asset_id}",
    params(
        ("address" = String, Path, description = "Account address"),
        ("kind" = UpdateKind, Path, description = "Update family"),
        ("asset_id" = u64, Path, description = "Asset identifier")
    ),
    tag = "Updates",
    responses((status = 200, body = PendingRequestResponse))
)]
pub async fn pending_request(
    Path((address, kind, asset_id)): Path<(String, UpdateKind, AssetId)>,
    State(state): State<AppState>,
) -> Result<Json<PendingRequestResponse>, ApiError> {
    let address = parse_address(address)?;

    let monitor = state.monitor.read().await;
    let pending = match kind {
        UpdateKind::OptIn => monitor.has_pending_opt_in_request(asset_id, &address),
        UpdateKind::OptOut => monitor.has_pending_opt_out_request(asset_id, &address),
        UpdateKind::SendPureCollectible => {
            monitor.has_pending_send_pure_collectible_asset_request(asset_id, &address)
        }
    };

    Ok(Json(PendingRequestResponse {
        kind,
        asset_id,
        pending,
    }))
}

#[utoipa::path(
    post,
    path = "/v1/accounts/{address}/updates/{kind}/{asset_id}/confirmation",
    params(
        ("address" = String, Path, description = "Account address"),
        ("kind" = UpdateKind, Path, description = "Update family"),
        ("asset_id" = u64, Path, description = "Asset identifier")
    ),
    tag = "Updates",
    responses((status = 204, description = "Pending update, if any, now waits for notification"))
)]
pub async fn confirm_update(
    Path((address, kind, asset_id)): Path<(String, UpdateKind, AssetId)>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let address = parse_address(address)?;

    let mut monitor = state.monitor.write().await;
    match kind {
        UpdateKind::OptIn => monitor.mark_opt_in_updates_for_notification(asset_id, &address),
        UpdateKind::OptOut => monitor.mark_opt_out_updates_for_notification(asset_id, &address),
        UpdateKind::SendPureCollectible => {
            monitor.mark_send_pure_collectible_asset_updates_for_notification(asset_id, &address)
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/v1/accounts/{address}/updates/{kind}/{asset_id}",
    params(
        ("address" = String, Path, description = "Account address"),
        ("kind" = UpdateKind, Path, description = "Update family"),
        ("asset_id" = u64, Path, description = "Asset identifier"),
        FinishQuery
    ),
    tag = "Updates",
    responses((status = 204, description = "Update, if any, removed"))
)]
pub async fn finish_monitoring(
    Path((address, kind, asset_id)): Path<(String, UpdateKind, AssetId)>,
    Query(query): Query<FinishQuery>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let address = parse_address(address)?;

    let mut monitor = state.monitor.write().await;
    match (kind, query.cancelled) {
        (UpdateKind::OptIn, false) => monitor.finish_monitoring_opt_in_updates(asset_id, &address),
        (UpdateKind::OptIn, true) => monitor.cancel_monitoring_opt_in_updates(asset_id, &address),
        (UpdateKind::OptOut, false) => monitor.finish_monitoring_opt_out_updates(asset_id, &address),
        (UpdateKind::OptOut, true) => monitor.cancel_monitoring_opt_out_updates(asset_id, &address),
        (UpdateKind::SendPureCollectible, false) => {
            monitor.finish_monitoring_send_pure_collectible_asset_updates(asset_id, &address)
        }
        (UpdateKind::SendPureCollectible, true) => {
            monitor.cancel_monitoring_send_pure_collectible_asset_updates(asset_id, &address)
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::AssetSnapshot;

    const ADDRESS: &str = "ALICE";

    fn start_body(asset_id: AssetId) -> StartMonitoringRequest {
        StartMonitoringRequest {
            asset: AssetSnapshot::standard(asset_id, Some("USD Coin".into()), Some("USDC".into())),
        }
    }

    async fn start(state: &AppState, kind: UpdateKind, asset_id: AssetId) -> MonitoredUpdate {
        let (status, Json(update)) = start_monitoring(
            Path((ADDRESS.to_string(), kind)),
            State(state.clone()),
            Json(start_body(asset_id)),
        )
        .await
        .expect("start succeeds");
        assert_eq!(status, StatusCode::CREATED);
        update
    }

    #[tokio::test]
    async fn start_returns_pending_update() {
        let state = AppState::default();
        let update = start(&state, UpdateKind::OptIn, 31566704).await;

        assert_eq!(update.kind, UpdateKind::OptIn);
        assert_eq!(update.status, BlockchainUpdateStatus::Pending);
        assert_eq!(update.asset.id, 31566704);
        assert_eq!(update.account_address.as_str(), ADDRESS);
        assert!(update.confirmed_at.is_none());
    }

    #[tokio::test]
    async fn start_rejects_blank_address() {
        let state = AppState::default();
        let err = start_monitoring(
            Path(("  ".to_string(), UpdateKind::OptOut)),
            State(state.clone()),
            Json(start_body(1)),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(state.monitor.read().await.account_count(), 0);
    }

    #[tokio::test]
    async fn start_rejects_oversized_name() {
        let state = AppState::default();
        let mut body = start_body(1);
        body.asset.name = Some("n".repeat(1000));

        let err = start_monitoring(
            Path((ADDRESS.to_string(), UpdateKind::OptIn)),
            State(state),
            Json(body),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn start_rejects_oversized_thumbnail() {
        let state = AppState::default();
        let mut body = start_body(1);
        body.asset.collectible_thumbnail_image = Some("https://".to_string() + &"a".repeat(1000));

        let err = start_monitoring(
            Path((ADDRESS.to_string(), UpdateKind::SendPureCollectible)),
            State(state.clone()),
            Json(body),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(state.monitor.read().await.account_count(), 0);
    }

    #[tokio::test]
    async fn padded_address_maps_to_same_account() {
        let state = AppState::default();
        start(&state, UpdateKind::OptIn, 1).await;

        let (_, Json(update)) = start_monitoring(
            Path((format!(" {ADDRESS} "), UpdateKind::OptIn)),
            State(state.clone()),
            Json(start_body(2)),
        )
        .await
        .unwrap();
        assert_eq!(update.account_address.as_str(), ADDRESS);

        let monitor = state.monitor.read().await;
        assert_eq!(monitor.account_count(), 1);
        assert_eq!(
            monitor
                .filter_pending_opt_in_asset_updates_for(&AccountAddress::from(ADDRESS))
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn confirm_then_list_waiting() {
        let state = AppState::default();
        start(&state, UpdateKind::OptOut, 5).await;
        start(&state, UpdateKind::OptOut, 6).await;

        let status = confirm_update(
            Path((ADDRESS.to_string(), UpdateKind::OptOut, 5)),
            State(state.clone()),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let Json(waiting) = list_updates(
            Path((ADDRESS.to_string(), UpdateKind::OptOut)),
            Query(UpdateListQuery {
                status: Some(BlockchainUpdateStatus::WaitingForNotification),
            }),
            State(state.clone()),
        )
        .await
        .unwrap();
        assert_eq!(waiting.len(), 1);
        assert_eq!(waiting[0].asset.id, 5);
        assert!(waiting[0].confirmed_at.is_some());

        let Json(all) = list_updates(
            Path((ADDRESS.to_string(), UpdateKind::OptOut)),
            Query(UpdateListQuery::default()),
            State(state),
        )
        .await
        .unwrap();
        assert_eq!(all.iter().map(|u| u.asset.id).collect::<Vec<_>>(), vec![5, 6]);
    }

    #[tokio::test]
    async fn pending_request_reflects_lifecycle() {
        let state = AppState::default();
        start(&state, UpdateKind::SendPureCollectible, 9).await;

        let Json(before) = pending_request(
            Path((ADDRESS.to_string(), UpdateKind::SendPureCollectible, 9)),
            State(state.clone()),
        )
        .await
        .unwrap();
        assert!(before.pending);

        confirm_update(
            Path((ADDRESS.to_string(), UpdateKind::SendPureCollectible, 9)),
            State(state.clone()),
        )
        .await
        .unwrap();

        let Json(after) = pending_request(
            Path((ADDRESS.to_string(), UpdateKind::SendPureCollectible, 9)),
            State(state),
        )
        .await
        .unwrap();
        assert!(!after.pending);
    }

    #[tokio::test]
    async fn finish_and_cancel_remove_entries() {
        let state = AppState::default();
        start(&state, UpdateKind::OptIn, 1).await;
        start(&state, UpdateKind::OptIn, 2).await;

        finish_monitoring(
            Path((ADDRESS.to_string(), UpdateKind::OptIn, 1)),
            Query(FinishQuery::default()),
            State(state.clone()),
        )
        .await
        .unwrap();
        finish_monitoring(
            Path((ADDRESS.to_string(), UpdateKind::OptIn, 2)),
            Query(FinishQuery { cancelled: true }),
            State(state.clone()),
        )
        .await
        .unwrap();

        // Absent entries are a silent no-op.
        let status = finish_monitoring(
            Path((ADDRESS.to_string(), UpdateKind::OptIn, 3)),
            Query(FinishQuery::default()),
            State(state.clone()),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let Json(summary) = get_account(Path(ADDRESS.to_string()), State(state))
            .await
            .unwrap();
        assert!(!summary.has_monitoring_updates);
    }

    #[tokio::test]
    async fn unknown_account_summary_is_empty() {
        let state = AppState::default();
        let Json(summary) = get_account(Path("NOBODY".to_string()), State(state))
            .await
            .unwrap();
        assert_eq!(summary, AccountSummary::empty(AccountAddress::from("NOBODY")));
    }
}
