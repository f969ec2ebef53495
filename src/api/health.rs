// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response with monitor occupancy.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall health status.
    pub status: String,
    /// Accounts with at least one tracked update.
    pub monitored_accounts: usize,
    /// Whether anything is still being tracked.
    pub has_monitoring_updates: bool,
}

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Health check endpoint handler.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = ReadyResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<ReadyResponse> {
    let monitor = state.monitor.read().await;
    Json(ReadyResponse {
        status: "ok".to_string(),
        monitored_accounts: monitor.account_count(),
        has_monitoring_updates: monitor.has_monitoring_updates(),
    })
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{AssetSnapshot, OptInBlockchainRequest};

    #[tokio::test]
    async fn health_reports_monitor_occupancy() {
        let state = AppState::default();
        let Json(empty) = health(State(state.clone())).await;
        assert_eq!(empty.monitored_accounts, 0);
        assert!(!empty.has_monitoring_updates);

        state
            .monitor
            .write()
            .await
            .start_monitoring_opt_in_updates(OptInBlockchainRequest::new(
                "ADDR",
                AssetSnapshot::standard(1, None, None),
            ));

        let Json(busy) = health(State(state)).await;
        assert_eq!(busy.status, "ok");
        assert_eq!(busy.monitored_accounts, 1);
        assert!(busy.has_monitoring_updates);
    }

    #[tokio::test]
    async fn liveness_is_ok() {
        let Json(response) = liveness().await;
        assert_eq!(response.status, "ok");
    }
}
