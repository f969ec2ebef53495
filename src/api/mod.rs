// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::ApiError,
    models::{
        AccountAddress, AccountBatchRequest, AccountSummary, BatchRequestResponse,
        MonitoredUpdate, PendingRequestResponse, StartMonitoringRequest, SweepResponse,
        UpdateCounts, UpdateKind,
    },
    monitor::{
        AssetSnapshot, AssetVerificationTier, BlockchainAccountBatchRequest,
        BlockchainAccountBatchUpdates, BlockchainUpdateStatus,
    },
    state::AppState,
};

pub mod batch;
pub mod health;
pub mod updates;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/accounts/{address}", get(updates::get_account))
        .route(
            "/accounts/{address}/updates/{kind}",
            get(updates::list_updates).post(updates::start_monitoring),
        )
        .route(
            "/accounts/{address}/updates/{kind}/{asset_id}",
            get(updates::pending_request).delete(updates::finish_monitoring),
        )
        .route(
            "/accounts/{address}/updates/{kind}/{asset_id}/confirmation",
            post(updates::confirm_update),
        )
        .route(
            "/accounts/{address}/batch-request",
            get(batch::get_account_batch_request),
        )
        .route(
            "/accounts/{address}/batch-updates",
            post(batch::apply_batch_updates),
        )
        .route("/batch-request", get(batch::get_batch_request))
        .route("/sweep", post(batch::sweep));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .nest("/v1", v1_routes)
        .fallback(unknown_route)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

async fn unknown_route(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        updates::get_account,
        updates::list_updates,
        updates::start_monitoring,
        updates::pending_request,
        updates::confirm_update,
        updates::finish_monitoring,
        batch::get_batch_request,
        batch::get_account_batch_request,
        batch::apply_batch_updates,
        batch::sweep
    ),
    components(
        schemas(
            AccountAddress,
            AccountSummary,
            UpdateCounts,
            UpdateKind,
            MonitoredUpdate,
            StartMonitoringRequest,
            PendingRequestResponse,
            AssetSnapshot,
            AssetVerificationTier,
            BlockchainUpdateStatus,
            BlockchainAccountBatchRequest,
            BlockchainAccountBatchUpdates,
            AccountBatchRequest,
            BatchRequestResponse,
            SweepResponse,
            health::ReadyResponse,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness and monitor occupancy"),
        (name = "Accounts", description = "Per-account monitoring summary"),
        (name = "Updates", description = "Opt-in, opt-out and collectible send tracking"),
        (name = "Batch", description = "Coalesced poll requests, confirmations and sweeps")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(AppState::default());
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn unknown_kind_is_rejected() {
        let app = router(AppState::default());
        let response = app
            .oneshot(
                Request::get("/v1/accounts/ALICE/updates/airdrop")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let app = router(AppState::default());
        let response = app
            .oneshot(Request::get("/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn unknown_route_answers_json_not_found() {
        let app = router(AppState::default());
        let response = app
            .oneshot(Request::get("/v1/wallets").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"error":"No route for /v1/wallets"}"#);
    }

    #[test]
    fn openapi_lists_update_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc
            .paths
            .paths
            .contains_key("/v1/accounts/{address}/updates/{kind}/{asset_id}/confirmation"));
        assert!(doc.paths.paths.contains_key("/v1/batch-request"));
    }
}
