// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::request::{
    AssetId, MonitoredRequest, OptInBlockchainRequest, OptOutBlockchainRequest,
    SendPureCollectibleAssetBlockchainRequest,
};
use crate::models::AccountAddress;

/// Lifecycle status of a monitored update.
///
/// Moves forward only: `Pending` → `WaitingForNotification` → removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BlockchainUpdateStatus {
    /// Submitted, not yet confirmed on chain.
    Pending,
    /// Confirmed on chain, local state not yet refreshed.
    WaitingForNotification,
}

/// A request together with its current lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockchainUpdate<R> {
    pub request: R,
    pub status: BlockchainUpdateStatus,
    pub started_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

pub type OptInBlockchainUpdate = BlockchainUpdate<OptInBlockchainRequest>;
pub type OptOutBlockchainUpdate = BlockchainUpdate<OptOutBlockchainRequest>;
pub type SendPureCollectibleAssetBlockchainUpdate =
    BlockchainUpdate<SendPureCollectibleAssetBlockchainRequest>;

impl<R: MonitoredRequest> BlockchainUpdate<R> {
    /// Create a freshly submitted update.
    pub fn pending(request: R) -> Self {
        Self {
            request,
            status: BlockchainUpdateStatus::Pending,
            started_at: Utc::now(),
            confirmed_at: None,
        }
    }

    pub fn mark_waiting_for_notification(&mut self) {
        self.status = BlockchainUpdateStatus::WaitingForNotification;
        self.confirmed_at = Some(Utc::now());
    }

    pub fn is_pending(&self) -> bool {
        self.status == BlockchainUpdateStatus::Pending
    }

    pub fn is_waiting_for_notification(&self) -> bool {
        self.status == BlockchainUpdateStatus::WaitingForNotification
    }

    /// Whether the update was confirmed strictly before `cutoff`.
    pub fn confirmed_before(&self, cutoff: DateTime<Utc>) -> bool {
        self.is_waiting_for_notification()
            && self.confirmed_at.is_some_and(|confirmed_at| confirmed_at < cutoff)
    }

    pub fn account_address(&self) -> &AccountAddress {
        self.request.account_address()
    }

    pub fn asset_id(&self) -> AssetId {
        self.request.asset_id()
    }
}
