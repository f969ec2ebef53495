// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API. All types derive `Serialize`, `Deserialize`, and `ToSchema`
//! for automatic JSON handling and OpenAPI documentation.
//!
//! ## Account Address Type
//!
//! The [`AccountAddress`] newtype wraps the on-chain address of a monitored
//! account. It is also the key of the multi-account monitor table.
//!
//! ## Model Categories
//!
//! - **Updates**: Start requests and monitored update views
//! - **Accounts**: Per-account summaries
//! - **Batch**: Coalesced batch requests and confirmation reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::monitor::{
    AssetId, AssetSnapshot, BlockchainAccountBatchRequest, BlockchainUpdate,
    BlockchainUpdateStatus, MonitoredRequest,
};

// =============================================================================
// Account Address Type
// =============================================================================

/// On-chain account address wrapper.
///
/// Provides type safety for account addresses throughout the monitor and API.
///
/// # Example
///
/// ```rust,ignore
/// let addr = AccountAddress::from("7ZUECA7HFLZTXENRV24SHLU4AVPUTMTTDUFUBNBD64C73F3UHRTHAIOF6Q");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountAddress(pub String);

impl AccountAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AccountAddress {
    fn from(value: String) -> Self {
        AccountAddress(value)
    }
}

impl From<&str> for AccountAddress {
    fn from(value: &str) -> Self {
        AccountAddress(value.to_string())
    }
}

impl From<AccountAddress> for String {
    fn from(value: AccountAddress) -> Self {
        value.0
    }
}

// =============================================================================
// Update Models
// =============================================================================

/// The three independently tracked update families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateKind {
    /// Account is opting into an asset.
    OptIn,
    /// Account is opting out of an asset.
    OptOut,
    /// Account is transferring away its whole holding of a collectible.
    SendPureCollectible,
}

impl std::fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UpdateKind::OptIn => "opt-in",
            UpdateKind::OptOut => "opt-out",
            UpdateKind::SendPureCollectible => "send-pure-collectible",
        };
        f.write_str(name)
    }
}

/// Request to begin monitoring an update for an asset.
///
/// The account address comes from the path; the body is the asset snapshot
/// taken at the time the transaction was submitted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StartMonitoringRequest {
    pub asset: AssetSnapshot,
}

/// Query parameters for listing monitored updates.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct UpdateListQuery {
    /// Restrict the listing to one status. Both statuses are listed when absent.
    pub status: Option<BlockchainUpdateStatus>,
}

/// A monitored update as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MonitoredUpdate {
    pub kind: UpdateKind,
    pub account_address: AccountAddress,
    pub asset: AssetSnapshot,
    pub status: BlockchainUpdateStatus,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl MonitoredUpdate {
    pub fn from_update<R: MonitoredRequest>(kind: UpdateKind, update: &BlockchainUpdate<R>) -> Self {
        Self {
            kind,
            account_address: update.account_address().clone(),
            asset: update.request.asset().clone(),
            status: update.status,
            started_at: update.started_at,
            confirmed_at: update.confirmed_at,
        }
    }
}

/// Whether an asset still has a pending request of a given kind.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PendingRequestResponse {
    pub kind: UpdateKind,
    pub asset_id: AssetId,
    pub pending: bool,
}

// =============================================================================
// Account Models
// =============================================================================

/// Pending and waiting counts for one update kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UpdateCounts {
    pub pending: usize,
    pub waiting_for_notification: usize,
}

/// Snapshot of what is being monitored for one account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AccountSummary {
    pub account_address: AccountAddress,
    pub has_monitoring_updates: bool,
    pub opt_in: UpdateCounts,
    pub opt_out: UpdateCounts,
    pub send_pure_collectible: UpdateCounts,
}

impl AccountSummary {
    /// Summary for an account the monitor has never seen.
    pub fn empty(account_address: AccountAddress) -> Self {
        Self {
            account_address,
            has_monitoring_updates: false,
            opt_in: UpdateCounts::default(),
            opt_out: UpdateCounts::default(),
            send_pure_collectible: UpdateCounts::default(),
        }
    }
}

// =============================================================================
// Batch Models
// =============================================================================

/// Batch request entry for one account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AccountBatchRequest {
    pub account_address: AccountAddress,
    pub request: BlockchainAccountBatchRequest,
}

/// Batch request across every monitored account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct BatchRequestResponse {
    pub accounts: Vec<AccountBatchRequest>,
}

/// Result of a sweep over completed updates.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SweepResponse {
    /// Accounts that still have at least one monitored update.
    pub monitored_accounts: usize,
}
