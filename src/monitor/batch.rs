// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Coalesced batch requests and the confirmations reported back for them.
//!
//! Instead of probing the indexer once per pending asset, the poller issues a
//! single request covering every pending asset of every kind, per account.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::request::AssetId;
use crate::models::AccountAddress;

/// Pending asset ids of one account, one set per update kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BlockchainAccountBatchRequest {
    pub opt_in_assets: BTreeSet<AssetId>,
    pub opt_out_assets: BTreeSet<AssetId>,
    pub send_pure_collectible_assets: BTreeSet<AssetId>,
}

impl BlockchainAccountBatchRequest {
    pub fn is_empty(&self) -> bool {
        self.opt_in_assets.is_empty()
            && self.opt_out_assets.is_empty()
            && self.send_pure_collectible_assets.is_empty()
    }

    /// Total number of asset ids across all kinds.
    pub fn len(&self) -> usize {
        self.opt_in_assets.len()
            + self.opt_out_assets.len()
            + self.send_pure_collectible_assets.len()
    }
}

/// Batch request over every monitored account.
pub type BlockchainBatchRequest = BTreeMap<AccountAddress, BlockchainAccountBatchRequest>;

/// Asset ids the indexer reports as confirmed for one account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BlockchainAccountBatchUpdates {
    #[serde(default)]
    pub opted_in_assets: BTreeSet<AssetId>,
    #[serde(default)]
    pub opted_out_assets: BTreeSet<AssetId>,
    #[serde(default)]
    pub sent_pure_collectible_assets: BTreeSet<AssetId>,
}

impl BlockchainAccountBatchUpdates {
    pub fn is_empty(&self) -> bool {
        self.opted_in_assets.is_empty()
            && self.opted_out_assets.is_empty()
            && self.sent_pure_collectible_assets.is_empty()
    }
}
