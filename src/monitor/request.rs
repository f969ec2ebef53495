// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Immutable request snapshots captured when an update is submitted.
//!
//! A request records the account and the asset as they looked when the user
//! signed the transaction, so pending rows can still be rendered after the
//! asset disappears from (or has not yet appeared in) the account.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::AccountAddress;

/// On-chain asset identifier.
pub type AssetId = u64;

/// Verification tier of an asset at request time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AssetVerificationTier {
    Trusted,
    Verified,
    #[default]
    Unverified,
    Suspicious,
}

/// Asset details as seen when the request was made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AssetSnapshot {
    pub id: AssetId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,
    #[serde(default)]
    pub verification_tier: AssetVerificationTier,
    #[serde(default)]
    pub is_collectible: bool,
    /// Collectible display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collectible_title: Option<String>,
    /// Collectible thumbnail image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collectible_thumbnail_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collectible_collection_name: Option<String>,
}

impl AssetSnapshot {
    /// Snapshot of a standard (non-collectible) asset.
    pub fn standard(id: AssetId, name: Option<String>, unit_name: Option<String>) -> Self {
        Self {
            id,
            name,
            unit_name,
            verification_tier: AssetVerificationTier::default(),
            is_collectible: false,
            collectible_title: None,
            collectible_thumbnail_image: None,
            collectible_collection_name: None,
        }
    }

    /// Snapshot of a collectible asset.
    pub fn collectible(id: AssetId, title: Option<String>, collection_name: Option<String>) -> Self {
        Self {
            id,
            name: title.clone(),
            unit_name: None,
            verification_tier: AssetVerificationTier::default(),
            is_collectible: true,
            collectible_title: title,
            collectible_thumbnail_image: None,
            collectible_collection_name: collection_name,
        }
    }
}

/// Common view over the three request kinds.
pub trait MonitoredRequest: Clone {
    fn account_address(&self) -> &AccountAddress;
    fn asset(&self) -> &AssetSnapshot;

    fn asset_id(&self) -> AssetId {
        self.asset().id
    }
}

/// Request to opt an account into an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptInBlockchainRequest {
    pub account_address: AccountAddress,
    pub asset: AssetSnapshot,
}

impl OptInBlockchainRequest {
    pub fn new(account_address: impl Into<AccountAddress>, asset: AssetSnapshot) -> Self {
        Self {
            account_address: account_address.into(),
            asset,
        }
    }
}

impl MonitoredRequest for OptInBlockchainRequest {
    fn account_address(&self) -> &AccountAddress {
        &self.account_address
    }

    fn asset(&self) -> &AssetSnapshot {
        &self.asset
    }
}

/// Request to opt an account out of an asset, closing out its balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptOutBlockchainRequest {
    pub account_address: AccountAddress,
    pub asset: AssetSnapshot,
}

impl OptOutBlockchainRequest {
    pub fn new(account_address: impl Into<AccountAddress>, asset: AssetSnapshot) -> Self {
        Self {
            account_address: account_address.into(),
            asset,
        }
    }
}

impl MonitoredRequest for OptOutBlockchainRequest {
    fn account_address(&self) -> &AccountAddress {
        &self.account_address
    }

    fn asset(&self) -> &AssetSnapshot {
        &self.asset
    }
}

/// Request to transfer away an account's entire holding of a collectible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendPureCollectibleAssetBlockchainRequest {
    pub account_address: AccountAddress,
    pub asset: AssetSnapshot,
}

impl SendPureCollectibleAssetBlockchainRequest {
    pub fn new(account_address: impl Into<AccountAddress>, asset: AssetSnapshot) -> Self {
        Self {
            account_address: account_address.into(),
            asset,
        }
    }
}

impl MonitoredRequest for SendPureCollectibleAssetBlockchainRequest {
    fn account_address(&self) -> &AccountAddress {
        &self.account_address
    }

    fn asset(&self) -> &AssetSnapshot {
        &self.asset
    }
}
