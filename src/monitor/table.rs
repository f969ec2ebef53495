// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Asset-keyed update table shared by the three update families.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::request::{AssetId, MonitoredRequest};
use super::update::{BlockchainUpdate, BlockchainUpdateStatus};
use crate::models::UpdateCounts;

/// One update per asset id; inserting for an existing id replaces the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTable<R> {
    updates: HashMap<AssetId, BlockchainUpdate<R>>,
}

impl<R> Default for UpdateTable<R> {
    fn default() -> Self {
        Self {
            updates: HashMap::new(),
        }
    }
}

impl<R: MonitoredRequest> UpdateTable<R> {
    pub fn start(&mut self, request: R) {
        let asset_id = request.asset_id();
        self.updates.insert(asset_id, BlockchainUpdate::pending(request));
    }

    /// Move a pending entry to waiting-for-notification.
    ///
    /// Returns `false` when there was no pending entry to move.
    pub fn stop(&mut self, asset_id: AssetId) -> bool {
        match self.updates.get_mut(&asset_id) {
            Some(update) if update.is_pending() => {
                update.mark_waiting_for_notification();
                true
            }
            _ => false,
        }
    }

    /// Remove the entry whatever its status. Returns whether one existed.
    pub fn finish(&mut self, asset_id: AssetId) -> bool {
        self.updates.remove(&asset_id).is_some()
    }

    pub fn get(&self, asset_id: AssetId) -> Option<&BlockchainUpdate<R>> {
        self.updates.get(&asset_id)
    }

    pub fn filter(&self, status: BlockchainUpdateStatus) -> HashMap<AssetId, BlockchainUpdate<R>> {
        self.updates
            .iter()
            .filter(|(_, update)| update.status == status)
            .map(|(asset_id, update)| (*asset_id, update.clone()))
            .collect()
    }

    pub fn has_any(&self, status: BlockchainUpdateStatus) -> bool {
        self.updates.values().any(|update| update.status == status)
    }

    pub fn has(&self, asset_id: AssetId, status: BlockchainUpdateStatus) -> bool {
        self.get(asset_id)
            .map(|update| update.status == status)
            .unwrap_or(false)
    }

    pub fn pending_asset_ids(&self) -> BTreeSet<AssetId> {
        self.updates
            .iter()
            .filter(|(_, update)| update.is_pending())
            .map(|(asset_id, _)| *asset_id)
            .collect()
    }

    /// Drop every entry that is no longer pending.
    pub fn retain_pending(&mut self) {
        self.updates.retain(|_, update| update.is_pending());
    }

    /// Drop waiting entries confirmed before `cutoff`. Returns how many went.
    pub fn remove_confirmed_before(&mut self, cutoff: DateTime<Utc>) -> usize {
        let before = self.len();
        self.updates.retain(|_, update| !update.confirmed_before(cutoff));
        before - self.len()
    }

    pub fn counts(&self) -> UpdateCounts {
        let pending = self.updates.values().filter(|u| u.is_pending()).count();
        UpdateCounts {
            pending,
            waiting_for_notification: self.len() - pending,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }
}
