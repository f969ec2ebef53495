// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Multi-account table of update monitors.
//!
//! Account monitors are created lazily when an update starts and dropped by
//! [`BlockchainUpdatesMonitor::remove_completed_updates`] once nothing is left
//! to track. Lookups for unknown accounts answer "nothing pending" rather than
//! failing, and mutations for unknown accounts never create an entry.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use tracing::debug;

use super::account::BlockchainAccountUpdatesMonitor;
use super::batch::{BlockchainAccountBatchUpdates, BlockchainBatchRequest};
use super::request::{
    AssetId, MonitoredRequest, OptInBlockchainRequest, OptOutBlockchainRequest,
    SendPureCollectibleAssetBlockchainRequest,
};
use super::update::{
    OptInBlockchainUpdate, OptOutBlockchainUpdate, SendPureCollectibleAssetBlockchainUpdate,
};
use crate::models::AccountAddress;

#[derive(Debug, Clone, Default)]
pub struct BlockchainUpdatesMonitor {
    table: BTreeMap<AccountAddress, BlockchainAccountUpdatesMonitor>,
}

impl BlockchainUpdatesMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(&self, address: &AccountAddress) -> Option<&BlockchainAccountUpdatesMonitor> {
        self.table.get(address)
    }

    pub fn account_count(&self) -> usize {
        self.table.len()
    }

    pub fn has_monitoring_updates(&self) -> bool {
        self.table
            .values()
            .any(BlockchainAccountUpdatesMonitor::has_monitoring_updates)
    }

    fn account_mut_or_insert(&mut self, address: &AccountAddress) -> &mut BlockchainAccountUpdatesMonitor {
        self.table
            .entry(address.clone())
            .or_insert_with(|| BlockchainAccountUpdatesMonitor::new(address.clone()))
    }

    // =========================================================================
    // Opt-in
    // =========================================================================

    pub fn filter_pending_opt_in_asset_updates(&self) -> Vec<OptInBlockchainUpdate> {
        self.table
            .values()
            .flat_map(|m| m.filter_pending_opt_in_asset_updates().into_values())
            .collect()
    }

    pub fn filter_pending_opt_in_asset_updates_for(
        &self,
        address: &AccountAddress,
    ) -> HashMap<AssetId, OptInBlockchainUpdate> {
        self.account(address)
            .map(BlockchainAccountUpdatesMonitor::filter_pending_opt_in_asset_updates)
            .unwrap_or_default()
    }

    pub fn filter_opted_in_asset_updates(&self) -> Vec<OptInBlockchainUpdate> {
        self.table
            .values()
            .flat_map(|m| m.filter_opted_in_asset_updates().into_values())
            .collect()
    }

    pub fn filter_opted_in_asset_updates_for(
        &self,
        address: &AccountAddress,
    ) -> HashMap<AssetId, OptInBlockchainUpdate> {
        self.account(address)
            .map(BlockchainAccountUpdatesMonitor::filter_opted_in_asset_updates)
            .unwrap_or_default()
    }

    pub fn has_any_pending_opt_in_request(&self, address: &AccountAddress) -> bool {
        self.account(address)
            .map(BlockchainAccountUpdatesMonitor::has_any_pending_opt_in_request)
            .unwrap_or(false)
    }

    pub fn has_pending_opt_in_request(&self, asset_id: AssetId, address: &AccountAddress) -> bool {
        self.account(address)
            .map(|m| m.has_pending_opt_in_request(asset_id))
            .unwrap_or(false)
    }

    pub fn start_monitoring_opt_in_updates(&mut self, request: OptInBlockchainRequest) {
        let address = request.account_address().clone();
        debug!(address = %address, asset_id = request.asset_id(), "Monitoring opt-in");
        self.account_mut_or_insert(&address)
            .start_monitoring_opt_in_updates(request);
    }

    pub fn mark_opt_in_updates_for_notification(&mut self, asset_id: AssetId, address: &AccountAddress) {
        if let Some(monitor) = self.table.get_mut(address) {
            if monitor.stop_monitoring_opt_in_updates(asset_id) {
                debug!(address = %address, asset_id, "Opt-in confirmed");
            }
        }
    }

    pub fn finish_monitoring_opt_in_updates(&mut self, asset_id: AssetId, address: &AccountAddress) {
        if let Some(monitor) = self.table.get_mut(address) {
            monitor.finish_monitoring_opt_in_updates(asset_id);
        }
    }

    /// Drop an opt-in whose transaction was never sent.
    pub fn cancel_monitoring_opt_in_updates(&mut self, asset_id: AssetId, address: &AccountAddress) {
        if let Some(monitor) = self.table.get_mut(address) {
            if monitor.finish_monitoring_opt_in_updates(asset_id) {
                debug!(address = %address, asset_id, "Opt-in monitoring cancelled");
            }
        }
    }

    // =========================================================================
    // Opt-out
    // =========================================================================

    pub fn filter_pending_opt_out_asset_updates(&self) -> Vec<OptOutBlockchainUpdate> {
        self.table
            .values()
            .flat_map(|m| m.filter_pending_opt_out_asset_updates().into_values())
            .collect()
    }

    pub fn filter_pending_opt_out_asset_updates_for(
        &self,
        address: &AccountAddress,
    ) -> HashMap<AssetId, OptOutBlockchainUpdate> {
        self.account(address)
            .map(BlockchainAccountUpdatesMonitor::filter_pending_opt_out_asset_updates)
            .unwrap_or_default()
    }

    pub fn filter_opted_out_asset_updates(&self) -> Vec<OptOutBlockchainUpdate> {
        self.table
            .values()
            .flat_map(|m| m.filter_opted_out_asset_updates().into_values())
            .collect()
    }

    pub fn filter_opted_out_asset_updates_for(
        &self,
        address: &AccountAddress,
    ) -> HashMap<AssetId, OptOutBlockchainUpdate> {
        self.account(address)
            .map(BlockchainAccountUpdatesMonitor::filter_opted_out_asset_updates)
            .unwrap_or_default()
    }

    pub fn has_any_pending_opt_out_request(&self, address: &AccountAddress) -> bool {
        self.account(address)
            .map(BlockchainAccountUpdatesMonitor::has_any_pending_opt_out_request)
            .unwrap_or(false)
    }

    pub fn has_pending_opt_out_request(&self, asset_id: AssetId, address: &AccountAddress) -> bool {
        self.account(address)
            .map(|m| m.has_pending_opt_out_request(asset_id))
            .unwrap_or(false)
    }

    pub fn start_monitoring_opt_out_updates(&mut self, request: OptOutBlockchainRequest) {
        let address = request.account_address().clone();
        debug!(address = %address, asset_id = request.asset_id(), "Monitoring opt-out");
        self.account_mut_or_insert(&address)
            .start_monitoring_opt_out_updates(request);
    }

    pub fn mark_opt_out_updates_for_notification(&mut self, asset_id: AssetId, address: &AccountAddress) {
        if let Some(monitor) = self.table.get_mut(address) {
            if monitor.stop_monitoring_opt_out_updates(asset_id) {
                debug!(address = %address, asset_id, "Opt-out confirmed");
            }
        }
    }

    pub fn finish_monitoring_opt_out_updates(&mut self, asset_id: AssetId, address: &AccountAddress) {
        if let Some(monitor) = self.table.get_mut(address) {
            monitor.finish_monitoring_opt_out_updates(asset_id);
        }
    }

    /// Drop an opt-out whose transaction was never sent.
    pub fn cancel_monitoring_opt_out_updates(&mut self, asset_id: AssetId, address: &AccountAddress) {
        if let Some(monitor) = self.table.get_mut(address) {
            if monitor.finish_monitoring_opt_out_updates(asset_id) {
                debug!(address = %address, asset_id, "Opt-out monitoring cancelled");
            }
        }
    }

    // =========================================================================
    // Send pure collectible
    // =========================================================================

    pub fn filter_pending_send_pure_collectible_asset_updates(
        &self,
    ) -> Vec<SendPureCollectibleAssetBlockchainUpdate> {
        self.table
            .values()
            .flat_map(|m| {
                m.filter_pending_send_pure_collectible_asset_updates()
                    .into_values()
            })
            .collect()
    }

    pub fn filter_pending_send_pure_collectible_asset_updates_for(
        &self,
        address: &AccountAddress,
    ) -> HashMap<AssetId, SendPureCollectibleAssetBlockchainUpdate> {
        self.account(address)
            .map(BlockchainAccountUpdatesMonitor::filter_pending_send_pure_collectible_asset_updates)
            .unwrap_or_default()
    }

    pub fn filter_sent_pure_collectible_asset_updates(
        &self,
    ) -> Vec<SendPureCollectibleAssetBlockchainUpdate> {
        self.table
            .values()
            .flat_map(|m| m.filter_sent_pure_collectible_asset_updates().into_values())
            .collect()
    }

    pub fn filter_sent_pure_collectible_asset_updates_for(
        &self,
        address: &AccountAddress,
    ) -> HashMap<AssetId, SendPureCollectibleAssetBlockchainUpdate> {
        self.account(address)
            .map(BlockchainAccountUpdatesMonitor::filter_sent_pure_collectible_asset_updates)
            .unwrap_or_default()
    }

    pub fn has_any_pending_send_pure_collectible_asset_request(&self, address: &AccountAddress) -> bool {
        self.account(address)
            .map(BlockchainAccountUpdatesMonitor::has_any_pending_send_pure_collectible_asset_request)
            .unwrap_or(false)
    }

    pub fn has_pending_send_pure_collectible_asset_request(
        &self,
        asset_id: AssetId,
        address: &AccountAddress,
    ) -> bool {
        self.account(address)
            .map(|m| m.has_pending_send_pure_collectible_asset_request(asset_id))
            .unwrap_or(false)
    }

    pub fn start_monitoring_send_pure_collectible_asset_updates(
        &mut self,
        request: SendPureCollectibleAssetBlockchainRequest,
    ) {
        let address = request.account_address().clone();
        debug!(
            address = %address,
            asset_id = request.asset_id(),
            "Monitoring pure collectible send"
        );
        self.account_mut_or_insert(&address)
            .start_monitoring_send_pure_collectible_asset_updates(request);
    }

    pub fn mark_send_pure_collectible_asset_updates_for_notification(
        &mut self,
        asset_id: AssetId,
        address: &AccountAddress,
    ) {
        if let Some(monitor) = self.table.get_mut(address) {
            if monitor.stop_monitoring_send_pure_collectible_asset_updates(asset_id) {
                debug!(address = %address, asset_id, "Pure collectible send confirmed");
            }
        }
    }

    pub fn finish_monitoring_send_pure_collectible_asset_updates(
        &mut self,
        asset_id: AssetId,
        address: &AccountAddress,
    ) {
        if let Some(monitor) = self.table.get_mut(address) {
            monitor.finish_monitoring_send_pure_collectible_asset_updates(asset_id);
        }
    }

    /// Drop a collectible send whose transaction was never sent.
    pub fn cancel_monitoring_send_pure_collectible_asset_updates(
        &mut self,
        asset_id: AssetId,
        address: &AccountAddress,
    ) {
        if let Some(monitor) = self.table.get_mut(address) {
            if monitor.finish_monitoring_send_pure_collectible_asset_updates(asset_id) {
                debug!(address = %address, asset_id, "Pure collectible send monitoring cancelled");
            }
        }
    }

    // =========================================================================
    // Batch
    // =========================================================================

    /// Mark every asset the indexer reported as confirmed for `address`.
    pub fn apply_batch_updates(
        &mut self,
        address: &AccountAddress,
        updates: &BlockchainAccountBatchUpdates,
    ) {
        for asset_id in &updates.opted_in_assets {
            self.mark_opt_in_updates_for_notification(*asset_id, address);
        }
        for asset_id in &updates.opted_out_assets {
            self.mark_opt_out_updates_for_notification(*asset_id, address);
        }
        for asset_id in &updates.sent_pure_collectible_assets {
            self.mark_send_pure_collectible_asset_updates_for_notification(*asset_id, address);
        }
    }

    /// Drop waiting updates everywhere, then accounts left with nothing.
    pub fn remove_completed_updates(&mut self) {
        self.table.retain(|_, monitor| {
            monitor.remove_unmonitored_updates();
            monitor.has_monitoring_updates()
        });
    }

    /// Drop waiting updates confirmed before `cutoff`, then accounts left with
    /// nothing. Returns how many updates were dropped.
    pub fn remove_updates_confirmed_before(&mut self, cutoff: DateTime<Utc>) -> usize {
        let mut removed = 0;
        self.table.retain(|_, monitor| {
            removed += monitor.remove_updates_confirmed_before(cutoff);
            monitor.has_monitoring_updates()
        });
        removed
    }

    pub fn make_batch_request(&self) -> BlockchainBatchRequest {
        self.table
            .iter()
            .map(|(address, monitor)| (address.clone(), monitor.make_batch_request()))
            .collect()
    }
}
