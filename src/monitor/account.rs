// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-account tracker of in-flight asset updates.
//!
//! Three independent families are tracked, each keyed by asset id:
//!
//! - **Opt-in**: the account started holding an asset
//! - **Opt-out**: the account closed out an asset
//! - **Send pure collectible**: the account sent away its whole collectible holding
//!
//! Every entry moves `Pending` → `WaitingForNotification` → removed. The
//! monitor performs no validation: `stop` and `finish` on an absent entry are
//! silent no-ops, and `start` overwrites whatever was there. Callers own
//! synchronization.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::batch::BlockchainAccountBatchRequest;
use super::request::{
    AssetId, OptInBlockchainRequest, OptOutBlockchainRequest,
    SendPureCollectibleAssetBlockchainRequest,
};
use super::table::UpdateTable;
use super::update::{
    BlockchainUpdateStatus, OptInBlockchainUpdate, OptOutBlockchainUpdate,
    SendPureCollectibleAssetBlockchainUpdate,
};
use crate::models::{AccountAddress, AccountSummary};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockchainAccountUpdatesMonitor {
    account_address: AccountAddress,
    opt_in_updates: UpdateTable<OptInBlockchainRequest>,
    opt_out_updates: UpdateTable<OptOutBlockchainRequest>,
    sent_pure_collectible_asset_updates: UpdateTable<SendPureCollectibleAssetBlockchainRequest>,
}

impl BlockchainAccountUpdatesMonitor {
    pub fn new(account_address: impl Into<AccountAddress>) -> Self {
        Self {
            account_address: account_address.into(),
            opt_in_updates: UpdateTable::default(),
            opt_out_updates: UpdateTable::default(),
            sent_pure_collectible_asset_updates: UpdateTable::default(),
        }
    }

    pub fn account_address(&self) -> &AccountAddress {
        &self.account_address
    }

    // =========================================================================
    // Opt-in
    // =========================================================================

    pub fn filter_pending_opt_in_asset_updates(&self) -> HashMap<AssetId, OptInBlockchainUpdate> {
        self.opt_in_updates.filter(BlockchainUpdateStatus::Pending)
    }

    pub fn filter_opted_in_asset_updates(&self) -> HashMap<AssetId, OptInBlockchainUpdate> {
        self.opt_in_updates
            .filter(BlockchainUpdateStatus::WaitingForNotification)
    }

    pub fn has_any_pending_opt_in_request(&self) -> bool {
        self.opt_in_updates.has_any(BlockchainUpdateStatus::Pending)
    }

    pub fn has_pending_opt_in_request(&self, asset_id: AssetId) -> bool {
        self.opt_in_updates
            .has(asset_id, BlockchainUpdateStatus::Pending)
    }

    pub fn start_monitoring_opt_in_updates(&mut self, request: OptInBlockchainRequest) {
        self.opt_in_updates.start(request);
    }

    pub fn stop_monitoring_opt_in_updates(&mut self, asset_id: AssetId) -> bool {
        self.opt_in_updates.stop(asset_id)
    }

    pub fn finish_monitoring_opt_in_updates(&mut self, asset_id: AssetId) -> bool {
        self.opt_in_updates.finish(asset_id)
    }

    // =========================================================================
    // Opt-out
    // =========================================================================

    pub fn filter_pending_opt_out_asset_updates(&self) -> HashMap<AssetId, OptOutBlockchainUpdate> {
        self.opt_out_updates.filter(BlockchainUpdateStatus::Pending)
    }

    pub fn filter_opted_out_asset_updates(&self) -> HashMap<AssetId, OptOutBlockchainUpdate> {
        self.opt_out_updates
            .filter(BlockchainUpdateStatus::WaitingForNotification)
    }

    pub fn has_any_pending_opt_out_request(&self) -> bool {
        self.opt_out_updates.has_any(BlockchainUpdateStatus::Pending)
    }

    pub fn has_pending_opt_out_request(&self, asset_id: AssetId) -> bool {
        self.opt_out_updates
            .has(asset_id, BlockchainUpdateStatus::Pending)
    }

    pub fn start_monitoring_opt_out_updates(&mut self, request: OptOutBlockchainRequest) {
        self.opt_out_updates.start(request);
    }

    pub fn stop_monitoring_opt_out_updates(&mut self, asset_id: AssetId) -> bool {
        self.opt_out_updates.stop(asset_id)
    }

    pub fn finish_monitoring_opt_out_updates(&mut self, asset_id: AssetId) -> bool {
        self.opt_out_updates.finish(asset_id)
    }

    // =========================================================================
    // Send pure collectible
    // =========================================================================

    pub fn filter_pending_send_pure_collectible_asset_updates(
        &self,
    ) -> HashMap<AssetId, SendPureCollectibleAssetBlockchainUpdate> {
        self.sent_pure_collectible_asset_updates
            .filter(BlockchainUpdateStatus::Pending)
    }

    pub fn filter_sent_pure_collectible_asset_updates(
        &self,
    ) -> HashMap<AssetId, SendPureCollectibleAssetBlockchainUpdate> {
        self.sent_pure_collectible_asset_updates
            .filter(BlockchainUpdateStatus::WaitingForNotification)
    }

    pub fn has_any_pending_send_pure_collectible_asset_request(&self) -> bool {
        self.sent_pure_collectible_asset_updates
            .has_any(BlockchainUpdateStatus::Pending)
    }

    pub fn has_pending_send_pure_collectible_asset_request(&self, asset_id: AssetId) -> bool {
        self.sent_pure_collectible_asset_updates
            .has(asset_id, BlockchainUpdateStatus::Pending)
    }

    pub fn start_monitoring_send_pure_collectible_asset_updates(
        &mut self,
        request: SendPureCollectibleAssetBlockchainRequest,
    ) {
        self.sent_pure_collectible_asset_updates.start(request);
    }

    pub fn stop_monitoring_send_pure_collectible_asset_updates(&mut self, asset_id: AssetId) -> bool {
        self.sent_pure_collectible_asset_updates.stop(asset_id)
    }

    pub fn finish_monitoring_send_pure_collectible_asset_updates(
        &mut self,
        asset_id: AssetId,
    ) -> bool {
        self.sent_pure_collectible_asset_updates.finish(asset_id)
    }

    // =========================================================================
    // Whole account
    // =========================================================================

    /// Whether anything, pending or waiting, is still tracked.
    pub fn has_monitoring_updates(&self) -> bool {
        !self.opt_in_updates.is_empty()
            || !self.opt_out_updates.is_empty()
            || !self.sent_pure_collectible_asset_updates.is_empty()
    }

    /// Pending asset ids of every kind, for a single combined poll.
    pub fn make_batch_request(&self) -> BlockchainAccountBatchRequest {
        BlockchainAccountBatchRequest {
            opt_in_assets: self.opt_in_updates.pending_asset_ids(),
            opt_out_assets: self.opt_out_updates.pending_asset_ids(),
            send_pure_collectible_assets: self
                .sent_pure_collectible_asset_updates
                .pending_asset_ids(),
        }
    }

    /// Forget confirmed-but-unacknowledged updates, keeping pending ones.
    pub fn remove_unmonitored_updates(&mut self) {
        self.opt_in_updates.retain_pending();
        self.opt_out_updates.retain_pending();
        self.sent_pure_collectible_asset_updates.retain_pending();
    }

    /// Drop waiting updates confirmed before `cutoff`, keeping newer ones.
    pub fn remove_updates_confirmed_before(&mut self, cutoff: DateTime<Utc>) -> usize {
        self.opt_in_updates.remove_confirmed_before(cutoff)
            + self.opt_out_updates.remove_confirmed_before(cutoff)
            + self
                .sent_pure_collectible_asset_updates
                .remove_confirmed_before(cutoff)
    }

    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            account_address: self.account_address.clone(),
            has_monitoring_updates: self.has_monitoring_updates(),
            opt_in: self.opt_in_updates.counts(),
            opt_out: self.opt_out_updates.counts(),
            send_pure_collectible: self.sent_pure_collectible_asset_updates.counts(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::monitor::AssetSnapshot;

    const ACCOUNT: &str = "7ZUECA7HFLZTXENRV24SHLU4AVPUTMTTDUFUBNBD64C73F3UHRTHAIOF6Q";

    fn opt_in(asset_id: AssetId) -> OptInBlockchainRequest {
        OptInBlockchainRequest::new(
            ACCOUNT,
            AssetSnapshot::standard(asset_id, Some("USD Coin".into()), Some("USDC".into())),
        )
    }

    fn opt_out(asset_id: AssetId) -> OptOutBlockchainRequest {
        OptOutBlockchainRequest::new(
            ACCOUNT,
            AssetSnapshot::standard(asset_id, Some("USD Coin".into()), Some("USDC".into())),
        )
    }

    fn send_collectible(asset_id: AssetId) -> SendPureCollectibleAssetBlockchainRequest {
        SendPureCollectibleAssetBlockchainRequest::new(
            ACCOUNT,
            AssetSnapshot::collectible(asset_id, Some("Sunset #4".into()), None),
        )
    }

    #[test]
    fn start_marks_asset_pending() {
        let mut monitor = BlockchainAccountUpdatesMonitor::new(ACCOUNT);
        monitor.start_monitoring_opt_in_updates(opt_in(31566704));

        assert!(monitor.has_pending_opt_in_request(31566704));
        assert!(monitor.has_any_pending_opt_in_request());
        assert!(monitor
            .filter_pending_opt_in_asset_updates()
            .contains_key(&31566704));
        assert!(monitor.filter_opted_in_asset_updates().is_empty());
    }

    #[test]
    fn stop_moves_to_waiting_for_notification() {
        let mut monitor = BlockchainAccountUpdatesMonitor::new(ACCOUNT);
        monitor.start_monitoring_opt_in_updates(opt_in(31566704));
        assert!(monitor.stop_monitoring_opt_in_updates(31566704));

        assert!(!monitor.has_pending_opt_in_request(31566704));
        let opted_in = monitor.filter_opted_in_asset_updates();
        let update = opted_in.get(&31566704).expect("waiting update");
        assert_eq!(update.status, BlockchainUpdateStatus::WaitingForNotification);
        assert_eq!(update.request, opt_in(31566704));
    }

    #[test]
    fn finish_removes_entry() {
        let mut monitor = BlockchainAccountUpdatesMonitor::new(ACCOUNT);
        monitor.start_monitoring_opt_in_updates(opt_in(31566704));
        monitor.stop_monitoring_opt_in_updates(31566704);
        assert!(monitor.finish_monitoring_opt_in_updates(31566704));

        assert!(monitor.filter_pending_opt_in_asset_updates().is_empty());
        assert!(monitor.filter_opted_in_asset_updates().is_empty());
        assert!(!monitor.has_monitoring_updates());
    }

    #[test]
    fn finish_removes_pending_entry_too() {
        let mut monitor = BlockchainAccountUpdatesMonitor::new(ACCOUNT);
        monitor.start_monitoring_opt_out_updates(opt_out(9));
        assert!(monitor.finish_monitoring_opt_out_updates(9));
        assert!(!monitor.has_pending_opt_out_request(9));
    }

    #[test]
    fn stop_and_finish_on_absent_asset_are_noops() {
        let mut monitor = BlockchainAccountUpdatesMonitor::new(ACCOUNT);
        monitor.start_monitoring_opt_in_updates(opt_in(1));
        let before = monitor.clone();

        assert!(!monitor.stop_monitoring_opt_in_updates(2));
        assert!(!monitor.finish_monitoring_opt_in_updates(2));
        assert!(!monitor.stop_monitoring_opt_out_updates(1));
        assert!(!monitor.finish_monitoring_send_pure_collectible_asset_updates(1));
        assert_eq!(monitor, before);

        // Finishing twice is harmless.
        assert!(monitor.finish_monitoring_opt_in_updates(1));
        assert!(!monitor.finish_monitoring_opt_in_updates(1));
    }

    #[test]
    fn batch_request_contains_only_pending_assets() {
        let mut monitor = BlockchainAccountUpdatesMonitor::new(ACCOUNT);
        monitor.start_monitoring_opt_in_updates(opt_in(1));
        monitor.start_monitoring_opt_in_updates(opt_in(2));
        monitor.start_monitoring_opt_out_updates(opt_out(3));
        monitor.start_monitoring_opt_out_updates(opt_out(4));
        monitor.start_monitoring_send_pure_collectible_asset_updates(send_collectible(5));
        monitor.stop_monitoring_opt_in_updates(2);
        monitor.stop_monitoring_opt_out_updates(4);

        let request = monitor.make_batch_request();
        assert_eq!(request.opt_in_assets, BTreeSet::from([1]));
        assert_eq!(request.opt_out_assets, BTreeSet::from([3]));
        assert_eq!(request.send_pure_collectible_assets, BTreeSet::from([5]));
    }

    #[test]
    fn remove_unmonitored_updates_is_idempotent() {
        let mut monitor = BlockchainAccountUpdatesMonitor::new(ACCOUNT);
        monitor.start_monitoring_opt_in_updates(opt_in(1));
        monitor.start_monitoring_opt_in_updates(opt_in(2));
        monitor.start_monitoring_send_pure_collectible_asset_updates(send_collectible(3));
        monitor.stop_monitoring_opt_in_updates(2);
        monitor.stop_monitoring_send_pure_collectible_asset_updates(3);

        monitor.remove_unmonitored_updates();
        let once = monitor.clone();
        monitor.remove_unmonitored_updates();
        assert_eq!(monitor, once);

        assert!(monitor.has_pending_opt_in_request(1));
        assert!(monitor.filter_opted_in_asset_updates().is_empty());
        assert!(monitor
            .filter_sent_pure_collectible_asset_updates()
            .is_empty());
    }

    #[test]
    fn has_monitoring_updates_tracks_all_maps() {
        let mut monitor = BlockchainAccountUpdatesMonitor::new(ACCOUNT);
        assert!(!monitor.has_monitoring_updates());

        monitor.start_monitoring_send_pure_collectible_asset_updates(send_collectible(8));
        assert!(monitor.has_monitoring_updates());

        monitor.stop_monitoring_send_pure_collectible_asset_updates(8);
        assert!(monitor.has_monitoring_updates());

        monitor.finish_monitoring_send_pure_collectible_asset_updates(8);
        assert!(!monitor.has_monitoring_updates());
    }

    #[test]
    fn families_are_independent_for_same_asset() {
        let mut monitor = BlockchainAccountUpdatesMonitor::new(ACCOUNT);
        monitor.start_monitoring_opt_in_updates(opt_in(7));
        monitor.start_monitoring_opt_out_updates(opt_out(7));
        monitor.start_monitoring_send_pure_collectible_asset_updates(send_collectible(7));

        monitor.stop_monitoring_opt_in_updates(7);
        monitor.finish_monitoring_opt_out_updates(7);

        assert!(!monitor.has_pending_opt_in_request(7));
        assert!(monitor.filter_opted_in_asset_updates().contains_key(&7));
        assert!(!monitor.has_pending_opt_out_request(7));
        assert!(monitor.filter_opted_out_asset_updates().is_empty());
        assert!(monitor.has_pending_send_pure_collectible_asset_request(7));
        assert!(monitor.has_any_pending_send_pure_collectible_asset_request());
    }

    #[test]
    fn restart_replaces_waiting_entry_with_pending() {
        let mut monitor = BlockchainAccountUpdatesMonitor::new(ACCOUNT);
        monitor.start_monitoring_opt_out_updates(opt_out(11));
        monitor.stop_monitoring_opt_out_updates(11);
        monitor.start_monitoring_opt_out_updates(opt_out(11));

        assert!(monitor.has_pending_opt_out_request(11));
        assert!(monitor.filter_opted_out_asset_updates().is_empty());
    }

    #[test]
    fn summary_counts_each_kind() {
        let mut monitor = BlockchainAccountUpdatesMonitor::new(ACCOUNT);
        monitor.start_monitoring_opt_in_updates(opt_in(1));
        monitor.start_monitoring_opt_out_updates(opt_out(2));
        monitor.stop_monitoring_opt_out_updates(2);

        let summary = monitor.summary();
        assert!(summary.has_monitoring_updates);
        assert_eq!(summary.opt_in.pending, 1);
        assert_eq!(summary.opt_out.waiting_for_notification, 1);
        assert_eq!(summary.send_pure_collectible.pending, 0);
        assert_eq!(summary.account_address.as_str(), ACCOUNT);
    }
}
