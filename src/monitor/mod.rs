// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Blockchain Update Monitor
//!
//! In-memory bookkeeping for asset-scoped transactions that have been
//! submitted but are not yet reflected in an account's asset list.
//!
//! ## Lifecycle
//!
//! ```text
//! (absent) --start--> Pending --stop/mark--> WaitingForNotification
//!     ^                  |                          |
//!     +------finish------+--------finish/sweep------+
//! ```
//!
//! - [`BlockchainAccountUpdatesMonitor`] tracks one account.
//! - [`BlockchainUpdatesMonitor`] holds one monitor per account and builds the
//!   [`BlockchainBatchRequest`] the indexer poller submits.

pub mod account;
pub mod batch;
pub mod registry;
pub mod request;
pub mod table;
pub mod update;

pub use account::BlockchainAccountUpdatesMonitor;
pub use batch::{BlockchainAccountBatchRequest, BlockchainAccountBatchUpdates, BlockchainBatchRequest};
pub use registry::BlockchainUpdatesMonitor;
pub use request::{
    AssetId, AssetSnapshot, AssetVerificationTier, MonitoredRequest, OptInBlockchainRequest,
    OptOutBlockchainRequest, SendPureCollectibleAssetBlockchainRequest,
};
pub use update::{
    BlockchainUpdate, BlockchainUpdateStatus, OptInBlockchainUpdate, OptOutBlockchainUpdate,
    SendPureCollectibleAssetBlockchainUpdate,
};
