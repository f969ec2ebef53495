// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::monitor::BlockchainUpdatesMonitor;

/// Shared service state. The monitor has no internal locking; every access
/// goes through this lock.
#[derive(Clone)]
pub struct AppState {
    pub monitor: Arc<RwLock<BlockchainUpdatesMonitor>>,
}

impl AppState {
    pub fn new(monitor: BlockchainUpdatesMonitor) -> Self {
        Self {
            monitor: Arc::new(RwLock::new(monitor)),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(BlockchainUpdatesMonitor::new())
    }
}
