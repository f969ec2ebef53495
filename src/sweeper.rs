// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Completed Update Sweeper
//!
//! Background task that periodically forgets updates that were confirmed on
//! chain and have had a full interval to be picked up by clients.
//!
//! ## Strategy
//!
//! Every `sweep_interval` (default 30 s) the sweeper:
//! 1. Drops updates in `WaitingForNotification` that were confirmed before the
//!    previous sweep, across all accounts. Anything confirmed since stays for
//!    the next round.
//! 2. Drops account monitors left with nothing to track.
//! 3. Logs how many pending assets remain in the batch request.
//!
//! `POST /v1/sweep` bypasses the grace period and drops every waiting update.
//!
//! Pending updates are never touched; they only leave the monitor through an
//! explicit confirmation followed by a finish or a later sweep.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken` for graceful shutdown.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::DEFAULT_SWEEP_INTERVAL;
use crate::state::AppState;

/// What one sweep left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepOutcome {
    pub removed_updates: usize,
    pub removed_accounts: usize,
    pub monitored_accounts: usize,
    pub pending_assets: usize,
}

pub struct UpdatesSweeper {
    state: AppState,
    sweep_interval: Duration,
    last_sweep: Option<DateTime<Utc>>,
}

impl UpdatesSweeper {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            last_sweep: None,
        }
    }

    pub fn with_interval(mut self, sweep_interval: Duration) -> Self {
        self.sweep_interval = sweep_interval;
        self
    }

    /// Run the sweeper loop until the cancellation token is triggered.
    ///
    /// Should be spawned as a background task:
    /// ```rust,ignore
    /// tokio::spawn(sweeper.run(shutdown.clone()));
    /// ```
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.sweep_interval.as_secs(),
            "Update sweeper starting"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.sweep_interval) => {},
                _ = shutdown.cancelled() => {
                    info!("Update sweeper shutting down");
                    return;
                }
            }

            self.sweep_step().await;
        }
    }

    /// Execute one sweep over every account.
    ///
    /// Only updates confirmed before the previous sweep are dropped, so each
    /// confirmation stays visible for at least one full interval.
    pub async fn sweep_step(&mut self) -> SweepOutcome {
        let cutoff = self.last_sweep.unwrap_or(DateTime::<Utc>::MIN_UTC);
        let mut monitor = self.state.monitor.write().await;
        self.last_sweep = Some(Utc::now());

        let before = monitor.account_count();
        let removed_updates = monitor.remove_updates_confirmed_before(cutoff);
        let monitored_accounts = monitor.account_count();

        let pending_assets = monitor
            .make_batch_request()
            .values()
            .map(|request| request.len())
            .sum();

        let outcome = SweepOutcome {
            removed_updates,
            removed_accounts: before - monitored_accounts,
            monitored_accounts,
            pending_assets,
        };

        if outcome.removed_updates > 0 || outcome.removed_accounts > 0 || outcome.pending_assets > 0 {
            info!(
                removed_updates = outcome.removed_updates,
                removed_accounts = outcome.removed_accounts,
                monitored_accounts = outcome.monitored_accounts,
                pending_assets = outcome.pending_assets,
                "Swept completed updates"
            );
        } else {
            debug!("Sweep found nothing to do");
        }

        outcome
    }
}
