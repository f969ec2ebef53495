// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain Updates Monitor
//!
//! Tracks asset opt-ins, opt-outs and full collectible transfers that have
//! been submitted for an account but are not yet reflected in its asset list,
//! and derives the single coalesced batch request used to poll for their
//! confirmation.
//!
//! ## Modules
//!
//! - `monitor` - Per-account and multi-account update bookkeeping
//! - `api` - HTTP API handlers (Axum)
//! - `sweeper` - Background removal of completed updates
//! - `config` - Environment configuration

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod monitor;
pub mod state;
pub mod sweeper;
