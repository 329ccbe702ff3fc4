// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! fwknop-manager core
//!
//! Renders `fwknopd.conf`, assembles `access.conf` from independently
//! declared access blocks, and plans/applies the package -> config -> service
//! lifecycle for the fwknop SPA daemon.
//!
//! # Architecture
//!
//! - **domain:** option catalogs, values, validation, rendering, assembly,
//!   manifest and the resource plan model
//! - **application:** lifecycle planner and reconciler
//! - **infrastructure:** host fact readers and the in-memory host

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
