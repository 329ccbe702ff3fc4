// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for fwknop-manager

pub mod apply;
pub mod config;
pub mod plan;
pub mod render;

pub use self::apply::ApplyArgs;
pub use self::config::ConfigCommand;
pub use self::plan::PlanArgs;
pub use self::render::RenderCommand;

use anyhow::{Context, Result};
use std::path::PathBuf;

use fwknop_core::domain::manifest::FwknopManifest;

/// Load (explicit path or discovery) and validate the manifest.
pub(crate) fn load_manifest(config_override: Option<PathBuf>) -> Result<FwknopManifest> {
    let manifest =
        FwknopManifest::load_or_default(config_override).context("Failed to load configuration")?;
    manifest
        .validate()
        .context("Configuration validation failed")?;
    Ok(manifest)
}
