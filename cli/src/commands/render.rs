// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Render commands
//!
//! Commands: main, access

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::PathBuf;

use fwknop_core::infrastructure::facts::SystemFacts;

use super::load_manifest;

#[derive(Subcommand)]
pub enum RenderCommand {
    /// Print fwknopd.conf
    Main,

    /// Print access.conf
    Access,
}

pub fn handle_command(command: RenderCommand, config_override: Option<PathBuf>) -> Result<()> {
    let manifest = load_manifest(config_override)?;

    let text = match command {
        RenderCommand::Main => manifest
            .main_config()?
            .render(&manifest.spec.managed_by, &SystemFacts::new())
            .context("Failed to render fwknopd.conf")?,
        RenderCommand::Access => manifest
            .assembler()
            .context("Failed to assemble access.conf")?
            .assemble(),
    };

    print!("{}", text);
    Ok(())
}
