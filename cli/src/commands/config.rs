// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use fwknop_core::domain::manifest::{FwknopManifest, CONFIG_PATH_ENV};

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./fwknop-manager.yaml)
        #[arg(short, long, default_value = "./fwknop-manager.yaml")]
        output: PathBuf,

        /// Include examples and comments
        #[arg(long)]
        examples: bool,
    },
}

pub fn handle_command(command: ConfigCommand, config_override: Option<PathBuf>) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths),
        ConfigCommand::Validate { file } => validate(file.or(config_override)),
        ConfigCommand::Generate { output, examples } => generate(output, examples),
    }
}

fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = FwknopManifest::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. {}: {}",
            CONFIG_PATH_ENV,
            std::env::var(CONFIG_PATH_ENV)
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./fwknop-manager.yaml");
        println!("  4. ~/.config/fwknop-manager/config.yaml");
        println!("  5. /etc/fwknop-manager/config.yaml");
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!();

    println!("{}", "Host:".bold());
    println!("  Name: {}", config.metadata.name);
    println!();

    let spec = &config.spec;
    println!("{}", "Lifecycle:".bold());
    println!(
        "  Package: {} ({})",
        spec.package_name,
        if spec.package_manage { "managed" } else { "unmanaged" }
    );
    println!(
        "  Service: {} ({})",
        spec.service_name,
        if spec.service_manage { "managed" } else { "unmanaged" }
    );
    println!("  Config dir: {}", spec.config_dir.display());
    println!();

    println!("{}", "fwknopd.conf options:".bold());
    if spec.main.is_empty() {
        println!("  {}", "(daemon defaults)".dimmed());
    }
    for name in spec.main.keys() {
        println!("  {}", name);
    }
    println!();

    println!("{}", "Access blocks:".bold());
    if spec.access.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for access in &spec.access {
        let order = access
            .order
            .as_ref()
            .map(|o| o.to_string())
            .unwrap_or_else(|| "10".to_string());
        println!(
            "  {} (order {}, {} option(s))",
            access.title.bold(),
            order,
            access.options.len()
        );
    }
    println!();

    Ok(())
}

fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = FwknopManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

fn generate(output: PathBuf, with_examples: bool) -> Result<()> {
    let sample = if with_examples {
        include_str!("../../templates/config-with-examples.yaml")
    } else {
        include_str!("../../templates/config-minimal.yaml")
    };

    std::fs::write(&output, sample)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}
