// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # fwknop-manager
//!
//! Installs, configures and manages the fwknop SPA daemon on one host.
//!
//! ## Commands
//!
//! - `fwknop-manager render main|access` - Print a rendered config file
//! - `fwknop-manager plan [--json]` - Show the resource plan
//! - `fwknop-manager apply [--root DIR] [--dry-run]` - Converge the host
//! - `fwknop-manager config show|validate|generate` - Manifest management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use fwknop_manager::commands::{self, ApplyArgs, ConfigCommand, PlanArgs, RenderCommand};

/// fwknop-manager - fwknop SPA daemon configuration
#[derive(Parser)]
#[command(name = "fwknop-manager")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to manifest file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "FWKNOP_MANAGER_CONFIG",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "FWKNOP_MANAGER_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a rendered configuration file
    #[command(name = "render")]
    Render {
        #[command(subcommand)]
        command: RenderCommand,
    },

    /// Show the resource plan
    #[command(name = "plan")]
    Plan {
        #[command(flatten)]
        args: PlanArgs,
    },

    /// Converge the local host to the plan
    #[command(name = "apply")]
    Apply {
        #[command(flatten)]
        args: ApplyArgs,
    },

    /// Manifest management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    match cli.command {
        Some(Commands::Render { command }) => commands::render::handle_command(command, cli.config),
        Some(Commands::Plan { args }) => commands::plan::execute(args, cli.config),
        Some(Commands::Apply { args }) => commands::apply::execute(args, cli.config),
        Some(Commands::Config { command }) => commands::config::handle_command(command, cli.config),
        None => {
            // No command provided - show help
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    Ok(())
}
