// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Apply command: converge the local host to the plan

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::info;

use fwknop_core::application::planner;
use fwknop_core::application::reconciler::{ApplyMode, ApplyReport, ChangeAction, Reconciler};
use fwknop_core::infrastructure::facts::SystemFacts;

use super::load_manifest;
use crate::host::LocalHost;

#[derive(Args)]
pub struct ApplyArgs {
    /// Write files beneath this directory instead of `/` (implies --files-only)
    #[arg(long, value_name = "DIR", default_value = "/")]
    pub root: PathBuf,

    /// Report changes without making them
    #[arg(long)]
    pub dry_run: bool,

    /// Only manage the config directory and files
    #[arg(long)]
    pub files_only: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: ApplyArgs, config_override: Option<PathBuf>) -> Result<()> {
    let mut manifest = load_manifest(config_override)?;

    let staged = args.root != Path::new("/");
    if args.files_only || staged {
        info!(root = ?args.root, "Package and service management disabled");
        manifest.spec.package_manage = false;
        manifest.spec.service_manage = false;
    }

    let plan = planner::plan(&manifest, &SystemFacts::new()).context("Failed to build plan")?;

    let mode = if args.dry_run {
        ApplyMode::DryRun
    } else {
        ApplyMode::Apply
    };
    let mut host = LocalHost::new(&args.root);
    let report = Reconciler::new(mode)
        .apply(&plan, &mut host)
        .context("Apply failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &ApplyReport) {
    let dry_run = report.mode == ApplyMode::DryRun;
    if report.is_empty() {
        println!("{}", "✓ Host already converged, nothing to do".green());
        return;
    }

    for change in &report.changes {
        let action = format!("{:?}", change.action);
        let action = match change.action {
            ChangeAction::Restart => action.yellow(),
            _ => action.cyan(),
        };
        match &change.detail {
            Some(detail) => println!("  {} {} ({})", action, change.resource, detail.dimmed()),
            None => println!("  {} {}", action, change.resource),
        }
    }
    println!();

    let summary = format!(
        "{} {} change(s)",
        if dry_run { "Would apply" } else { "✓ Applied" },
        report.changes.len()
    );
    if dry_run {
        println!("{}", summary.yellow());
    } else {
        println!("{}", summary.green());
    }
}
