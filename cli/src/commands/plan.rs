// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Plan command: show resources in apply order and their edges

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use fwknop_core::application::planner;
use fwknop_core::domain::resource::{EdgeKind, Resource, ResourcePlan};
use fwknop_core::infrastructure::facts::SystemFacts;

use super::load_manifest;

#[derive(Args)]
pub struct PlanArgs {
    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: PlanArgs, config_override: Option<PathBuf>) -> Result<()> {
    let manifest = load_manifest(config_override)?;
    let plan = planner::plan(&manifest, &SystemFacts::new()).context("Failed to build plan")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&plan)?;
    }
    Ok(())
}

fn print_plan(plan: &ResourcePlan) -> Result<()> {
    println!("{}", "Resources (apply order):".bold());
    for resource in plan.ordered()? {
        println!("  {}", resource.id().to_string().bold());
        match resource {
            Resource::Package { .. } => println!("    ensure: installed"),
            Resource::Directory {
                owner, group, mode, ..
            } => println!("    ensure: directory {}:{} {}", owner, group, mode),
            Resource::File(spec) => {
                println!("    ensure: file {}:{} {}", spec.owner, spec.group, spec.mode);
                if spec.sensitive {
                    println!("    content: {}", "(sensitive)".dimmed());
                } else {
                    println!("    content: {} bytes", spec.content.len());
                }
            }
            Resource::Service { running, enabled, .. } => {
                println!("    ensure: running={} enabled={}", running, enabled)
            }
        }
    }
    println!();

    println!("{}", "Edges:".bold());
    if plan.edges().is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for edge in plan.edges() {
        let arrow = match edge.kind {
            EdgeKind::Requires => "->",
            EdgeKind::Notifies => "~>",
        };
        println!("  {} {} {}", edge.from, arrow, edge.to);
    }
    Ok(())
}
