// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! System host facts
//!
//! Reads the primary interface from the kernel routing table: the interface
//! of the lowest-metric default route that is up.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::domain::facts::HostFacts;

const ROUTE_TABLE: &str = "/proc/net/route";
const RTF_UP: u32 = 0x0001;

#[derive(Debug, Clone)]
pub struct SystemFacts {
    route_table: PathBuf,
}

impl Default for SystemFacts {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemFacts {
    pub fn new() -> Self {
        Self::with_route_table(ROUTE_TABLE)
    }

    pub fn with_route_table(path: impl Into<PathBuf>) -> Self {
        Self {
            route_table: path.into(),
        }
    }
}

impl HostFacts for SystemFacts {
    fn primary_interface(&self) -> Option<String> {
        match std::fs::read_to_string(&self.route_table) {
            Ok(table) => {
                let iface = parse_default_route(&table);
                debug!(route_table = ?self.route_table, interface = ?iface, "Resolved primary interface");
                iface
            }
            Err(e) => {
                warn!("Failed to read route table {:?}: {}", self.route_table, e);
                None
            }
        }
    }
}

/// Interface of the best default route in `/proc/net/route` format.
pub fn parse_default_route(table: &str) -> Option<String> {
    table
        .lines()
        .skip(1)
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 8 {
                return None;
            }
            let destination = u32::from_str_radix(fields[1], 16).ok()?;
            let flags = u32::from_str_radix(fields[3], 16).ok()?;
            let metric: u32 = fields[6].parse().ok()?;
            let mask = u32::from_str_radix(fields[7], 16).ok()?;
            (destination == 0 && mask == 0 && flags & RTF_UP != 0).then_some((metric, fields[0]))
        })
        .min_by_key(|(metric, _)| *metric)
        .map(|(_, iface)| iface.to_string())
}
