// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Host facts consumed while rendering.

/// Read-only facts about the managed host.
pub trait HostFacts {
    /// Name of the interface carrying the default route, e.g. `eth0`.
    fn primary_interface(&self) -> Option<String>;
}

/// Facts supplied up front, for tests and for hosts described by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticFacts {
    pub primary_interface: Option<String>,
}

impl StaticFacts {
    pub fn with_primary_interface(name: impl Into<String>) -> Self {
        Self {
            primary_interface: Some(name.into()),
        }
    }
}

impl HostFacts for StaticFacts {
    fn primary_interface(&self) -> Option<String> {
        self.primary_interface.clone()
    }
}
