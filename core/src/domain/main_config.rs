// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Main daemon configuration (`fwknopd.conf`)
//!
//! `PCAP_INTF` is the one directive that is always written. When the caller
//! leaves it unset the host's primary interface is used instead.

use std::collections::BTreeMap;

use super::assembler::managed_header;
use super::catalog::{MAIN_CATALOG, PCAP_INTF};
use super::error::{ConfigError, Result};
use super::facts::HostFacts;
use super::option::{OptionSet, OptionValue, RawValue};
use super::renderer::render;

const CONTEXT: &str = "main config";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MainConfig {
    options: OptionSet,
}

impl MainConfig {
    pub fn new(options: OptionSet) -> Result<Self> {
        MAIN_CATALOG.typecheck(CONTEXT, &options)?;
        Ok(Self { options })
    }

    pub fn from_raw(raw: &BTreeMap<String, RawValue>) -> Result<Self> {
        Ok(Self {
            options: MAIN_CATALOG.coerce(CONTEXT, raw)?,
        })
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    /// Explicit `pcap_intf`, else the primary interface reported by `facts`.
    pub fn capture_interface(&self, facts: &dyn HostFacts) -> Result<String> {
        match self.options.get(PCAP_INTF) {
            Some(value) => Ok(value.render().into_owned()),
            None => facts
                .primary_interface()
                .ok_or(ConfigError::UnresolvedCaptureInterface),
        }
    }

    /// Directive lines with the capture interface resolved.
    pub fn lines(&self, facts: &dyn HostFacts) -> Result<Vec<String>> {
        let mut resolved = self.options.clone();
        if !resolved.contains(PCAP_INTF) {
            resolved.set(PCAP_INTF, OptionValue::Str(self.capture_interface(facts)?));
        }
        Ok(render(&MAIN_CATALOG, &resolved))
    }

    /// Full file text: managed header then one line per directive.
    pub fn render(&self, managed_by: &str, facts: &dyn HostFacts) -> Result<String> {
        let mut out = managed_header(managed_by);
        out.push('\n');
        for line in self.lines(facts)? {
            out.push_str(&line);
            out.push('\n');
        }
        Ok(out)
    }

    pub fn has_sensitive(&self) -> bool {
        self.options.has_sensitive()
    }
}
