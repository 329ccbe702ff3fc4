// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Fragment Assembler
//!
//! Merges independently declared [`AccessBlock`]s into one `access.conf`.
//! Each caller declares its own block without knowing about the others; the
//! assembled text depends only on the *set* of declarations, ordered by
//! `(order, title)`, never on the order `declare` was called in.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Deterministic, collision-free fragment concatenation

use std::collections::BTreeMap;

use tracing::debug;

use super::access::AccessBlock;
use super::error::{ConfigError, Result};

/// Tool name written into the managed-file header.
pub const DEFAULT_MANAGED_BY: &str = "fwknop-manager";

/// Header line (without trailing newline) marking a file as generated.
pub fn managed_header(tool: &str) -> String {
    format!("# Managed by {}.", tool)
}

#[derive(Debug, Clone)]
pub struct FragmentAssembler {
    header: String,
    blocks: BTreeMap<String, AccessBlock>,
}

impl Default for FragmentAssembler {
    fn default() -> Self {
        Self::new(managed_header(DEFAULT_MANAGED_BY))
    }
}

impl FragmentAssembler {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            blocks: BTreeMap::new(),
        }
    }

    /// Add one block. A second block with an existing title is rejected;
    /// the first declaration is kept untouched.
    pub fn declare(&mut self, block: AccessBlock) -> Result<()> {
        if self.blocks.contains_key(block.title()) {
            return Err(ConfigError::DuplicateTitle {
                title: block.title().to_string(),
            });
        }
        debug!(title = block.title(), order = %block.order(), "Declared access fragment");
        self.blocks.insert(block.title().to_string(), block);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks in assembly order.
    pub fn ordered(&self) -> Vec<&AccessBlock> {
        let mut blocks: Vec<&AccessBlock> = self.blocks.values().collect();
        blocks.sort_by(|a, b| a.assembly_cmp(b));
        blocks
    }

    pub fn has_sensitive(&self) -> bool {
        self.blocks.values().any(|b| b.options().has_sensitive())
    }

    /// Header line followed by every fragment in `(order, title)` order.
    pub fn assemble(&self) -> String {
        let mut out = String::with_capacity(self.header.len() + 1);
        out.push_str(&self.header);
        out.push('\n');
        for block in self.ordered() {
            out.push_str(&block.fragment());
        }
        out
    }
}

/// One-shot assembly of a whole block set.
pub fn assemble(
    header: impl Into<String>,
    blocks: impl IntoIterator<Item = AccessBlock>,
) -> Result<String> {
    let mut assembler = FragmentAssembler::new(header);
    for block in blocks {
        assembler.declare(block)?;
    }
    Ok(assembler.assemble())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::access::Order;
    use crate::domain::option::OptionSet;

    fn block(title: &str, order: &str) -> AccessBlock {
        AccessBlock::new(title, Order::parse(order), OptionSet::new().with("key", "k")).unwrap()
    }

    #[test]
    fn test_empty_set_is_header_only() {
        let text = FragmentAssembler::default().assemble();
        assert_eq!(text, "# Managed by fwknop-manager.\n");
    }

    #[test]
    fn test_numeric_order_wins_over_declaration_order() {
        let forward = assemble("# h", vec![block("a", "10"), block("b", "5")]).unwrap();
        let reverse = assemble("# h", vec![block("b", "5"), block("a", "10")]).unwrap();
        assert_eq!(forward, reverse);
        assert!(forward.find("# b").unwrap() < forward.find("# a").unwrap());
    }

    #[test]
    fn test_title_breaks_ties() {
        let text = assemble("# h", vec![block("zulu", "10"), block("alpha", "10")]).unwrap();
        assert!(text.find("# alpha").unwrap() < text.find("# zulu").unwrap());
    }

    #[test]
    fn test_duplicate_title_rejected() {
        let mut assembler = FragmentAssembler::default();
        assembler.declare(block("dup", "1")).unwrap();
        let err = assembler.declare(block("dup", "2")).unwrap_err();
        assert_eq!(err, ConfigError::DuplicateTitle { title: "dup".into() });
        assert_eq!(assembler.len(), 1);
        assert_eq!(assembler.ordered()[0].order(), &Order::Numeric(1));
    }
}
