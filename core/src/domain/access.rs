// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Access blocks
//!
//! One [`AccessBlock`] is one `access.conf` stanza. Blocks are validated and
//! rendered at construction and are immutable afterwards; an invalid block
//! can never reach the assembler.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Access-block validation and per-block rendering

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use super::catalog::{
    ACCESS_CATALOG, DEFAULT_SOURCE, GPG_ALLOW_NO_PW, GPG_DECRYPT_ID, GPG_DECRYPT_PW, KEY,
    KEY_BASE64, SOURCE,
};
use super::error::{ConfigError, Result};
use super::option::{OptionSet, OptionValue, RawValue};
use super::renderer::render;

/// Weight used when a block does not set one.
pub const DEFAULT_ORDER: u64 = 10;

const AUTH_METHODS: [&str; 3] = [KEY, KEY_BASE64, GPG_DECRYPT_ID];

/// Ordering weight of an access block.
///
/// Numeric weights compare as numbers, so `5` sorts before `10`. Textual
/// weights compare lexically and sort after every numeric weight.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Order {
    Numeric(u64),
    Text(String),
}

impl Order {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<u64>() {
            Ok(n) => Self::Numeric(n),
            Err(_) => Self::Text(trimmed.to_string()),
        }
    }
}

impl Default for Order {
    fn default() -> Self {
        Self::Numeric(DEFAULT_ORDER)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for Order {
    fn from(value: u64) -> Self {
        Self::Numeric(value)
    }
}

impl From<&str> for Order {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl Serialize for Order {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Numeric(n) => serializer.serialize_u64(*n),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Order {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawOrder {
            Number(u64),
            Text(String),
        }

        Ok(match RawOrder::deserialize(deserializer)? {
            RawOrder::Number(n) => Self::Numeric(n),
            RawOrder::Text(s) => Self::parse(&s),
        })
    }
}

/// Check the authentication invariants of one access block.
///
/// Exactly one of `key`, `key_base64` and `gpg_decrypt_id` must be set.
/// `gpg_decrypt_id` additionally needs exactly one of `gpg_decrypt_pw` or
/// `gpg_allow_no_pw = true`.
pub fn validate(title: &str, values: &OptionSet) -> Result<()> {
    let methods: Vec<String> = AUTH_METHODS
        .iter()
        .filter(|method| values.contains(method))
        .map(|method| method.to_string())
        .collect();

    match methods.len() {
        0 => {
            return Err(ConfigError::MissingAuthMethod {
                title: title.to_string(),
            })
        }
        1 => {}
        _ => {
            return Err(ConfigError::ConflictingAuthMethod {
                title: title.to_string(),
                found: methods,
            })
        }
    }

    if values.contains(GPG_DECRYPT_ID) {
        let has_password = values.contains(GPG_DECRYPT_PW);
        let allow_no_password = values
            .get(GPG_ALLOW_NO_PW)
            .and_then(OptionValue::as_bool)
            .unwrap_or(false);

        match (has_password, allow_no_password) {
            (true, false) | (false, true) => {}
            (false, false) => {
                return Err(ConfigError::MissingGpgPassword {
                    title: title.to_string(),
                })
            }
            (true, true) => {
                return Err(ConfigError::ConflictingGpgPassword {
                    title: title.to_string(),
                })
            }
        }
    }

    Ok(())
}

#[derive(Clone, PartialEq, Eq)]
pub struct AccessBlock {
    title: String,
    order: Order,
    options: OptionSet,
    body: Vec<String>,
}

// The rendered body holds revealed secrets, so Debug only reports its size.
impl fmt::Debug for AccessBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessBlock")
            .field("title", &self.title)
            .field("order", &self.order)
            .field("options", &self.options)
            .field("body_lines", &self.body.len())
            .finish()
    }
}

impl AccessBlock {
    /// Validate and render a block. `SOURCE` defaults to `ANY` when unset.
    pub fn new(title: impl Into<String>, order: Order, mut options: OptionSet) -> Result<Self> {
        let title = title.into();
        if title.trim().is_empty() || title.contains('\n') || title.contains('\r') {
            return Err(ConfigError::InvalidTitle { title });
        }

        let context = format!("access block '{}'", title);
        ACCESS_CATALOG.typecheck(&context, &options)?;

        if !options.contains(SOURCE) {
            options.set(SOURCE, vec![DEFAULT_SOURCE.to_string()]);
        }

        validate(&title, &options)?;

        let body = render(&ACCESS_CATALOG, &options);
        debug!(title = %title, order = %order, lines = body.len(), "Rendered access block");

        Ok(Self {
            title,
            order,
            options,
            body,
        })
    }

    /// Build a block from untyped manifest values.
    pub fn from_raw(
        title: impl Into<String>,
        order: Order,
        raw: &BTreeMap<String, RawValue>,
    ) -> Result<Self> {
        let title = title.into();
        let context = format!("access block '{}'", title);
        let options = ACCESS_CATALOG.coerce(&context, raw)?;
        Self::new(title, order, options)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    pub fn body_lines(&self) -> &[String] {
        &self.body
    }

    /// Fragment text: blank line, `# <title>`, then the directive lines.
    pub fn fragment(&self) -> String {
        let mut out = format!("\n# {}\n", self.title);
        for line in &self.body {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Assembly order: `(order, title)` ascending.
    pub fn assembly_cmp(&self, other: &Self) -> Ordering {
        self.order
            .cmp(&other.order)
            .then_with(|| self.title.cmp(&other.title))
    }
}
