// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Options and option values
//!
//! An [`OptionSpec`] describes one directive a config file may contain. An
//! [`OptionSet`] carries the values supplied for one invocation; a name that
//! is absent from the set is simply not rendered and the daemon default
//! applies.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Typed parameter surface consumed by renderer and validator

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, Result};
use super::sensitive::Sensitive;

/// Semantic type of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Boolean,
    Integer,
    String,
    /// String restricted to the listed values
    Enum(&'static [&'static str]),
    /// String that may be supplied wrapped as sensitive
    SensitiveString,
    /// Non-empty comma separated list (a single string is also accepted)
    List,
}

impl OptionKind {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Boolean => "a boolean",
            Self::Integer => "an integer",
            Self::String => "a string",
            Self::Enum(_) => "an enumerated string",
            Self::SensitiveString => "a string or sensitive string",
            Self::List => "a string or list of strings",
        }
    }
}

/// How an option's line is keyed in the rendered file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Regular `KEYWORD value` directive
    Keyword(&'static str),
    /// Pragma such as `%include`, which is not derived from an option keyword
    Pragma(&'static str),
}

impl Directive {
    pub fn token(&self) -> &'static str {
        match self {
            Self::Keyword(token) | Self::Pragma(token) => token,
        }
    }

    pub fn is_pragma(&self) -> bool {
        matches!(self, Self::Pragma(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: &'static str,
    pub kind: OptionKind,
    pub directive: Directive,
}

impl OptionSpec {
    pub const fn keyword(name: &'static str, kind: OptionKind, keyword: &'static str) -> Self {
        Self {
            name,
            kind,
            directive: Directive::Keyword(keyword),
        }
    }

    pub const fn pragma(name: &'static str, kind: OptionKind, pragma: &'static str) -> Self {
        Self {
            name,
            kind,
            directive: Directive::Pragma(pragma),
        }
    }

    /// Whether an already-typed value satisfies this option's kind.
    pub fn accepts(&self, value: &OptionValue) -> bool {
        match (self.kind, value) {
            (OptionKind::Boolean, OptionValue::Bool(_)) => true,
            (OptionKind::Integer, OptionValue::Integer(_)) => true,
            (OptionKind::String, OptionValue::Str(_)) => true,
            (OptionKind::Enum(allowed), OptionValue::Str(s)) => allowed.contains(&s.as_str()),
            (OptionKind::SensitiveString, OptionValue::Str(_) | OptionValue::Sensitive(_)) => true,
            (OptionKind::List, OptionValue::Str(_)) => true,
            (OptionKind::List, OptionValue::List(items)) => !items.is_empty(),
            _ => false,
        }
    }

    /// Coerce a raw manifest value into a typed value for this option.
    pub fn coerce(&self, context: &str, raw: &RawValue) -> Result<OptionValue> {
        let mismatch = || ConfigError::InvalidOptionType {
            context: context.to_string(),
            option: self.name.to_string(),
            expected: self.kind.describe().to_string(),
            found: raw.type_name().to_string(),
        };

        match (self.kind, raw) {
            (OptionKind::Boolean, RawValue::Bool(b)) => Ok(OptionValue::Bool(*b)),
            (OptionKind::Integer, RawValue::Integer(n)) => Ok(OptionValue::Integer(*n)),
            (OptionKind::String, RawValue::Text(s)) => Ok(OptionValue::Str(s.clone())),
            (OptionKind::Enum(allowed), RawValue::Text(s)) => {
                if allowed.contains(&s.as_str()) {
                    Ok(OptionValue::Str(s.clone()))
                } else {
                    Err(ConfigError::InvalidEnumValue {
                        context: context.to_string(),
                        option: self.name.to_string(),
                        value: s.clone(),
                        allowed: allowed.iter().map(|v| v.to_string()).collect(),
                    })
                }
            }
            (OptionKind::SensitiveString, RawValue::Text(s)) => Ok(OptionValue::Str(s.clone())),
            (OptionKind::SensitiveString, RawValue::Sensitive { sensitive }) => {
                Ok(OptionValue::Sensitive(Sensitive::new(sensitive.clone())))
            }
            (OptionKind::List, RawValue::Text(s)) => Ok(OptionValue::List(vec![s.clone()])),
            (OptionKind::List, RawValue::List(items)) if !items.is_empty() => {
                Ok(OptionValue::List(items.clone()))
            }
            _ => Err(mismatch()),
        }
    }
}

/// A typed option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    Integer(i64),
    Str(String),
    Sensitive(Sensitive<String>),
    List(Vec<String>),
}

impl OptionValue {
    /// Text written after the directive token. Sensitive values are revealed.
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            Self::Bool(true) => Cow::Borrowed("Y"),
            Self::Bool(false) => Cow::Borrowed("N"),
            Self::Integer(n) => Cow::Owned(n.to_string()),
            Self::Str(s) => Cow::Borrowed(s.as_str()),
            Self::Sensitive(s) => Cow::Borrowed(s.reveal().as_str()),
            Self::List(items) => Cow::Owned(items.join(", ")),
        }
    }

    pub fn is_sensitive(&self) -> bool {
        matches!(self, Self::Sensitive(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Str(_) => "string",
            Self::Sensitive(_) => "sensitive string",
            Self::List(items) if items.is_empty() => "empty list",
            Self::List(_) => "list",
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Sensitive<String>> for OptionValue {
    fn from(value: Sensitive<String>) -> Self {
        Self::Sensitive(value)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Values supplied for one invocation, keyed by option name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    values: BTreeMap<String, OptionValue>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a value, returning the one it replaced.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Option<OptionValue> {
        self.values.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<OptionValue> {
        self.values.remove(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn has_sensitive(&self) -> bool {
        self.values.values().any(OptionValue::is_sensitive)
    }
}

/// Untyped option value as written in a manifest.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Integer(i64),
    Text(String),
    List(Vec<String>),
    Sensitive { sensitive: String },
}

// Sensitive payloads must not leak through `{:?}` on manifests.
impl std::fmt::Debug for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Integer(n) => f.debug_tuple("Integer").field(n).finish(),
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Sensitive { .. } => f
                .debug_struct("Sensitive")
                .field("sensitive", &"[REDACTED]")
                .finish(),
        }
    }
}

impl RawValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Text(_) => "string",
            Self::List(items) if items.is_empty() => "empty list",
            Self::List(_) => "list",
            Self::Sensitive { .. } => "sensitive string",
        }
    }
}
