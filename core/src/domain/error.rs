// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Plan-time errors
//!
//! Every variant is raised while building the configuration plan, before
//! any file is written or any package/service is touched. Access block
//! errors name the offending block title.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("access block '{title}': only one of key, key_base64 or gpg_decrypt_id may be set (found {found:?})")]
    ConflictingAuthMethod { title: String, found: Vec<String> },

    #[error("access block '{title}': one of key, key_base64 or gpg_decrypt_id must be set")]
    MissingAuthMethod { title: String },

    #[error("access block '{title}': gpg_decrypt_id requires gpg_decrypt_pw or gpg_allow_no_pw = true")]
    MissingGpgPassword { title: String },

    #[error("access block '{title}': gpg_decrypt_pw cannot be combined with gpg_allow_no_pw = true")]
    ConflictingGpgPassword { title: String },

    #[error("access block '{title}' is declared more than once")]
    DuplicateTitle { title: String },

    #[error("access block title {title:?} must be non-empty and fit on a single line")]
    InvalidTitle { title: String },

    #[error("{context}: option '{option}' expects {expected}, got {found}")]
    InvalidOptionType {
        context: String,
        option: String,
        expected: String,
        found: String,
    },

    #[error("{context}: unknown option '{option}'")]
    UnknownOption { context: String, option: String },

    #[error("{context}: option '{option}' must be one of {allowed:?}, got '{value}'")]
    InvalidEnumValue {
        context: String,
        option: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("pcap_intf is unset and the host reports no primary network interface")]
    UnresolvedCaptureInterface,

    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("dependency cycle detected at {0}")]
    DependencyCycle(String),
}

impl ConfigError {
    /// Title of the access block this error refers to, if any.
    pub fn block_title(&self) -> Option<&str> {
        match self {
            Self::ConflictingAuthMethod { title, .. }
            | Self::MissingAuthMethod { title }
            | Self::MissingGpgPassword { title }
            | Self::ConflictingGpgPassword { title }
            | Self::DuplicateTitle { title }
            | Self::InvalidTitle { title } => Some(title),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
