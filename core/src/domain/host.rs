// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Host provider seam
//!
//! Everything the reconciler needs from a managed host: package, directory,
//! file and service state, plus the single-step transitions that converge
//! each one. Implementations live in the infrastructure layer (in-memory) and
//! in the CLI (local system).

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::resource::{FileMode, FileSpec};

#[derive(Debug, Error)]
pub enum HostError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed ({status}): {stderr}")]
    Command {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("unsupported on this host: {0}")]
    Unsupported(String),
}

impl HostError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Observed state of a directory or file's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ownership {
    pub owner: String,
    pub group: String,
    pub mode: FileMode,
}

#[derive(Clone, PartialEq, Eq)]
pub struct FileState {
    /// Raw bytes on disk; need not be valid UTF-8
    pub content: Vec<u8>,
    pub ownership: Ownership,
}

// File content may hold secrets.
impl std::fmt::Debug for FileState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileState")
            .field("content_len", &self.content.len())
            .field("ownership", &self.ownership)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceState {
    pub running: bool,
    pub enabled: bool,
}

pub trait HostProvider {
    /// Whether owner and group can be enforced. When `false` only the mode
    /// of directories and files is compared.
    fn manages_ownership(&self) -> bool {
        true
    }

    fn package_installed(&self, name: &str) -> Result<bool, HostError>;
    fn install_package(&mut self, name: &str) -> Result<(), HostError>;

    /// `None` when the directory does not exist.
    fn directory_state(&self, path: &Path) -> Result<Option<Ownership>, HostError>;
    fn ensure_directory(&mut self, path: &Path, ownership: &Ownership) -> Result<(), HostError>;

    /// `None` when the file does not exist.
    fn file_state(&self, path: &Path) -> Result<Option<FileState>, HostError>;
    fn write_file(&mut self, spec: &FileSpec) -> Result<(), HostError>;

    fn service_state(&self, name: &str) -> Result<ServiceState, HostError>;
    fn start_service(&mut self, name: &str) -> Result<(), HostError>;
    fn enable_service(&mut self, name: &str) -> Result<(), HostError>;
    fn restart_service(&mut self, name: &str) -> Result<(), HostError>;
}

impl Ownership {
    /// Whether `self` satisfies `desired`, ignoring owner/group unless
    /// `check_owner` is set.
    pub fn satisfies(&self, desired: &Ownership, check_owner: bool) -> bool {
        self.mode == desired.mode
            && (!check_owner || (self.owner == desired.owner && self.group == desired.group))
    }
}

impl FileSpec {
    pub fn ownership(&self) -> Ownership {
        Ownership {
            owner: self.owner.clone(),
            group: self.group.clone(),
            mode: self.mode,
        }
    }
}
