// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! In-memory host
//!
//! A [`HostProvider`] that keeps packages, files and services in maps. Used
//! by tests and by `plan`-style previews that must not touch the machine.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use crate::domain::host::{FileState, HostError, HostProvider, Ownership, ServiceState};
use crate::domain::resource::FileSpec;

#[derive(Debug, Clone, Default)]
pub struct InMemoryHost {
    packages: BTreeSet<String>,
    directories: BTreeMap<PathBuf, Ownership>,
    files: BTreeMap<PathBuf, FileState>,
    services: BTreeMap<String, ServiceState>,
    restarts: HashMap<String, usize>,
    /// Every mutating call, in order, e.g. `install fwknop-server`
    operations: Vec<String>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend `name` is already installed.
    pub fn with_package(mut self, name: &str) -> Self {
        self.packages.insert(name.to_string());
        self
    }

    pub fn with_service(mut self, name: &str, state: ServiceState) -> Self {
        self.services.insert(name.to_string(), state);
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, state: FileState) -> Self {
        self.files.insert(path.into(), state);
        self
    }

    pub fn file(&self, path: &Path) -> Option<&FileState> {
        self.files.get(path)
    }

    pub fn has_package(&self, name: &str) -> bool {
        self.packages.contains(name)
    }

    pub fn service(&self, name: &str) -> ServiceState {
        self.services.get(name).copied().unwrap_or_default()
    }

    pub fn restart_count(&self, name: &str) -> usize {
        self.restarts.get(name).copied().unwrap_or(0)
    }

    pub fn operations(&self) -> &[String] {
        &self.operations
    }

    /// Simulate an out-of-band edit.
    pub fn tamper_file(&mut self, path: &Path, content: impl Into<Vec<u8>>) {
        if let Some(file) = self.files.get_mut(path) {
            file.content = content.into();
        }
    }

    fn record(&mut self, op: String) {
        self.operations.push(op);
    }
}

impl HostProvider for InMemoryHost {
    fn package_installed(&self, name: &str) -> Result<bool, HostError> {
        Ok(self.packages.contains(name))
    }

    fn install_package(&mut self, name: &str) -> Result<(), HostError> {
        self.packages.insert(name.to_string());
        self.record(format!("install {}", name));
        Ok(())
    }

    fn directory_state(&self, path: &Path) -> Result<Option<Ownership>, HostError> {
        Ok(self.directories.get(path).cloned())
    }

    fn ensure_directory(&mut self, path: &Path, ownership: &Ownership) -> Result<(), HostError> {
        self.directories.insert(path.to_path_buf(), ownership.clone());
        self.record(format!("mkdir {}", path.display()));
        Ok(())
    }

    fn file_state(&self, path: &Path) -> Result<Option<FileState>, HostError> {
        Ok(self.files.get(path).cloned())
    }

    fn write_file(&mut self, spec: &FileSpec) -> Result<(), HostError> {
        if let Some(parent) = spec.path.parent() {
            if !self.directories.contains_key(parent) {
                return Err(HostError::io(
                    &spec.path,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "parent directory missing"),
                ));
            }
        }
        self.files.insert(
            spec.path.clone(),
            FileState {
                content: spec.content.clone().into_bytes(),
                ownership: spec.ownership(),
            },
        );
        self.record(format!("write {}", spec.path.display()));
        Ok(())
    }

    fn service_state(&self, name: &str) -> Result<ServiceState, HostError> {
        Ok(self.service(name))
    }

    fn start_service(&mut self, name: &str) -> Result<(), HostError> {
        self.services.entry(name.to_string()).or_default().running = true;
        self.record(format!("start {}", name));
        Ok(())
    }

    fn enable_service(&mut self, name: &str) -> Result<(), HostError> {
        self.services.entry(name.to_string()).or_default().enabled = true;
        self.record(format!("enable {}", name));
        Ok(())
    }

    fn restart_service(&mut self, name: &str) -> Result<(), HostError> {
        *self.restarts.entry(name.to_string()).or_insert(0) += 1;
        self.services.entry(name.to_string()).or_default().running = true;
        self.record(format!("restart {}", name));
        Ok(())
    }
}
