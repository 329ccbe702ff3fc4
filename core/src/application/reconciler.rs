// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Reconciler
//!
//! Walks a [`ResourcePlan`] in dependency order and converges each resource
//! on a [`HostProvider`]. A change to a resource with `Notifies` edges marks
//! the target service for restart; the restart happens when the service is
//! visited, and only if the service was already running. A service that was
//! just started is not restarted again.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Idempotent plan execution with change reporting

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::error::ConfigError;
use crate::domain::host::{FileState, HostError, HostProvider, Ownership};
use crate::domain::resource::{FileSpec, Resource, ResourceId, ResourcePlan};

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error(transparent)]
    Plan(#[from] ConfigError),

    #[error("{resource}: {source}")]
    Host {
        resource: ResourceId,
        #[source]
        source: HostError,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyMode {
    #[default]
    Apply,
    /// Report what would change without touching the host
    DryRun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    Install,
    CreateDirectory,
    FixDirectory,
    CreateFile,
    UpdateContent,
    FixOwnership,
    Start,
    Enable,
    Restart,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub resource: ResourceId,
    pub action: ChangeAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub mode: ApplyMode,
    pub changes: Vec<Change>,
}

impl ApplyReport {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn changed(&self, resource: &ResourceId) -> bool {
        self.changes.iter().any(|c| &c.resource == resource)
    }

    pub fn restarts(&self) -> impl Iterator<Item = &ResourceId> {
        self.changes
            .iter()
            .filter(|c| c.action == ChangeAction::Restart)
            .map(|c| &c.resource)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    mode: ApplyMode,
}

impl Reconciler {
    pub fn new(mode: ApplyMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ApplyMode {
        self.mode
    }

    pub fn apply(
        &self,
        plan: &ResourcePlan,
        host: &mut dyn HostProvider,
    ) -> Result<ApplyReport, ApplyError> {
        let mut report = ApplyReport {
            mode: self.mode,
            changes: Vec::new(),
        };
        let mut pending_restart: HashSet<ResourceId> = HashSet::new();

        for resource in plan.ordered()? {
            let id = resource.id();
            let before = report.changes.len();

            self.converge(resource, &id, host, &pending_restart, &mut report)
                .map_err(|source| ApplyError::Host {
                    resource: id.clone(),
                    source,
                })?;

            if report.changes.len() > before {
                for target in plan.notifies_of(&id) {
                    debug!(source = %id, target = %target, "Scheduling restart");
                    pending_restart.insert(target.clone());
                }
            } else {
                debug!(resource = %id, "In sync");
            }
        }

        info!(
            mode = ?self.mode,
            changes = report.changes.len(),
            "Reconciliation finished"
        );
        Ok(report)
    }

    fn converge(
        &self,
        resource: &Resource,
        id: &ResourceId,
        host: &mut dyn HostProvider,
        pending_restart: &HashSet<ResourceId>,
        report: &mut ApplyReport,
    ) -> Result<(), HostError> {
        let mut record = |action: ChangeAction, detail: Option<String>| {
            info!(resource = %id, action = ?action, dry_run = self.dry_run(), "Change");
            report.changes.push(Change {
                resource: id.clone(),
                action,
                detail,
            });
        };

        match resource {
            Resource::Package { name } => {
                if !host.package_installed(name)? {
                    record(ChangeAction::Install, None);
                    if !self.dry_run() {
                        host.install_package(name)?;
                    }
                }
            }

            Resource::Directory {
                path,
                owner,
                group,
                mode,
            } => {
                let desired = Ownership {
                    owner: owner.clone(),
                    group: group.clone(),
                    mode: *mode,
                };
                let check_owner = host.manages_ownership();
                let action = match host.directory_state(path)? {
                    None => Some((ChangeAction::CreateDirectory, None)),
                    Some(current) if !current.satisfies(&desired, check_owner) => Some((
                        ChangeAction::FixDirectory,
                        Some(ownership_detail(&current, &desired)),
                    )),
                    Some(_) => None,
                };
                if let Some((action, detail)) = action {
                    record(action, detail);
                    if !self.dry_run() {
                        host.ensure_directory(path, &desired)?;
                    }
                }
            }

            Resource::File(spec) => {
                let actions = file_actions(host.file_state(&spec.path)?, spec, host.manages_ownership());
                if !actions.is_empty() {
                    for (action, detail) in actions {
                        record(action, detail);
                    }
                    if !self.dry_run() {
                        host.write_file(spec)?;
                    }
                }
            }

            Resource::Service {
                name,
                running,
                enabled,
            } => {
                let state = host.service_state(name)?;
                if *running && !state.running {
                    record(ChangeAction::Start, None);
                    if !self.dry_run() {
                        host.start_service(name)?;
                    }
                } else if state.running && pending_restart.contains(id) {
                    record(ChangeAction::Restart, Some("configuration changed".to_string()));
                    if !self.dry_run() {
                        host.restart_service(name)?;
                    }
                }
                if *enabled && !state.enabled {
                    record(ChangeAction::Enable, None);
                    if !self.dry_run() {
                        host.enable_service(name)?;
                    }
                }
            }
        }

        Ok(())
    }

    fn dry_run(&self) -> bool {
        self.mode == ApplyMode::DryRun
    }
}

fn file_actions(
    current: Option<FileState>,
    spec: &FileSpec,
    check_owner: bool,
) -> Vec<(ChangeAction, Option<String>)> {
    let Some(current) = current else {
        return vec![(
            ChangeAction::CreateFile,
            Some(format!("{} bytes", spec.content.len())),
        )];
    };

    let mut actions = Vec::new();
    if current.content != spec.content.as_bytes() {
        // Never include content; it may hold keys.
        actions.push((
            ChangeAction::UpdateContent,
            Some(format!(
                "{} -> {} bytes",
                current.content.len(),
                spec.content.len()
            )),
        ));
    }
    let desired = spec.ownership();
    if !current.ownership.satisfies(&desired, check_owner) {
        actions.push((
            ChangeAction::FixOwnership,
            Some(ownership_detail(&current.ownership, &desired)),
        ));
    }
    actions
}

fn ownership_detail(current: &Ownership, desired: &Ownership) -> String {
    format!(
        "{}:{} {} -> {}:{} {}",
        current.owner,
        current.group,
        current.mode,
        desired.owner,
        desired.group,
        desired.mode
    )
}
