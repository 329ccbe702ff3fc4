// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Lifecycle Orchestrator
//!
//! Turns a manifest into a [`ResourcePlan`]: install the package, write the
//! config directory and both files, keep the service running. Files notify
//! the service so a content change restarts it.

use std::path::PathBuf;

use tracing::info;

use crate::domain::error::Result;
use crate::domain::facts::HostFacts;
use crate::domain::manifest::{FwknopManifest, FwknopSpec};
use crate::domain::resource::{FileMode, FileSpec, Resource, ResourcePlan};

const OWNER: &str = "root";
const GROUP: &str = "root";

/// Toggles and names that shape the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleSettings {
    pub package_manage: bool,
    pub service_manage: bool,
    pub package_name: String,
    pub service_name: String,
    pub config_dir: PathBuf,
}

impl From<&FwknopSpec> for LifecycleSettings {
    fn from(spec: &FwknopSpec) -> Self {
        Self {
            package_manage: spec.package_manage,
            service_manage: spec.service_manage,
            package_name: spec.package_name.clone(),
            service_name: spec.service_name.clone(),
            config_dir: spec.config_dir.clone(),
        }
    }
}

/// Rendered file contents.
#[derive(Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub main: String,
    pub main_sensitive: bool,
    pub access: String,
    pub access_sensitive: bool,
}

impl std::fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifacts")
            .field("main_len", &self.main.len())
            .field("access_len", &self.access.len())
            .finish()
    }
}

/// Render both config files from a validated manifest.
pub fn render_artifacts(manifest: &FwknopManifest, facts: &dyn HostFacts) -> Result<Artifacts> {
    let main = manifest.main_config()?;
    let assembler = manifest.assembler()?;
    Ok(Artifacts {
        main: main.render(&manifest.spec.managed_by, facts)?,
        main_sensitive: main.has_sensitive(),
        access: assembler.assemble(),
        access_sensitive: assembler.has_sensitive(),
    })
}

/// Build the plan for rendered artifacts.
pub fn build_plan(settings: &LifecycleSettings, artifacts: &Artifacts) -> ResourcePlan {
    let mut plan = ResourcePlan::new();

    let package = settings.package_manage.then(|| {
        plan.add(Resource::Package {
            name: settings.package_name.clone(),
        })
    });

    let directory = plan.add(Resource::Directory {
        path: settings.config_dir.clone(),
        owner: OWNER.to_string(),
        group: GROUP.to_string(),
        mode: FileMode::DIRECTORY,
    });

    let files = [
        ("fwknopd.conf", &artifacts.main, artifacts.main_sensitive),
        ("access.conf", &artifacts.access, artifacts.access_sensitive),
    ]
    .map(|(name, content, sensitive)| {
        plan.add(Resource::File(FileSpec {
            path: settings.config_dir.join(name),
            owner: OWNER.to_string(),
            group: GROUP.to_string(),
            mode: FileMode::OWNER_READ_WRITE,
            content: content.clone(),
            sensitive,
        }))
    });

    let service = settings.service_manage.then(|| {
        plan.add(Resource::Service {
            name: settings.service_name.clone(),
            running: true,
            enabled: true,
        })
    });

    if let Some(package) = &package {
        plan.require(&directory, package);
    }
    for file in &files {
        if let Some(package) = &package {
            plan.require(file, package);
        }
        plan.require(file, &directory);
        if let Some(service) = &service {
            plan.notify(file, service);
        }
    }

    plan
}

/// Validate the manifest, render both files and build the plan.
pub fn plan(manifest: &FwknopManifest, facts: &dyn HostFacts) -> Result<ResourcePlan> {
    manifest.validate()?;
    let artifacts = render_artifacts(manifest, facts)?;
    let settings = LifecycleSettings::from(&manifest.spec);
    let plan = build_plan(&settings, &artifacts);
    info!(
        resources = plan.resources().len(),
        edges = plan.edges().len(),
        package_manage = settings.package_manage,
        service_manage = settings.service_manage,
        "Built resource plan"
    );
    Ok(plan)
}
