// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Resource plan
//!
//! The Lifecycle Orchestrator's output: a set of desired host resources and
//! the ordering edges between them. A plan is pure data; nothing here
//! touches the host. See `application::reconciler` for the executor.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Desired-state graph with deterministic topological order

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::PathBuf;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::error::{ConfigError, Result};

/// Stable identifier such as `File[/etc/fwknop/access.conf]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn package(name: &str) -> Self {
        Self(format!("Package[{}]", name))
    }

    pub fn directory(path: &std::path::Path) -> Self {
        Self(format!("Directory[{}]", path.display()))
    }

    pub fn file(path: &std::path::Path) -> Self {
        Self(format!("File[{}]", path.display()))
    }

    pub fn service(name: &str) -> Self {
        Self(format!("Service[{}]", name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Octal file mode, serialized as e.g. `"0600"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMode(pub u32);

impl FileMode {
    pub const OWNER_READ_WRITE: FileMode = FileMode(0o600);
    pub const DIRECTORY: FileMode = FileMode(0o755);
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04o}", self.0)
    }
}

impl Serialize for FileMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Desired state of a managed file.
#[derive(Clone, PartialEq, Eq)]
pub struct FileSpec {
    pub path: PathBuf,
    pub owner: String,
    pub group: String,
    pub mode: FileMode,
    pub content: String,
    /// Content embeds secrets and must never be shown in plans or diffs
    pub sensitive: bool,
}

impl Serialize for FileSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FileSpec", 6)?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("owner", &self.owner)?;
        state.serialize_field("group", &self.group)?;
        state.serialize_field("mode", &self.mode)?;
        state.serialize_field("content", self.display_content())?;
        state.serialize_field("sensitive", &self.sensitive)?;
        state.end()
    }
}

impl FileSpec {
    /// Content safe to print: the real text, or a marker for sensitive files.
    pub fn display_content(&self) -> &str {
        if self.sensitive {
            "[REDACTED]"
        } else {
            &self.content
        }
    }
}

impl fmt::Debug for FileSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSpec")
            .field("path", &self.path)
            .field("owner", &self.owner)
            .field("group", &self.group)
            .field("mode", &self.mode)
            .field("content", &self.display_content())
            .field("sensitive", &self.sensitive)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Resource {
    Package {
        name: String,
    },
    Directory {
        path: PathBuf,
        owner: String,
        group: String,
        mode: FileMode,
    },
    File(FileSpec),
    Service {
        name: String,
        running: bool,
        enabled: bool,
    },
}

impl Resource {
    pub fn id(&self) -> ResourceId {
        match self {
            Self::Package { name } => ResourceId::package(name),
            Self::Directory { path, .. } => ResourceId::directory(path),
            Self::File(spec) => ResourceId::file(&spec.path),
            Self::Service { name, .. } => ResourceId::service(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// `to` must be applied after `from`
    Requires,
    /// Like `Requires`, and a change to `from` schedules a restart of `to`
    Notifies,
}

/// Ordering edge `from -> to`: `from` is applied first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: ResourceId,
    pub to: ResourceId,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResourcePlan {
    resources: Vec<Resource>,
    edges: Vec<Edge>,
}

impl ResourcePlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, resource: Resource) -> ResourceId {
        let id = resource.id();
        self.resources.push(resource);
        id
    }

    /// `dependent` is applied after `dependency`.
    pub fn require(&mut self, dependent: &ResourceId, dependency: &ResourceId) {
        self.edges.push(Edge {
            from: dependency.clone(),
            to: dependent.clone(),
            kind: EdgeKind::Requires,
        });
    }

    /// `subscriber` is applied after `source` and restarted when `source` changes.
    pub fn notify(&mut self, source: &ResourceId, subscriber: &ResourceId) {
        self.edges.push(Edge {
            from: source.clone(),
            to: subscriber.clone(),
            kind: EdgeKind::Notifies,
        });
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn get(&self, id: &ResourceId) -> Option<&Resource> {
        self.resources.iter().find(|r| &r.id() == id)
    }

    pub fn contains(&self, id: &ResourceId) -> bool {
        self.get(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Resources that `source` notifies.
    pub fn notifies_of<'a>(&'a self, source: &'a ResourceId) -> impl Iterator<Item = &'a ResourceId> {
        self.edges
            .iter()
            .filter(move |e| e.kind == EdgeKind::Notifies && &e.from == source)
            .map(|e| &e.to)
    }

    /// Topological order of the plan.
    ///
    /// Among resources whose dependencies are satisfied, the one declared
    /// first goes first, so the order is deterministic. Edges naming a
    /// resource that is not in the plan are ignored.
    pub fn ordered(&self) -> Result<Vec<&Resource>> {
        let index: HashMap<ResourceId, usize> = self
            .resources
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id(), i))
            .collect();

        let mut in_degree = vec![0usize; self.resources.len()];
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); self.resources.len()];
        for edge in &self.edges {
            if let (Some(&from), Some(&to)) = (index.get(&edge.from), index.get(&edge.to)) {
                successors[from].push(to);
                in_degree[to] += 1;
            }
        }

        // Smallest declaration index pops first.
        let mut ready: BTreeSet<usize> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, d)| **d == 0)
            .map(|(i, _)| i)
            .collect();

        let mut order = Vec::with_capacity(self.resources.len());
        while let Some(next) = ready.pop_first() {
            order.push(&self.resources[next]);
            for &succ in &successors[next] {
                in_degree[succ] -= 1;
                if in_degree[succ] == 0 {
                    ready.insert(succ);
                }
            }
        }

        if order.len() != self.resources.len() {
            let stuck = in_degree
                .iter()
                .position(|d| *d > 0)
                .map(|i| self.resources[i].id().to_string())
                .unwrap_or_default();
            return Err(ConfigError::DependencyCycle(stuck));
        }

        Ok(order)
    }
}
