// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Manifest Types - the Parameter Surface
//
// Defines the YAML input for one managed host:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - Package and service management toggles
// - Untyped main daemon options (typed against the daemon catalog on load)
// - Access stanzas, one entry per block, options flattened beside title/order

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

use super::access::{AccessBlock, Order};
use super::assembler::{managed_header, FragmentAssembler, DEFAULT_MANAGED_BY};
use super::error::ConfigError;
use super::main_config::MainConfig;
use super::option::RawValue;

pub const API_VERSION: &str = "fwknop-manager/v1";
pub const KIND: &str = "FwknopConfig";

/// Environment variable naming an explicit manifest path
pub const CONFIG_PATH_ENV: &str = "FWKNOP_MANAGER_CONFIG";
pub const PACKAGE_MANAGE_ENV: &str = "FWKNOP_PACKAGE_MANAGE";
pub const SERVICE_MANAGE_ENV: &str = "FWKNOP_SERVICE_MANAGE";

/// Top-level Kubernetes-style manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FwknopManifest {
    /// API version (must be "fwknop-manager/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "FwknopConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    #[serde(default)]
    pub spec: FwknopSpec,
}

/// Manifest metadata (Kubernetes-style)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Host name the manifest describes
    pub name: String,

    /// Optional: Labels for categorization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
}

/// Desired state (content under spec:)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FwknopSpec {
    /// Install the daemon package before writing configuration
    #[serde(default = "default_true")]
    pub package_manage: bool,

    /// Keep the daemon running and restart it on config changes
    #[serde(default = "default_true")]
    pub service_manage: bool,

    #[serde(default = "default_package_name")]
    pub package_name: String,

    #[serde(default = "default_service_name")]
    pub service_name: String,

    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// Tool named in the `# Managed by ...` header of both files
    #[serde(default = "default_managed_by")]
    pub managed_by: String,

    /// `fwknopd.conf` options keyed by option name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub main: BTreeMap<String, RawValue>,

    /// `access.conf` stanzas
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub access: Vec<AccessDeclaration>,
}

/// One access stanza as written in the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessDeclaration {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,

    /// Every other key is an access option
    #[serde(flatten)]
    pub options: BTreeMap<String, RawValue>,
}

impl AccessDeclaration {
    pub fn to_block(&self) -> Result<AccessBlock, ConfigError> {
        AccessBlock::from_raw(
            self.title.clone(),
            self.order.clone().unwrap_or_default(),
            &self.options,
        )
    }
}

fn default_true() -> bool {
    true
}

fn default_package_name() -> String {
    "fwknop-server".to_string()
}

fn default_service_name() -> String {
    "fwknop-server".to_string()
}

fn default_config_dir() -> PathBuf {
    PathBuf::from("/etc/fwknop")
}

fn default_managed_by() -> String {
    DEFAULT_MANAGED_BY.to_string()
}

impl Default for FwknopSpec {
    fn default() -> Self {
        Self {
            package_manage: true,
            service_manage: true,
            package_name: default_package_name(),
            service_name: default_service_name(),
            config_dir: default_config_dir(),
            managed_by: default_managed_by(),
            main: BTreeMap::new(),
            access: Vec::new(),
        }
    }
}

impl Default for FwknopManifest {
    fn default() -> Self {
        let hostname = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "fwknop-host".to_string());

        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: hostname,
                labels: None,
            },
            spec: FwknopSpec::default(),
        }
    }
}

fn parse_toggle(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl FwknopManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {:?}", path))?;
        Self::from_yaml_str(&content).with_context(|| format!("Failed to parse manifest {:?}", path))
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Discover configuration file using precedence order
    /// 1. FWKNOP_MANAGER_CONFIG environment variable
    /// 2. ./fwknop-manager.yaml (working directory)
    /// 3. ~/.config/fwknop-manager/config.yaml (user home)
    /// 4. /etc/fwknop-manager/config.yaml (system)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./fwknop-manager.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home
                .join(".config")
                .join("fwknop-manager")
                .join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        let system_config = PathBuf::from("/etc/fwknop-manager/config.yaml");
        if system_config.exists() {
            return Some(system_config);
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path (fail if missing/invalid)
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path)?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::warn!("No configuration file found in standard locations. Using empty defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to the management toggles
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply toggle overrides from an arbitrary variable source.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let toggles: [(&str, &mut bool); 2] = [
            (PACKAGE_MANAGE_ENV, &mut self.spec.package_manage),
            (SERVICE_MANAGE_ENV, &mut self.spec.service_manage),
        ];

        for (name, target) in toggles {
            let Some(val) = lookup(name) else {
                continue;
            };
            match parse_toggle(&val) {
                Some(enabled) => {
                    tracing::info!("Environment override: {}={}", name, enabled);
                    *target = enabled;
                }
                None => {
                    tracing::warn!(
                        "Invalid value for {}: '{}'. Expected true/false. Ignoring.",
                        name,
                        val
                    );
                }
            }
        }
    }

    /// Validate the manifest, including every option and access block.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_version != API_VERSION {
            return Err(ConfigError::InvalidManifest(format!(
                "apiVersion '{}' must be '{}'",
                self.api_version, API_VERSION
            )));
        }

        if self.kind != KIND {
            return Err(ConfigError::InvalidManifest(format!(
                "kind '{}' must be '{}'",
                self.kind, KIND
            )));
        }

        if self.metadata.name.is_empty() {
            return Err(ConfigError::InvalidManifest(
                "metadata.name cannot be empty".to_string(),
            ));
        }

        if self.spec.package_manage && self.spec.package_name.is_empty() {
            return Err(ConfigError::InvalidManifest(
                "spec.package_name cannot be empty when package_manage is set".to_string(),
            ));
        }

        if self.spec.service_manage && self.spec.service_name.is_empty() {
            return Err(ConfigError::InvalidManifest(
                "spec.service_name cannot be empty when service_manage is set".to_string(),
            ));
        }

        if !self.spec.config_dir.is_absolute() {
            return Err(ConfigError::InvalidManifest(format!(
                "spec.config_dir {:?} must be an absolute path",
                self.spec.config_dir
            )));
        }

        self.main_config()?;
        self.assembler()?;
        Ok(())
    }

    /// Typed main configuration.
    pub fn main_config(&self) -> Result<MainConfig, ConfigError> {
        MainConfig::from_raw(&self.spec.main)
    }

    /// Every access stanza, validated and rendered, in manifest order.
    pub fn access_blocks(&self) -> Result<Vec<AccessBlock>, ConfigError> {
        self.spec.access.iter().map(AccessDeclaration::to_block).collect()
    }

    /// Assembler holding every access stanza. Fails on duplicate titles.
    pub fn assembler(&self) -> Result<FragmentAssembler, ConfigError> {
        let mut assembler = FragmentAssembler::new(self.header());
        for block in self.access_blocks()? {
            assembler.declare(block)?;
        }
        Ok(assembler)
    }

    pub fn header(&self) -> String {
        managed_header(&self.spec.managed_by)
    }

    pub fn main_config_path(&self) -> PathBuf {
        self.spec.config_dir.join("fwknopd.conf")
    }

    pub fn access_config_path(&self) -> PathBuf {
        self.spec.config_dir.join("access.conf")
    }
}
