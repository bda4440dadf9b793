//! Configuration for reqmark.
//!
//! Two YAML files merge: the global `~/.config/reqmark/config.yaml`
//! under the project-local `./.reqmark.yaml`. Project values win per
//! field; the `env` table merges key-wise with project keys winning.

pub mod validation;

pub use validation::validate;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::env::DEFAULT_PYTHON_VERSION;
use crate::index::DEFAULT_INDEX_URL;

/// Project config file name, looked up in the working directory.
pub const PROJECT_CONFIG: &str = ".reqmark.yaml";

#[derive(Debug, Clone)]
pub struct Config {
    /// Default manifest path for commands that take none.
    pub manifest: PathBuf,
    /// Python version assumed for marker evaluation.
    pub python_version: String,
    /// Package index endpoint for `outdated`.
    pub index_url: String,
    /// Marker-variable overrides applied to every environment.
    pub env: BTreeMap<String, String>,
    /// Named override tables selectable with `--profile`.
    pub profiles: BTreeMap<String, BTreeMap<String, String>>,
    pub lint: LintConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LintConfig {
    #[serde(default = "default_true")]
    pub require_pins: bool,
    #[serde(default = "default_true")]
    pub canonical_names: bool,
}

impl Default for LintConfig {
    fn default() -> Self {
        LintConfig {
            require_pins: true,
            canonical_names: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Config {
            manifest: PathBuf::from("requirements.txt"),
            python_version: DEFAULT_PYTHON_VERSION.to_string(),
            index_url: DEFAULT_INDEX_URL.to_string(),
            env: BTreeMap::new(),
            profiles: BTreeMap::new(),
            lint: LintConfig::default(),
        }
    }
}

impl Config {
    /// Load the merged configuration: global under project, both
    /// optional.
    pub fn load() -> Result<Self> {
        Self::load_merged_from(global_config_path().as_deref(), Path::new(PROJECT_CONFIG))
    }

    /// Merge the configs at the given paths; either may be absent.
    pub fn load_merged_from(global: Option<&Path>, project: &Path) -> Result<Self> {
        let global_config = global
            .filter(|p| p.exists())
            .map(PartialConfig::load_from)
            .transpose()?
            .unwrap_or_default();

        let project_config = if project.exists() {
            PartialConfig::load_from(project)?
        } else {
            PartialConfig::default()
        };

        Ok(global_config.merge_with(project_config))
    }

    /// Resolve a user-supplied or configured manifest path, expanding a
    /// leading tilde.
    pub fn resolve_manifest(&self, override_path: Option<&Path>) -> PathBuf {
        let raw = override_path.unwrap_or(&self.manifest);
        PathBuf::from(shellexpand::tilde(&raw.to_string_lossy()).to_string())
    }
}

/// Path of the global config file, `~/.config/reqmark/config.yaml`.
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config/reqmark/config.yaml"))
}

/// All fields optional, for merging.
#[derive(Debug, Deserialize, Default)]
struct PartialConfig {
    pub manifest: Option<PathBuf>,
    pub python_version: Option<String>,
    pub index_url: Option<String>,
    pub env: Option<BTreeMap<String, String>>,
    pub profiles: Option<BTreeMap<String, BTreeMap<String, String>>>,
    pub lint: Option<PartialLintConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct PartialLintConfig {
    pub require_pins: Option<bool>,
    pub canonical_names: Option<bool>,
}

impl PartialConfig {
    fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Merge this (global) config with a project config; project values
    /// take precedence.
    fn merge_with(self, project: PartialConfig) -> Config {
        let global_lint = self.lint.unwrap_or_default();
        let project_lint = project.lint.unwrap_or_default();

        // env tables merge key-wise, project key wins.
        let mut env = self.env.unwrap_or_default();
        env.extend(project.env.unwrap_or_default());

        // Profiles replace whole tables rather than merging entries; a
        // project profile fully redefines its environment.
        let mut profiles = self.profiles.unwrap_or_default();
        profiles.extend(project.profiles.unwrap_or_default());

        Config {
            manifest: project
                .manifest
                .or(self.manifest)
                .unwrap_or_else(|| PathBuf::from("requirements.txt")),
            python_version: project
                .python_version
                .or(self.python_version)
                .unwrap_or_else(|| DEFAULT_PYTHON_VERSION.to_string()),
            index_url: project
                .index_url
                .or(self.index_url)
                .unwrap_or_else(|| DEFAULT_INDEX_URL.to_string()),
            env,
            profiles,
            lint: LintConfig {
                require_pins: project_lint
                    .require_pins
                    .or(global_lint.require_pins)
                    .unwrap_or(true),
                canonical_names: project_lint
                    .canonical_names
                    .or(global_lint.canonical_names)
                    .unwrap_or(true),
            },
        }
    }
}
