//! Command module structure for the reqmark CLI

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

use reqmark::config::Config;
use reqmark::env::Environment;
use reqmark::manifest::resolve;
use reqmark::manifest::Manifest;

use crate::cli::EnvArgs;

pub mod add;
pub mod config;
pub mod eval;
pub mod explain;
pub mod fmt;
pub mod lint;
pub mod list;
pub mod outdated;
pub mod remove;
pub mod show;
pub mod stats;
pub mod util;

/// Resolve the manifest path: explicit flag beats config beats
/// `requirements.txt`.
pub fn manifest_path(config: &Config, override_path: Option<&Path>) -> Result<PathBuf> {
    let path = config.resolve_manifest(override_path);
    if !path.exists() {
        bail!(
            "manifest {} does not exist (set `manifest:` in .reqmark.yaml or pass a path)",
            path.display()
        );
    }
    Ok(path)
}

/// Load the manifest chain (root plus `-r` includes).
pub fn load_chain(path: &Path) -> Result<Vec<Manifest>> {
    resolve::load_with_includes(path)
}

/// Build the target environment from config plus the shared env flags.
///
/// Layering, weakest first: platform preset or detected host, the config
/// `env:` table, the selected profile, `--python`, then `--set` pairs.
pub fn build_environment(config: &Config, args: &EnvArgs) -> Result<Environment> {
    let mut env = match &args.platform {
        Some(platform) => {
            let mut env = Environment::preset(platform)?;
            env.set_python(&config.python_version);
            env
        }
        None => Environment::current(Some(&config.python_version)),
    };

    env.apply_table(&config.env)?;

    if let Some(profile) = &args.profile {
        let Some(table) = config.profiles.get(profile) else {
            bail!(
                "unknown profile '{}' (configured: {})",
                profile,
                config
                    .profiles
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        };
        env.apply_table(table)?;
        env.set_label(&format!("profile {}", profile));
    }

    if let Some(python) = &args.python {
        env.set_python(python);
    }

    env.apply_pairs(&args.set)?;

    if let Some(extra) = &args.extra {
        env.apply("extra", extra)?;
    }

    Ok(env)
}
