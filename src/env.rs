//! Marker environments: the variable values markers evaluate against.
//!
//! The host environment is detected from `std::env::consts` plus `uname`
//! on unix; Python-side fields cannot be detected from here and default to
//! a current CPython, overridable via config, `--python`, and `--set`.

use anyhow::{anyhow, bail, Context, Result};
use std::collections::BTreeMap;
use std::process::Command;

use crate::marker::Variable;

/// Default Python version assumed when none is configured.
pub const DEFAULT_PYTHON_VERSION: &str = "3.12";

/// One string per marker variable. `extra` defaults to empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    values: BTreeMap<&'static str, String>,
    /// Human label for reports ("host", "linux", "profile ci", ...).
    label: String,
}

impl Environment {
    fn from_pairs(label: &str, pairs: &[(&'static str, &str)]) -> Self {
        let mut values: BTreeMap<&'static str, String> = crate::marker::VARIABLE_NAMES
            .iter()
            .map(|name| (*name, String::new()))
            .collect();
        for (key, value) in pairs {
            values.insert(key, value.to_string());
        }
        Environment {
            values,
            label: label.to_string(),
        }
    }

    /// Detect the host environment.
    ///
    /// `python` overrides the assumed Python version (`X.Y` or `X.Y.Z`).
    pub fn current(python: Option<&str>) -> Self {
        let (os_name, sys_platform, platform_system) = match std::env::consts::OS {
            "linux" => ("posix", "linux", "Linux"),
            "macos" => ("posix", "darwin", "Darwin"),
            "windows" => ("nt", "win32", "Windows"),
            other => ("posix", other, other),
        };

        let machine = match std::env::consts::ARCH {
            "x86_64" => "x86_64",
            "aarch64" => "arm64",
            other => other,
        };

        let release = uname_output("-r");
        let version = uname_output("-v");

        let mut env = Self::from_pairs(
            "host",
            &[
                ("os_name", os_name),
                ("sys_platform", sys_platform),
                ("platform_system", platform_system),
                ("platform_machine", machine),
                ("platform_release", &release),
                ("platform_version", &version),
                ("platform_python_implementation", "CPython"),
                ("implementation_name", "cpython"),
            ],
        );
        env.set_python(python.unwrap_or(DEFAULT_PYTHON_VERSION));
        env
    }

    /// A named platform preset (`linux`, `macos`, `windows`) with
    /// realistic values, for `--platform`.
    pub fn preset(name: &str) -> Result<Self> {
        let mut env = match name {
            "linux" => Self::from_pairs(
                "linux",
                &[
                    ("os_name", "posix"),
                    ("sys_platform", "linux"),
                    ("platform_system", "Linux"),
                    ("platform_machine", "x86_64"),
                    ("platform_release", "5.15.0-91-generic"),
                    ("platform_version", "#101-Ubuntu SMP"),
                    ("platform_python_implementation", "CPython"),
                    ("implementation_name", "cpython"),
                ],
            ),
            "macos" => Self::from_pairs(
                "macos",
                &[
                    ("os_name", "posix"),
                    ("sys_platform", "darwin"),
                    ("platform_system", "Darwin"),
                    ("platform_machine", "arm64"),
                    ("platform_release", "23.4.0"),
                    ("platform_version", "Darwin Kernel Version 23.4.0"),
                    ("platform_python_implementation", "CPython"),
                    ("implementation_name", "cpython"),
                ],
            ),
            "windows" => Self::from_pairs(
                "windows",
                &[
                    ("os_name", "nt"),
                    ("sys_platform", "win32"),
                    ("platform_system", "Windows"),
                    ("platform_machine", "AMD64"),
                    ("platform_release", "10"),
                    ("platform_version", "10.0.19045"),
                    ("platform_python_implementation", "CPython"),
                    ("implementation_name", "cpython"),
                ],
            ),
            other => bail!(
                "unknown platform '{}' (expected linux, macos, or windows)",
                other
            ),
        };
        env.set_python(DEFAULT_PYTHON_VERSION);
        Ok(env)
    }

    /// Set the Python-side fields from a `X.Y` or `X.Y.Z` version.
    pub fn set_python(&mut self, version: &str) {
        let full = if version.matches('.').count() >= 2 {
            version.to_string()
        } else {
            format!("{}.0", version)
        };
        let short: String = {
            let parts: Vec<&str> = version.split('.').collect();
            if parts.len() >= 2 {
                format!("{}.{}", parts[0], parts[1])
            } else {
                version.to_string()
            }
        };
        self.values.insert("python_version", short);
        self.values.insert("python_full_version", full.clone());
        self.values.insert("implementation_version", full);
    }

    /// The value of a marker variable (empty string when undetectable).
    pub fn get(&self, var: Variable) -> &str {
        self.values
            .get(var.name())
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    /// The report label ("host", "linux", ...).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Relabel, e.g. "profile ci" after applying a profile table.
    pub fn set_label(&mut self, label: &str) {
        self.label = label.to_string();
    }

    /// Override one variable. Unknown keys are rejected.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let var = Variable::from_name(key).ok_or_else(|| {
            anyhow!(
                "unknown marker variable '{}' (expected one of: {})",
                key,
                crate::marker::VARIABLE_NAMES.join(", ")
            )
        })?;
        if var == Variable::PythonVersion {
            // set_python derives the X.Y short form and keeps
            // python_full_version in step.
            self.set_python(value);
        } else {
            self.values.insert(var.name(), value.to_string());
        }
        Ok(())
    }

    /// Apply repeated `KEY=VALUE` overrides (the `--set` flag).
    pub fn apply_pairs(&mut self, pairs: &[String]) -> Result<()> {
        for pair in pairs {
            let (key, value) = pair
                .split_once('=')
                .with_context(|| format!("invalid --set '{}': expected KEY=VALUE", pair))?;
            self.apply(key.trim(), value.trim())?;
        }
        Ok(())
    }

    /// Apply a config `env:` table (sorted for deterministic errors).
    pub fn apply_table(&mut self, table: &BTreeMap<String, String>) -> Result<()> {
        for (key, value) in table {
            self.apply(key, value)?;
        }
        Ok(())
    }

    /// This environment with `extra` set, for extras-conditional markers.
    pub fn with_extra(&self, extra: &str) -> Environment {
        let mut env = self.clone();
        env.values.insert("extra", extra.to_string());
        env
    }
}

fn uname_output(flag: &str) -> String {
    if !cfg!(unix) {
        return String::new();
    }
    Command::new("uname")
        .arg(flag)
        .output()
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_linux() {
        let env = Environment::preset("linux").unwrap();
        assert_eq!(env.get(Variable::SysPlatform), "linux");
        assert_eq!(env.get(Variable::OsName), "posix");
        assert_eq!(env.get(Variable::PlatformPythonImplementation), "CPython");
        assert_eq!(env.label(), "linux");
    }

    #[test]
    fn test_preset_windows() {
        let env = Environment::preset("windows").unwrap();
        assert_eq!(env.get(Variable::SysPlatform), "win32");
        assert_eq!(env.get(Variable::OsName), "nt");
    }

    #[test]
    fn test_preset_unknown_rejected() {
        assert!(Environment::preset("beos").is_err());
    }

    #[test]
    fn test_python_fields_default() {
        let env = Environment::preset("linux").unwrap();
        assert_eq!(env.get(Variable::PythonVersion), DEFAULT_PYTHON_VERSION);
        assert_eq!(
            env.get(Variable::PythonFullVersion),
            format!("{}.0", DEFAULT_PYTHON_VERSION)
        );
    }

    #[test]
    fn test_set_python_short_and_full() {
        let mut env = Environment::preset("linux").unwrap();
        env.set_python("3.9.18");
        assert_eq!(env.get(Variable::PythonVersion), "3.9");
        assert_eq!(env.get(Variable::PythonFullVersion), "3.9.18");
    }

    #[test]
    fn test_apply_python_version_normalizes_to_short_form() {
        let mut env = Environment::preset("linux").unwrap();
        env.apply("python_version", "3.10.1").unwrap();
        assert_eq!(env.get(Variable::PythonVersion), "3.10");
        assert_eq!(env.get(Variable::PythonFullVersion), "3.10.1");
    }

    #[test]
    fn test_apply_rejects_unknown_key() {
        let mut env = Environment::preset("linux").unwrap();
        let err = env.apply("platform_flavor", "x").unwrap_err();
        assert!(err.to_string().contains("platform_flavor"));
    }

    #[test]
    fn test_apply_pairs() {
        let mut env = Environment::preset("linux").unwrap();
        env.apply_pairs(&[
            "platform_release=6.1.0-generic".to_string(),
            "python_version=3.8".to_string(),
        ])
        .unwrap();
        assert_eq!(env.get(Variable::PlatformRelease), "6.1.0-generic");
        assert_eq!(env.get(Variable::PythonVersion), "3.8");
    }

    #[test]
    fn test_apply_pairs_rejects_bad_shape() {
        let mut env = Environment::preset("linux").unwrap();
        assert!(env.apply_pairs(&["no-equals-sign".to_string()]).is_err());
    }

    #[test]
    fn test_extra_default_and_override() {
        let env = Environment::preset("linux").unwrap();
        assert_eq!(env.get(Variable::Extra), "");
        assert_eq!(env.with_extra("dev").get(Variable::Extra), "dev");
    }

    #[test]
    fn test_current_has_platform_fields() {
        let env = Environment::current(None);
        assert!(!env.get(Variable::SysPlatform).is_empty());
        assert!(!env.get(Variable::PlatformSystem).is_empty());
        assert_eq!(env.label(), "host");
    }
}
