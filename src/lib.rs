//! # Reqmark - Dependency Manifest Toolkit
//!
//! Reqmark parses, checks, and evaluates pinned Python-style dependency
//! manifests (`requirements.txt` and friends) without touching a Python
//! interpreter.
//!
//! ## Overview
//!
//! A manifest is a line-oriented text file of requirements: a package
//! name, optional extras, version specifiers, an optional environment
//! marker, and an optional trailing comment. Reqmark preserves the file
//! layout on edits, lints for duplicates and conflicts, and evaluates
//! markers against real or simulated target environments.
//!
//! ## Modules
//!
//! - [`manifest`] - Manifest parsing, editing, and layout-preserving saves
//! - [`requirement`] - Single requirement lines (PEP 508 shaped)
//! - [`version`] / [`specifier`] - PEP 440 versions and specifier sets
//! - [`marker`] - Environment marker expressions and evaluation
//! - [`env`] - Target environments: current machine, presets, overrides
//! - [`selection`] - Marker-driven selection and freeze output
//! - [`lint`] - Duplicate/conflict/pin checks
//! - [`index`] - Package index client for `outdated`
//! - [`config`] - Layered YAML configuration
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use reqmark::env::Environment;
//! use reqmark::manifest::Manifest;
//! use reqmark::selection::select;
//!
//! let manifest = Manifest::load(Path::new("requirements.txt"))
//!     .expect("failed to load manifest");
//! let env = Environment::preset("linux").expect("built-in preset");
//! let reqs: Vec<_> = manifest.requirements().collect();
//! let selection = select(&reqs, &env);
//! for req in &selection.included {
//!     println!("{}", req);
//! }
//! ```

pub mod config;
pub mod env;
pub mod formatters;
pub mod index;
pub mod lint;
pub mod manifest;
pub mod marker;
pub mod name;
pub mod requirement;
pub mod selection;
pub mod specifier;
pub mod stats;
pub mod ui;
pub mod version;

/// Generate a UTC timestamp in ISO 8601 format: `YYYY-MM-DDTHH:MM:SSZ`
///
/// This function uses `chrono::Utc::now()` to ensure the timestamp is truly in UTC,
/// not local time with a misleading `Z` suffix.
pub fn utc_now_iso() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
