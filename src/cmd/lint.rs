//! `reqmark lint` - check manifests for defects.
//!
//! Accepts explicit paths or glob patterns; with none, lints the
//! configured manifest. Exit code 1 is driven by the caller when any
//! error-severity finding exists.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use reqmark::config::Config;
use reqmark::formatters;
use reqmark::lint::{self, Finding, LintOptions, Severity};
use reqmark::manifest::{resolve, Manifest};
use reqmark::ui::{self, colors};

pub fn cmd_lint(patterns: &[String], format: &str, no_includes: bool) -> Result<bool> {
    if format != "text" && format != "json" {
        bail!("unknown format '{}' (expected text or json)", format);
    }

    let config = Config::load()?;
    let options = LintOptions {
        require_pins: config.lint.require_pins,
        canonical_names: config.lint.canonical_names,
    };

    let files = if patterns.is_empty() {
        vec![super::manifest_path(&config, None)?]
    } else {
        expand_patterns(patterns)?
    };

    let mut reports = Vec::new();
    for file in &files {
        let findings = lint_file(file, &options, no_includes)?;
        reports.push((file.clone(), findings));
    }

    let clean = !reports.iter().any(|(_, f)| lint::has_errors(f));

    if format == "json" {
        let items: Vec<serde_json::Value> = reports
            .iter()
            .map(|(file, findings)| {
                serde_json::json!({
                    "file": file.display().to_string(),
                    "findings": findings,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(clean);
    }

    let mut errors = 0;
    let mut warnings = 0;
    for (file, findings) in &reports {
        print!(
            "{}",
            formatters::findings_text(&file.display().to_string(), findings)
        );
        errors += findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count();
        warnings += findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count();
    }

    if !ui::is_quiet() {
        if errors == 0 && warnings == 0 {
            println!(
                "{} {} manifest(s) clean",
                colors::success("✓"),
                reports.len()
            );
        } else {
            println!("{} error(s), {} warning(s)", errors, warnings);
        }
    }

    Ok(clean)
}

/// Expand glob patterns, keeping order and deduplicating.
fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let mut matched = false;
        for entry in
            glob::glob(pattern).with_context(|| format!("invalid glob pattern '{}'", pattern))?
        {
            let path = entry.with_context(|| format!("failed to expand '{}'", pattern))?;
            if !files.contains(&path) {
                files.push(path);
            }
            matched = true;
        }
        if !matched {
            bail!("no manifests match '{}'", pattern);
        }
    }
    Ok(files)
}

fn lint_file(path: &Path, options: &LintOptions, no_includes: bool) -> Result<Vec<Finding>> {
    let (manifest, issues) = Manifest::load_lenient(path)?;

    let mut findings = lint::findings_from_issues(&issues);
    findings.extend(lint::lint_manifest(&manifest, options));

    if no_includes {
        findings.sort_by_key(|f| f.line);
        return Ok(findings);
    }

    let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let mut includes_ok = true;
    for (target, line) in manifest.includes() {
        if !base.join(target).exists() {
            findings.push(lint::missing_include_finding(
                line,
                &target.display().to_string(),
                "file does not exist",
            ));
            includes_ok = false;
        }
    }
    for (target, line) in manifest.constraints() {
        if !base.join(target).exists() {
            findings.push(lint::missing_include_finding(
                line,
                &target.display().to_string(),
                "file does not exist",
            ));
            includes_ok = false;
        }
    }

    // Constraint cross-check needs the full chain; skip it when the file
    // has syntax errors or unresolvable directives.
    if includes_ok && issues.is_empty() {
        if let Ok(chain) = resolve::load_with_includes(path) {
            let constraints = resolve::load_constraints(&chain)?;
            if !constraints.is_empty() {
                let reqs = resolve::all_requirements(&chain);
                let constraint_reqs = resolve::all_requirements(&constraints);
                findings.extend(lint::lint_against_constraints(&reqs, &constraint_reqs));
            }
        }
    }

    findings.sort_by_key(|f| f.line);
    Ok(findings)
}
