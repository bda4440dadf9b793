//! Manifest lint checks.
//!
//! Pure checks over one manifest plus helpers for parse issues and
//! constraint cross-checks. The command layer adds include resolution,
//! glob expansion, and output formatting.

use serde::Serialize;

use crate::manifest::{Manifest, ParseIssue};
use crate::requirement::Requirement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One lint finding. `code` is a short stable string suitable for
/// filtering and JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub line: usize,
    pub code: &'static str,
    pub message: String,
}

impl Finding {
    fn error(line: usize, code: &'static str, message: String) -> Self {
        Finding {
            severity: Severity::Error,
            line,
            code,
            message,
        }
    }

    fn warning(line: usize, code: &'static str, message: String) -> Self {
        Finding {
            severity: Severity::Warning,
            line,
            code,
            message,
        }
    }
}

/// Which optional checks run.
#[derive(Debug, Clone, Copy)]
pub struct LintOptions {
    /// Warn on requirements without an exact pin.
    pub require_pins: bool,
    /// Warn when a spelled name differs from its canonical form.
    pub canonical_names: bool,
}

impl Default for LintOptions {
    fn default() -> Self {
        LintOptions {
            require_pins: true,
            canonical_names: true,
        }
    }
}

/// Run the per-manifest checks: duplicates, contradictory specifier
/// sets, unpinned requirements, non-canonical spellings.
pub fn lint_manifest(manifest: &Manifest, options: &LintOptions) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (canonical, reqs) in manifest.duplicates() {
        // The first occurrence stands; each later one is the defect.
        for req in &reqs[1..] {
            findings.push(Finding::error(
                req.line,
                "duplicate",
                format!(
                    "'{}' duplicates '{}' (line {})",
                    req.name, canonical, reqs[0].line
                ),
            ));
        }
    }

    for req in manifest.requirements() {
        if req.specifiers.is_contradictory() {
            findings.push(Finding::error(
                req.line,
                "conflict",
                format!(
                    "'{}' has contradictory specifiers: {}",
                    req.name, req.specifiers
                ),
            ));
        }

        if options.require_pins && req.url.is_none() && !req.is_pinned() {
            findings.push(Finding::warning(
                req.line,
                "unpinned",
                format!("'{}' has no exact version pin", req.name),
            ));
        }

        if options.canonical_names && !req.name.is_canonical() {
            findings.push(Finding::warning(
                req.line,
                "non-canonical",
                format!(
                    "'{}' is spelled non-canonically (canonical: {})",
                    req.name,
                    req.name.canonical()
                ),
            ));
        }
    }

    findings.sort_by_key(|f| f.line);
    findings
}

/// Turn lenient-parse issues into `syntax` errors.
pub fn findings_from_issues(issues: &[ParseIssue]) -> Vec<Finding> {
    issues
        .iter()
        .map(|issue| Finding::error(issue.line, "syntax", issue.message.clone()))
        .collect()
}

/// Cross-check pinned requirements against loaded constraint files: a
/// pin a constraint excludes is an error.
pub fn lint_against_constraints(
    reqs: &[&Requirement],
    constraints: &[&Requirement],
) -> Vec<Finding> {
    let mut findings = Vec::new();
    for req in reqs {
        let Some(pin) = req.specifiers.exact_pin() else {
            continue;
        };
        for constraint in constraints {
            if !constraint.name.matches(&req.name) {
                continue;
            }
            if !constraint.specifiers.matches(pin) {
                findings.push(Finding::error(
                    req.line,
                    "constraint-conflict",
                    format!(
                        "'{}=={}' violates constraint '{}{}'",
                        req.name, pin, constraint.name, constraint.specifiers
                    ),
                ));
            }
        }
    }
    findings
}

/// An unresolvable `-r`/`-c` target, reported by the command layer.
pub fn missing_include_finding(line: usize, target: &str, detail: &str) -> Finding {
    Finding::error(
        line,
        "missing-include",
        format!("cannot resolve '{}': {}", target, detail),
    )
}

/// Whether any finding is an error (drives the exit code).
pub fn has_errors(findings: &[Finding]) -> bool {
    findings.iter().any(|f| f.severity == Severity::Error)
}
