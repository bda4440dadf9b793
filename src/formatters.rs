//! Text rendering for command output.
//!
//! Pure functions from domain data to strings, so the command layer
//! stays thin and the layouts are testable without a terminal.

use crate::env::Environment;
use crate::lint::Finding;
use crate::marker::Explanation;
use crate::requirement::Requirement;
use crate::selection::Selection;
use crate::stats::StatsData;
use crate::ui::{self, colors, format};
use crate::version::Version;

/// Aligned table of requirements for `reqmark list`.
pub fn list_table(reqs: &[&Requirement]) -> String {
    if reqs.is_empty() {
        return String::new();
    }

    let name_width = column_width(reqs.iter().map(|r| r.name.as_str().len()), 4);
    let spec_width = column_width(reqs.iter().map(|r| spec_cell(r).len()), 9);

    let mut out = String::new();
    out.push_str(&format!(
        "{}  {}  {}\n",
        colors::heading(&format::pad("NAME", name_width)),
        colors::heading(&format::pad("SPECIFIER", spec_width)),
        colors::heading("MARKER"),
    ));
    for req in reqs {
        let marker = req
            .marker
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_default();
        out.push_str(&format!(
            "{}  {}  {}\n",
            colors::identifier(&format::pad(req.name.as_str(), name_width)),
            format::pad(&spec_cell(req), spec_width),
            colors::secondary(&marker),
        ));
    }
    out
}

fn spec_cell(req: &Requirement) -> String {
    match &req.url {
        Some(url) => format!("@ {}", url),
        None => req.specifiers.to_string(),
    }
}

fn column_width(lengths: impl Iterator<Item = usize>, min: usize) -> usize {
    lengths.fold(min, usize::max)
}

/// Detail view for `reqmark show NAME`.
pub fn show_requirement(req: &Requirement, env: &Environment) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", colors::heading(req.name.as_str())));
    out.push_str(&format!("  canonical: {}\n", req.name.canonical()));
    if !req.extras.is_empty() {
        out.push_str(&format!("  extras:    {}\n", req.extras.join(", ")));
    }
    match &req.url {
        Some(url) => out.push_str(&format!("  url:       {}\n", url)),
        None if !req.specifiers.is_empty() => {
            out.push_str(&format!("  specifier: {}\n", req.specifiers))
        }
        None => out.push_str("  specifier: (any)\n"),
    }
    if let Some(marker) = &req.marker {
        let applies = req.applies_to(env);
        let verdict = if applies {
            colors::success("applies")
        } else {
            colors::error("does not apply")
        };
        out.push_str(&format!("  marker:    {}\n", marker));
        out.push_str(&format!("             {} under {}\n", verdict, env.label()));
    }
    if let Some(comment) = &req.comment {
        out.push_str(&format!("  comment:   {}\n", comment));
    }
    out.push_str(&format!("  line:      {}\n", req.line));
    out
}

/// Lint findings for one file, one line each.
pub fn findings_text(path_label: &str, findings: &[Finding]) -> String {
    let mut out = String::new();
    for finding in findings {
        out.push_str(&format!(
            "{} {}:{} [{}] {}\n",
            ui::severity_icon(finding.severity),
            path_label,
            finding.line,
            finding.code,
            finding.message,
        ));
    }
    out
}

/// Selection report for `reqmark eval`.
pub fn eval_report(selection: &Selection, env: &Environment) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n",
        colors::heading("Environment:"),
        env.label()
    ));
    for req in &selection.included {
        out.push_str(&format!("{} {}\n", ui::included_icon(), req));
    }
    for (req, marker) in &selection.excluded {
        out.push_str(&format!(
            "{} {}  {}\n",
            ui::excluded_icon(),
            colors::secondary(req.name.as_str()),
            colors::secondary(&format!("excluded by: {}", marker)),
        ));
    }
    out.push_str(&format!(
        "{}\n{} included, {} excluded\n",
        format::separator(40),
        selection.included.len(),
        selection.excluded.len(),
    ));
    out
}

/// Verdict tree for `reqmark explain`.
pub fn explanation_tree(explanation: &Explanation) -> String {
    let mut out = String::new();
    render_node(explanation, "", true, true, &mut out);
    out
}

fn render_node(node: &Explanation, prefix: &str, is_last: bool, is_root: bool, out: &mut String) {
    let verdict = if node.verdict {
        colors::success("true")
    } else {
        colors::error("false")
    };
    if is_root {
        out.push_str(&format!("{}  → {}\n", node.text, verdict));
    } else {
        let branch = if is_last { "└─" } else { "├─" };
        out.push_str(&format!(
            "{}{} {}  → {}\n",
            prefix, branch, node.text, verdict
        ));
    }
    let child_prefix = if is_root {
        String::new()
    } else if is_last {
        format!("{}   ", prefix)
    } else {
        format!("{}│  ", prefix)
    };
    for (i, child) in node.children.iter().enumerate() {
        let last = i + 1 == node.children.len();
        render_node(child, &child_prefix, last, false, out);
    }
}

/// Outcome of one `outdated` lookup.
#[derive(Debug)]
pub enum OutdatedStatus {
    UpToDate,
    Behind(Version),
    LookupFailed(String),
}

#[derive(Debug)]
pub struct OutdatedRow {
    pub name: String,
    pub pinned: Version,
    pub status: OutdatedStatus,
}

/// Table for `reqmark outdated`.
pub fn outdated_table(rows: &[OutdatedRow]) -> String {
    if rows.is_empty() {
        return format!("{}\n", colors::success("All pinned packages are current"));
    }

    let name_width = column_width(rows.iter().map(|r| r.name.len()), 4);
    let pin_width = column_width(rows.iter().map(|r| r.pinned.to_string().len()), 6);

    let mut out = String::new();
    out.push_str(&format!(
        "{}  {}  {}\n",
        colors::heading(&format::pad("NAME", name_width)),
        colors::heading(&format::pad("PINNED", pin_width)),
        colors::heading("LATEST"),
    ));
    for row in rows {
        let latest = match &row.status {
            OutdatedStatus::UpToDate => colors::success("current"),
            OutdatedStatus::Behind(latest) => colors::warning(&latest.to_string()),
            OutdatedStatus::LookupFailed(reason) => colors::error(reason),
        };
        out.push_str(&format!(
            "{}  {}  {}\n",
            colors::identifier(&format::pad(&row.name, name_width)),
            format::pad(&row.pinned.to_string(), pin_width),
            latest,
        ));
    }
    out
}

/// Summary block for `reqmark stats`.
pub fn stats_text(data: &StatsData) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", colors::heading("Manifest statistics")));
    out.push_str(&format!("  requirements: {}\n", data.total));
    out.push_str(&format!(
        "  pinned:       {} of {}\n",
        data.pinned, data.total
    ));
    out.push_str(&format!("  with marker:  {}\n", data.marked));
    out.push_str(&format!("  directives:   {}\n", data.directives));
    out.push_str(&format!("  comments:     {}\n", data.comments));
    out.push_str(&format!("{}\n", colors::heading("Selected per platform")));
    for (platform, count) in &data.by_platform {
        out.push_str(&format!("  {:<8} {}\n", platform, count));
    }
    out
}
