//! Manifest model: the parsed form of a requirements file.
//!
//! Comments, blank lines, and option directives round-trip verbatim;
//! requirement lines re-render normalized.

pub mod parse;
pub mod resolve;

use anyhow::{bail, Context, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::name::PackageName;
use crate::requirement::Requirement;

/// A line the parser could not read, surfaced by lenient parsing.
#[derive(Debug, Clone)]
pub struct ParseIssue {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// An option line (`-r`, `-c`, or anything else starting with `-`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `-r FILE` / `--requirement FILE`
    Include { path: PathBuf, line: usize },
    /// `-c FILE` / `--constraint FILE`
    Constraint { path: PathBuf, line: usize },
    /// Any other option line, preserved verbatim. pip grows options over
    /// time; failing on them would make manifests age badly.
    Other { raw: String, line: usize },
}

/// One entry of a manifest, in file order.
#[derive(Debug, Clone)]
pub enum Entry {
    Requirement(Requirement),
    /// A full-line comment, text verbatim including the `#`.
    Comment { text: String, line: usize },
    Blank { line: usize },
    Directive(Directive),
}

/// A parsed requirements manifest.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    /// Source path, when loaded from disk.
    pub path: Option<PathBuf>,
    pub entries: Vec<Entry>,
}

impl Manifest {
    /// Strict parse; the first malformed line fails.
    pub fn parse(content: &str) -> Result<Manifest> {
        parse::parse(content)
    }

    /// Lenient parse: malformed lines become [`ParseIssue`]s and are
    /// skipped, so one typo does not hide later findings.
    pub fn parse_lenient(content: &str) -> (Manifest, Vec<ParseIssue>) {
        parse::parse_lenient(content)
    }

    /// Load and strictly parse a manifest file.
    pub fn load(path: &Path) -> Result<Manifest> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        let mut manifest = Manifest::parse(&content)
            .with_context(|| format!("failed to parse manifest {}", path.display()))?;
        manifest.path = Some(path.to_path_buf());
        Ok(manifest)
    }

    /// Load leniently, collecting issues instead of failing.
    pub fn load_lenient(path: &Path) -> Result<(Manifest, Vec<ParseIssue>)> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        let (mut manifest, issues) = Manifest::parse_lenient(&content);
        manifest.path = Some(path.to_path_buf());
        Ok((manifest, issues))
    }

    /// Write the rendered manifest atomically: temp file in the target
    /// directory, then rename over the destination.
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut tmp = match dir {
            Some(dir) => tempfile::NamedTempFile::new_in(dir),
            None => tempfile::NamedTempFile::new_in("."),
        }
        .with_context(|| format!("failed to create temp file next to {}", path.display()))?;
        tmp.write_all(self.render().as_bytes())
            .with_context(|| format!("failed to write manifest {}", path.display()))?;
        tmp.persist(path)
            .with_context(|| format!("failed to replace manifest {}", path.display()))?;
        Ok(())
    }

    /// Canonical re-render. Requirements normalize; everything else
    /// round-trips verbatim.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            match entry {
                Entry::Requirement(req) => out.push_str(&req.to_string()),
                Entry::Comment { text, .. } => out.push_str(text),
                Entry::Blank { .. } => {}
                Entry::Directive(directive) => match directive {
                    Directive::Include { path, .. } => {
                        out.push_str(&format!("-r {}", path.display()))
                    }
                    Directive::Constraint { path, .. } => {
                        out.push_str(&format!("-c {}", path.display()))
                    }
                    Directive::Other { raw, .. } => out.push_str(raw),
                },
            }
            out.push('\n');
        }
        out
    }

    /// All requirement entries, in file order.
    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Requirement(req) => Some(req),
            _ => None,
        })
    }

    /// Find a requirement by canonical name match.
    pub fn find(&self, name: &PackageName) -> Option<&Requirement> {
        self.requirements().find(|req| req.name.matches(name))
    }

    /// Canonical-name groups occurring two or more times.
    pub fn duplicates(&self) -> Vec<(String, Vec<&Requirement>)> {
        let mut groups: BTreeMap<String, Vec<&Requirement>> = BTreeMap::new();
        for req in self.requirements() {
            groups.entry(req.name.canonical()).or_default().push(req);
        }
        groups.retain(|_, reqs| reqs.len() >= 2);
        groups.into_iter().collect()
    }

    /// Append a requirement. Errors if the package is already present
    /// under any equivalent spelling.
    pub fn add(&mut self, req: Requirement) -> Result<()> {
        if let Some(existing) = self.find(&req.name) {
            bail!(
                "package '{}' is already present as '{}' (line {})",
                req.name,
                existing.name,
                existing.line
            );
        }
        self.entries.push(Entry::Requirement(req));
        Ok(())
    }

    /// Remove a requirement by canonical name, returning it.
    pub fn remove(&mut self, name: &PackageName) -> Option<Requirement> {
        let idx = self.entries.iter().position(|entry| {
            matches!(entry, Entry::Requirement(req) if req.name.matches(name))
        })?;
        match self.entries.remove(idx) {
            Entry::Requirement(req) => Some(req),
            _ => unreachable!("position matched a requirement entry"),
        }
    }

    /// Include directives, in file order.
    pub fn includes(&self) -> impl Iterator<Item = (&Path, usize)> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Directive(Directive::Include { path, line }) => Some((path.as_path(), *line)),
            _ => None,
        })
    }

    /// Constraint directives, in file order.
    pub fn constraints(&self) -> impl Iterator<Item = (&Path, usize)> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Directive(Directive::Constraint { path, line }) => {
                Some((path.as_path(), *line))
            }
            _ => None,
        })
    }
}
