//! Manifest line parsing.
//!
//! Splits content into logical lines (joining backslash continuations),
//! classifies each as blank / comment / directive / requirement, and
//! builds the [`Manifest`] model.

use anyhow::{anyhow, Result};
use std::path::PathBuf;

use super::{Directive, Entry, Manifest, ParseIssue};
use crate::requirement::Requirement;

/// Strict parse: the first malformed line aborts with `line N:` context.
pub fn parse(content: &str) -> Result<Manifest> {
    let (manifest, issues) = parse_lenient(content);
    if let Some(issue) = issues.first() {
        return Err(anyhow!("{}", issue));
    }
    Ok(manifest)
}

/// Lenient parse: malformed lines become issues and are skipped.
pub fn parse_lenient(content: &str) -> (Manifest, Vec<ParseIssue>) {
    let mut entries = Vec::new();
    let mut issues = Vec::new();

    for (text, line) in logical_lines(content) {
        let trimmed = text.trim();

        if trimmed.is_empty() {
            entries.push(Entry::Blank { line });
            continue;
        }

        if trimmed.starts_with('#') {
            entries.push(Entry::Comment {
                text: text.trim_end().to_string(),
                line,
            });
            continue;
        }

        if trimmed.starts_with('-') {
            match parse_directive(trimmed, line) {
                Ok(directive) => entries.push(Entry::Directive(directive)),
                Err(e) => issues.push(ParseIssue {
                    line,
                    message: e.to_string(),
                }),
            }
            continue;
        }

        match Requirement::parse(trimmed, line) {
            Ok(req) => entries.push(Entry::Requirement(req)),
            Err(e) => issues.push(ParseIssue {
                line,
                // Requirement errors already carry their own "line N:"
                // prefix; strip it rather than doubling up.
                message: strip_line_prefix(&e.to_string(), line),
            }),
        }
    }

    (
        Manifest {
            path: None,
            entries,
        },
        issues,
    )
}

/// Join backslash continuations into logical lines. The joined statement
/// keeps the first line's number.
fn logical_lines(content: &str) -> Vec<(String, usize)> {
    let mut out = Vec::new();
    let mut pending: Option<(String, usize)> = None;

    for (idx, raw) in content.lines().enumerate() {
        let lineno = idx + 1;
        let (fragment, continues) = match raw.trim_end().strip_suffix('\\') {
            Some(stripped) => (stripped, true),
            None => (raw, false),
        };

        match pending.take() {
            Some((mut text, first)) => {
                text.push(' ');
                text.push_str(fragment.trim_start());
                if continues {
                    pending = Some((text, first));
                } else {
                    out.push((text, first));
                }
            }
            None => {
                if continues {
                    pending = Some((fragment.to_string(), lineno));
                } else {
                    out.push((raw.to_string(), lineno));
                }
            }
        }
    }

    // A trailing backslash on the last line: take what we have.
    if let Some(entry) = pending {
        out.push(entry);
    }

    out
}

fn parse_directive(trimmed: &str, line: usize) -> Result<Directive> {
    let (option, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((option, rest)) => (option, rest.trim()),
        None => (trimmed, ""),
    };

    match option {
        "-r" | "--requirement" => {
            if rest.is_empty() {
                return Err(anyhow!("{} requires a file argument", option));
            }
            Ok(Directive::Include {
                path: PathBuf::from(rest),
                line,
            })
        }
        "-c" | "--constraint" => {
            if rest.is_empty() {
                return Err(anyhow!("{} requires a file argument", option));
            }
            Ok(Directive::Constraint {
                path: PathBuf::from(rest),
                line,
            })
        }
        _ => Ok(Directive::Other {
            raw: trimmed.to_string(),
            line,
        }),
    }
}

fn strip_line_prefix(message: &str, line: usize) -> String {
    let prefix = format!("line {}: ", line);
    match message.strip_prefix(&prefix) {
        Some(rest) => rest.to_string(),
        None => message.to_string(),
    }
}
