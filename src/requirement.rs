//! Requirement lines: one logical dependency.
//!
//! A line is `name[extras]specifiers ; marker  # comment`, or a direct
//! URL reference `name @ https://...`. URL references and version
//! specifiers are mutually exclusive.

use anyhow::{anyhow, bail, Context, Result};
use std::fmt::{self, Display, Formatter};
use url::Url;

use crate::env::Environment;
use crate::marker::Marker;
use crate::name::PackageName;
use crate::specifier::SpecifierSet;

#[derive(Debug, Clone)]
pub struct Requirement {
    pub name: PackageName,
    pub extras: Vec<String>,
    pub specifiers: SpecifierSet,
    /// Direct reference target (`name @ url`).
    pub url: Option<Url>,
    pub marker: Option<Marker>,
    /// Trailing comment text, without the leading `#`.
    pub comment: Option<String>,
    /// 1-based source line. Zero for requirements built in memory.
    pub line: usize,
}

impl Requirement {
    /// Parse one logical requirement line. The trailing comment and
    /// marker must already be on this line (continuations are joined by
    /// the manifest parser).
    pub fn parse(input: &str, lineno: usize) -> Result<Self> {
        let (body, comment) = split_comment(input);
        let body = body.trim();
        if body.is_empty() {
            bail!("line {}: empty requirement", lineno);
        }

        let (body, marker_text) = split_marker(body);
        let marker = match marker_text {
            Some(text) => Some(
                Marker::parse(text).with_context(|| format!("line {}: invalid marker", lineno))?,
            ),
            None => None,
        };

        let body = body.trim();

        // Direct URL reference: `name[extras] @ url`.
        if let Some((name_part, url_part)) = split_direct_reference(body) {
            let (name, extras) = parse_name_and_extras(name_part, lineno)?;
            let url = Url::parse(url_part.trim())
                .with_context(|| format!("line {}: invalid requirement URL", lineno))?;
            return Ok(Requirement {
                name,
                extras,
                specifiers: SpecifierSet::default(),
                url: Some(url),
                marker,
                comment,
                line: lineno,
            });
        }

        // Name ends where the first specifier operator or extras bracket
        // begins.
        let name_end = body
            .find(|c| matches!(c, '<' | '>' | '=' | '!' | '~' | '[' | ' '))
            .unwrap_or(body.len());
        let (name_part, rest) = body.split_at(name_end);
        let name = PackageName::parse(name_part.trim())
            .map_err(|e| anyhow!("line {}: {}", lineno, e))?;

        let rest = rest.trim_start();
        let (extras, spec_text) = if let Some(after_bracket) = rest.strip_prefix('[') {
            let close = after_bracket
                .find(']')
                .ok_or_else(|| anyhow!("line {}: unclosed extras bracket", lineno))?;
            let extras = parse_extras(&after_bracket[..close], lineno)?;
            (extras, after_bracket[close + 1..].trim())
        } else {
            (Vec::new(), rest)
        };

        let specifiers = SpecifierSet::parse(spec_text)
            .map_err(|e| anyhow!("line {}: {}", lineno, e))?;

        Ok(Requirement {
            name,
            extras,
            specifiers,
            url: None,
            marker,
            comment,
            line: lineno,
        })
    }

    /// Whether an exact pin (`==` / `===`) is present.
    pub fn is_pinned(&self) -> bool {
        self.specifiers.exact_pin().is_some()
    }

    /// Whether this requirement is installed under `env`. No marker
    /// means unconditional.
    pub fn applies_to(&self, env: &Environment) -> bool {
        match &self.marker {
            Some(marker) => marker.evaluate(env),
            None => true,
        }
    }
}

impl Display for Requirement {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.extras.is_empty() {
            write!(f, "[{}]", self.extras.join(","))?;
        }
        if let Some(url) = &self.url {
            write!(f, " @ {}", url)?;
        } else if !self.specifiers.is_empty() {
            write!(f, "{}", self.specifiers)?;
        }
        if let Some(marker) = &self.marker {
            write!(f, " ; {}", marker)?;
        }
        if let Some(comment) = &self.comment {
            write!(f, "  # {}", comment)?;
        }
        Ok(())
    }
}

/// Split off a trailing `# comment` that sits outside quoted marker
/// strings. pip requires whitespace (or line start) before the hash.
fn split_comment(line: &str) -> (&str, Option<String>) {
    let mut quote: Option<char> = None;
    let mut prev_is_space = true;
    for (idx, c) in line.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' => quote = Some(c),
                '#' if prev_is_space => {
                    let comment = line[idx + 1..].trim().to_string();
                    return (&line[..idx], Some(comment));
                }
                _ => {}
            },
        }
        prev_is_space = c.is_whitespace();
    }
    (line, None)
}

/// Split off a `; marker` suffix outside quoted strings.
fn split_marker(body: &str) -> (&str, Option<&str>) {
    let mut quote: Option<char> = None;
    for (idx, c) in body.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' => quote = Some(c),
                ';' => return (&body[..idx], Some(body[idx + 1..].trim())),
                _ => {}
            },
        }
    }
    (body, None)
}

/// Detect `name @ url`. The `@` must be surrounded by whitespace to avoid
/// misreading URLs containing `@`.
fn split_direct_reference(body: &str) -> Option<(&str, &str)> {
    let idx = body.find(" @ ")?;
    Some((&body[..idx], &body[idx + 3..]))
}

fn parse_name_and_extras(part: &str, lineno: usize) -> Result<(PackageName, Vec<String>)> {
    let part = part.trim();
    if let Some(open) = part.find('[') {
        let close = part
            .rfind(']')
            .ok_or_else(|| anyhow!("line {}: unclosed extras bracket", lineno))?;
        let name = PackageName::parse(part[..open].trim())
            .map_err(|e| anyhow!("line {}: {}", lineno, e))?;
        let extras = parse_extras(&part[open + 1..close], lineno)?;
        Ok((name, extras))
    } else {
        let name = PackageName::parse(part).map_err(|e| anyhow!("line {}: {}", lineno, e))?;
        Ok((name, Vec::new()))
    }
}

fn parse_extras(text: &str, lineno: usize) -> Result<Vec<String>> {
    text.split(',')
        .map(|extra| {
            let extra = extra.trim();
            if extra.is_empty() {
                bail!("line {}: empty extra name", lineno);
            }
            // Extras follow the package-name character rules.
            PackageName::parse(extra).map_err(|e| anyhow!("line {}: {}", lineno, e))?;
            Ok(extra.to_string())
        })
        .collect()
}
