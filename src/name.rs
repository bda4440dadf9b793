//! Package name validation and canonical form.
//!
//! Distribution names compare case-insensitively, with runs of `-`, `_`,
//! and `.` treated as a single `-`. `Pillow`, `pillow`, and `foo_bar` /
//! `foo-bar` / `foo.bar` all name the same package.

use anyhow::{anyhow, Result};
use std::fmt::{self, Display, Formatter};

/// A validated distribution name, preserving the spelling as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageName {
    raw: String,
}

impl PackageName {
    /// Parse a distribution name.
    ///
    /// Names must start and end with an ASCII letter or digit; interior
    /// characters may also be `.`, `-`, or `_`.
    pub fn parse(input: &str) -> Result<Self> {
        let (Some(first), Some(last)) = (input.chars().next(), input.chars().last()) else {
            return Err(anyhow!("package name cannot be empty"));
        };
        if !first.is_ascii_alphanumeric() {
            return Err(anyhow!(
                "invalid package name '{}': must start with a letter or digit",
                input
            ));
        }
        if !last.is_ascii_alphanumeric() {
            return Err(anyhow!(
                "invalid package name '{}': must end with a letter or digit",
                input
            ));
        }
        if let Some(bad) = input
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && !matches!(c, '.' | '-' | '_'))
        {
            return Err(anyhow!(
                "invalid package name '{}': unexpected character '{}'",
                input,
                bad
            ));
        }

        Ok(PackageName {
            raw: input.to_string(),
        })
    }

    /// The name exactly as it was written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The canonical comparison form: lowercase, with runs of `-_.`
    /// collapsed to a single `-`.
    pub fn canonical(&self) -> String {
        canonicalize(&self.raw)
    }

    /// Whether two names refer to the same package.
    pub fn matches(&self, other: &PackageName) -> bool {
        self.canonical() == other.canonical()
    }

    /// Whether the written spelling already is the canonical form.
    pub fn is_canonical(&self) -> bool {
        self.raw == self.canonical()
    }
}

impl Display for PackageName {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Canonicalize a name string without validating it.
pub fn canonicalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_run = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_run {
                out.push('-');
                in_run = true;
            }
        } else {
            out.push(c.to_ascii_lowercase());
            in_run = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_name() {
        let name = PackageName::parse("requests").unwrap();
        assert_eq!(name.as_str(), "requests");
        assert_eq!(name.canonical(), "requests");
        assert!(name.is_canonical());
    }

    #[test]
    fn test_canonical_lowercases() {
        let name = PackageName::parse("Pillow").unwrap();
        assert_eq!(name.canonical(), "pillow");
        assert!(!name.is_canonical());
    }

    #[test]
    fn test_canonical_collapses_separator_runs() {
        assert_eq!(canonicalize("foo_bar"), "foo-bar");
        assert_eq!(canonicalize("foo.bar"), "foo-bar");
        assert_eq!(canonicalize("foo--bar"), "foo-bar");
        assert_eq!(canonicalize("foo._-bar"), "foo-bar");
    }

    #[test]
    fn test_equivalent_spellings_match() {
        let a = PackageName::parse("Foo_Bar").unwrap();
        let b = PackageName::parse("foo-bar").unwrap();
        let c = PackageName::parse("foo.bar").unwrap();
        assert!(a.matches(&b));
        assert!(b.matches(&c));
    }

    #[test]
    fn test_display_preserves_spelling() {
        let name = PackageName::parse("PyQt5").unwrap();
        assert_eq!(name.to_string(), "PyQt5");
    }

    #[test]
    fn test_rejects_empty() {
        assert!(PackageName::parse("").is_err());
    }

    #[test]
    fn test_rejects_leading_separator() {
        assert!(PackageName::parse("-requests").is_err());
        assert!(PackageName::parse(".requests").is_err());
    }

    #[test]
    fn test_rejects_trailing_separator() {
        assert!(PackageName::parse("requests-").is_err());
        assert!(PackageName::parse("requests.").is_err());
    }

    #[test]
    fn test_rejects_invalid_characters() {
        assert!(PackageName::parse("req uests").is_err());
        assert!(PackageName::parse("req@uests").is_err());
    }

    #[test]
    fn test_digits_allowed_at_edges() {
        assert!(PackageName::parse("2to3").is_ok());
        assert!(PackageName::parse("pyqt5").is_ok());
    }
}
