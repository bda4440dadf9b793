//! Version parsing and ordering.
//!
//! Implements the PEP 440 version scheme: optional epoch, dotted release,
//! pre-release, post-release, dev-release, and local segments, with the
//! total ordering the scheme defines. Trailing zeros in the release are
//! insignificant for comparison (`1.0` == `1.0.0`).

use anyhow::{anyhow, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::sync::OnceLock;

/// Pre-release phase, ordered alpha < beta < release candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PreKind {
    Alpha,
    Beta,
    Rc,
}

impl PreKind {
    fn label(self) -> &'static str {
        match self {
            PreKind::Alpha => "a",
            PreKind::Beta => "b",
            PreKind::Rc => "rc",
        }
    }
}

/// One segment of a local version: numeric segments order after
/// alphanumeric ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum LocalSegment {
    Text(String),
    Number(u64),
}

impl Display for LocalSegment {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            LocalSegment::Text(s) => write!(f, "{}", s),
            LocalSegment::Number(n) => write!(f, "{}", n),
        }
    }
}

/// A parsed version.
#[derive(Debug, Clone)]
pub struct Version {
    pub epoch: u64,
    pub release: Vec<u64>,
    pub pre: Option<(PreKind, u64)>,
    pub post: Option<u64>,
    pub dev: Option<u64>,
    pub local: Vec<LocalSegment>,
}

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?ix)^\s*v?
            (?:(?P<epoch>\d+)!)?
            (?P<release>\d+(?:\.\d+)*)
            (?:[-_\.]?(?P<pre_l>alpha|a|beta|b|preview|pre|c|rc)[-_\.]?(?P<pre_n>\d+)?)?
            (?P<post>(?:-(?P<post_n1>\d+))|(?:[-_\.]?(?:post|rev|r)[-_\.]?(?P<post_n2>\d+)?))?
            (?P<dev>[-_\.]?dev[-_\.]?(?P<dev_n>\d+)?)?
            (?:\+(?P<local>[a-z0-9]+(?:[-_\.][a-z0-9]+)*))?
            \s*$",
        )
        .expect("version regex is valid")
    })
}

impl Version {
    /// Parse a version string.
    ///
    /// Accepts the alternate spellings the scheme normalizes away
    /// (`alpha`/`beta`/`c`/`pre`/`preview` pre-release labels, `rev`/`r`
    /// post-release labels, `-N` implicit post-releases, a leading `v`).
    pub fn parse(input: &str) -> Result<Self> {
        let caps = version_regex()
            .captures(input)
            .ok_or_else(|| anyhow!("invalid version '{}'", input))?;

        let epoch = match caps.name("epoch") {
            Some(m) => m
                .as_str()
                .parse()
                .map_err(|_| anyhow!("invalid epoch in version '{}'", input))?,
            None => 0,
        };

        let release = caps
            .name("release")
            .expect("release group always present on match")
            .as_str()
            .split('.')
            .map(|part| {
                part.parse()
                    .map_err(|_| anyhow!("release segment out of range in version '{}'", input))
            })
            .collect::<Result<Vec<u64>>>()?;

        let pre = caps.name("pre_l").map(|label| {
            let kind = match label.as_str().to_ascii_lowercase().as_str() {
                "a" | "alpha" => PreKind::Alpha,
                "b" | "beta" => PreKind::Beta,
                _ => PreKind::Rc,
            };
            let n = caps
                .name("pre_n")
                .map(|m| m.as_str().parse().unwrap_or(0))
                .unwrap_or(0);
            (kind, n)
        });

        let post = caps.name("post").map(|_| {
            caps.name("post_n1")
                .or_else(|| caps.name("post_n2"))
                .map(|m| m.as_str().parse().unwrap_or(0))
                .unwrap_or(0)
        });

        let dev = caps.name("dev").map(|_| {
            caps.name("dev_n")
                .map(|m| m.as_str().parse().unwrap_or(0))
                .unwrap_or(0)
        });

        let local = match caps.name("local") {
            Some(m) => m
                .as_str()
                .split(['-', '_', '.'])
                .map(|seg| match seg.parse::<u64>() {
                    Ok(n) => LocalSegment::Number(n),
                    Err(_) => LocalSegment::Text(seg.to_ascii_lowercase()),
                })
                .collect(),
            None => Vec::new(),
        };

        Ok(Version {
            epoch,
            release,
            pre,
            post,
            dev,
            local,
        })
    }

    /// Whether this is a pre-release or dev-release.
    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }

    /// Whether `self`'s release starts with `prefix`, padding with zeros.
    /// Used by wildcard and compatible-release matching.
    pub fn release_starts_with(&self, prefix: &[u64]) -> bool {
        prefix
            .iter()
            .enumerate()
            .all(|(i, &p)| self.release.get(i).copied().unwrap_or(0) == p)
    }

    /// This version with the local part removed.
    pub fn without_local(&self) -> Version {
        Version {
            local: Vec::new(),
            ..self.clone()
        }
    }

    // Ordering keys following the scheme's precedence rules.

    fn pre_key(&self) -> PreOrdering {
        match self.pre {
            Some((kind, n)) => PreOrdering::Pre(kind, n),
            // A dev release with no pre/post segment sorts before any
            // pre-release of the same release.
            None if self.post.is_none() && self.dev.is_some() => PreOrdering::DevOnly,
            None => PreOrdering::Final,
        }
    }

    fn dev_key(&self) -> (bool, u64) {
        // No dev segment sorts after any dev segment.
        (self.dev.is_none(), self.dev.unwrap_or(0))
    }
}

#[derive(PartialEq, Eq, PartialOrd, Ord)]
enum PreOrdering {
    DevOnly,
    Pre(PreKind, u64),
    Final,
}

fn cmp_release(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| cmp_release(&self.release, &other.release))
            .then_with(|| self.pre_key().cmp(&other.pre_key()))
            .then_with(|| self.post.cmp(&other.post))
            .then_with(|| self.dev_key().cmp(&other.dev_key()))
            .then_with(|| self.local.cmp(&other.local))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}!", self.epoch)?;
        }
        let release: Vec<String> = self.release.iter().map(|n| n.to_string()).collect();
        write!(f, "{}", release.join("."))?;
        if let Some((kind, n)) = self.pre {
            write!(f, "{}{}", kind.label(), n)?;
        }
        if let Some(n) = self.post {
            write!(f, ".post{}", n)?;
        }
        if let Some(n) = self.dev {
            write!(f, ".dev{}", n)?;
        }
        if !self.local.is_empty() {
            let segs: Vec<String> = self.local.iter().map(|s| s.to_string()).collect();
            write!(f, "+{}", segs.join("."))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_parse_simple() {
        let version = v("1.2.3");
        assert_eq!(version.epoch, 0);
        assert_eq!(version.release, vec![1, 2, 3]);
        assert!(version.pre.is_none());
        assert!(!version.is_prerelease());
    }

    #[test]
    fn test_parse_epoch() {
        let version = v("2!1.0");
        assert_eq!(version.epoch, 2);
        assert_eq!(version.to_string(), "2!1.0");
    }

    #[test]
    fn test_parse_pre_release_spellings() {
        assert_eq!(v("1.0a1"), v("1.0alpha1"));
        assert_eq!(v("1.0b2"), v("1.0beta2"));
        assert_eq!(v("1.0rc1"), v("1.0c1"));
        assert_eq!(v("1.0rc1"), v("1.0pre1"));
        assert_eq!(v("1.0rc1"), v("1.0preview1"));
    }

    #[test]
    fn test_parse_post_release_spellings() {
        assert_eq!(v("1.0.post1"), v("1.0-1"));
        assert_eq!(v("1.0.post1"), v("1.0rev1"));
        assert_eq!(v("1.0.post1"), v("1.0.r1"));
    }

    #[test]
    fn test_parse_local() {
        let version = v("1.0+ubuntu.1");
        assert_eq!(
            version.local,
            vec![
                LocalSegment::Text("ubuntu".to_string()),
                LocalSegment::Number(1)
            ]
        );
        assert_eq!(version.to_string(), "1.0+ubuntu.1");
    }

    #[test]
    fn test_parse_leading_v() {
        assert_eq!(v("v1.0"), v("1.0"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Version::parse("").is_err());
        assert!(Version::parse("not-a-version").is_err());
        assert!(Version::parse("1.0.x").is_err());
        assert!(Version::parse("1.0 2.0").is_err());
    }

    #[test]
    fn test_trailing_zeros_insignificant() {
        assert_eq!(v("1.0"), v("1.0.0"));
        assert_eq!(v("1"), v("1.0"));
        assert!(v("1.0.1") > v("1.0"));
    }

    #[test]
    fn test_canonical_ordering_chain() {
        // The ordering example from the version scheme's specification.
        let ordered = [
            "1.0.dev456",
            "1.0a1",
            "1.0a2.dev456",
            "1.0a12.dev456",
            "1.0a12",
            "1.0b1.dev456",
            "1.0b2",
            "1.0b2.post345.dev456",
            "1.0b2.post345",
            "1.0rc1.dev456",
            "1.0rc1",
            "1.0",
            "1.0.post456.dev34",
            "1.0.post456",
            "1.1.dev1",
        ];
        for pair in ordered.windows(2) {
            assert!(
                v(pair[0]) < v(pair[1]),
                "expected {} < {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_epoch_dominates() {
        assert!(v("1!1.0") > v("999.999"));
    }

    #[test]
    fn test_local_orders_last() {
        assert!(v("1.0+abc") > v("1.0"));
        assert!(v("1.0+5") > v("1.0+abc"));
        assert!(v("1.0.1") > v("1.0+999"));
    }

    #[test]
    fn test_release_starts_with() {
        assert!(v("1.4.2").release_starts_with(&[1, 4]));
        assert!(v("1.4").release_starts_with(&[1, 4, 0]));
        assert!(!v("1.5").release_starts_with(&[1, 4]));
    }

    #[test]
    fn test_without_local() {
        assert_eq!(v("1.0+local").without_local(), v("1.0"));
    }

    #[test]
    fn test_display_normalizes() {
        assert_eq!(v("1.0alpha1").to_string(), "1.0a1");
        assert_eq!(v("1.0-1").to_string(), "1.0.post1");
        assert_eq!(v("V1.0.DEV5").to_string(), "1.0.dev5");
    }

    #[test]
    fn test_is_prerelease() {
        assert!(v("1.0a1").is_prerelease());
        assert!(v("1.0.dev1").is_prerelease());
        assert!(!v("1.0").is_prerelease());
        assert!(!v("1.0.post1").is_prerelease());
    }
}
