//! Version specifiers and specifier sets.
//!
//! A specifier is an operator plus a version (`>=1.4`, `==2.1.*`, `~=0.29`);
//! a specifier set is a comma-separated conjunction of them. Matching
//! follows the PEP 440 rules for compatible releases, wildcards, and
//! arbitrary equality.

use anyhow::{anyhow, bail, Result};
use std::fmt::{self, Display, Formatter};

use crate::version::Version;

/// Comparison operator of a specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `>=`
    Ge,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `~=` compatible release
    Compatible,
    /// `===` arbitrary (string) equality
    Arbitrary,
}

impl Operator {
    fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Compatible => "~=",
            Operator::Arbitrary => "===",
        }
    }
}

/// A single version constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    pub op: Operator,
    /// The version text as written (used for `===` and for display).
    raw: String,
    /// Parsed version. None for wildcards and unparseable `===` targets.
    version: Option<Version>,
    /// Prefix version for `==x.y.*` / `!=x.y.*` wildcards; its epoch and
    /// release are what the candidate is compared against.
    wildcard: Option<Version>,
}

impl Specifier {
    /// Parse one specifier, e.g. `>=1.4` or `==2.1.*`.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        // Longest operators first so `===` is not read as `==` + `=`.
        let (op, rest) = if let Some(rest) = input.strip_prefix("===") {
            (Operator::Arbitrary, rest)
        } else if let Some(rest) = input.strip_prefix("==") {
            (Operator::Eq, rest)
        } else if let Some(rest) = input.strip_prefix("!=") {
            (Operator::Ne, rest)
        } else if let Some(rest) = input.strip_prefix(">=") {
            (Operator::Ge, rest)
        } else if let Some(rest) = input.strip_prefix("<=") {
            (Operator::Le, rest)
        } else if let Some(rest) = input.strip_prefix("~=") {
            (Operator::Compatible, rest)
        } else if let Some(rest) = input.strip_prefix('>') {
            (Operator::Gt, rest)
        } else if let Some(rest) = input.strip_prefix('<') {
            (Operator::Lt, rest)
        } else {
            bail!("invalid specifier '{}': missing operator", input);
        };

        let raw = rest.trim();
        if raw.is_empty() {
            bail!("invalid specifier '{}': missing version", input);
        }

        if let Some(prefix_text) = raw.strip_suffix(".*") {
            if !matches!(op, Operator::Eq | Operator::Ne) {
                bail!(
                    "invalid specifier '{}': wildcards are only valid with == and !=",
                    input
                );
            }
            let prefix_version = Version::parse(prefix_text)
                .map_err(|_| anyhow!("invalid wildcard specifier '{}'", input))?;
            if prefix_version.pre.is_some()
                || prefix_version.post.is_some()
                || prefix_version.dev.is_some()
                || !prefix_version.local.is_empty()
            {
                bail!("invalid wildcard specifier '{}': prefix must be a plain release", input);
            }
            return Ok(Specifier {
                op,
                raw: raw.to_string(),
                version: None,
                wildcard: Some(prefix_version),
            });
        }

        let version = match op {
            // Arbitrary equality compares strings; the target need not be
            // a well-formed version.
            Operator::Arbitrary => Version::parse(raw).ok(),
            Operator::Compatible => {
                let v = Version::parse(raw)
                    .map_err(|e| anyhow!("invalid specifier '{}': {}", input, e))?;
                if v.release.len() < 2 {
                    bail!(
                        "invalid specifier '{}': ~= requires at least two release segments",
                        input
                    );
                }
                Some(v)
            }
            _ => Some(
                Version::parse(raw)
                    .map_err(|e| anyhow!("invalid specifier '{}': {}", input, e))?,
            ),
        };

        Ok(Specifier {
            op,
            raw: raw.to_string(),
            version,
            wildcard: None,
        })
    }

    /// The parsed target version, when there is one.
    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    /// Whether `candidate` satisfies this specifier.
    pub fn matches(&self, candidate: &Version) -> bool {
        if let Some(prefix) = &self.wildcard {
            let hit = candidate.epoch == prefix.epoch
                && candidate.release_starts_with(&prefix.release);
            return match self.op {
                Operator::Ne => !hit,
                _ => hit,
            };
        }

        // Only `===` may carry an unparseable version; everything else
        // stores one at parse time.
        let Some(target) = self.version.as_ref() else {
            return self.raw == candidate.to_string();
        };

        match self.op {
            Operator::Arbitrary => self.raw == candidate.to_string(),
            Operator::Compatible => {
                let prefix = &target.release[..target.release.len() - 1];
                candidate >= target
                    && candidate.epoch == target.epoch
                    && candidate.release_starts_with(prefix)
            }
            Operator::Eq => {
                if target.local.is_empty() {
                    // A pin without a local part accepts any local variant.
                    candidate.without_local() == *target
                } else {
                    candidate == target
                }
            }
            Operator::Ne => {
                if target.local.is_empty() {
                    candidate.without_local() != *target
                } else {
                    candidate != target
                }
            }
            Operator::Ge => candidate >= target,
            Operator::Le => candidate <= target,
            Operator::Gt => candidate > target,
            Operator::Lt => candidate < target,
        }
    }
}

impl Display for Specifier {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}{}", self.op.as_str(), self.raw)
    }
}

/// A comma-separated conjunction of specifiers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecifierSet {
    specifiers: Vec<Specifier>,
}

impl SpecifierSet {
    /// Parse a comma-separated specifier list. Empty input yields the
    /// empty set, which matches everything.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(SpecifierSet::default());
        }
        let specifiers = input
            .split(',')
            .map(Specifier::parse)
            .collect::<Result<Vec<_>>>()?;
        Ok(SpecifierSet { specifiers })
    }

    pub fn is_empty(&self) -> bool {
        self.specifiers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Specifier> {
        self.specifiers.iter()
    }

    /// Whether `candidate` satisfies every member.
    pub fn matches(&self, candidate: &Version) -> bool {
        self.specifiers.iter().all(|s| s.matches(candidate))
    }

    /// The exact pin (`==` or `===` with a parseable version), if any.
    pub fn exact_pin(&self) -> Option<&Version> {
        self.specifiers.iter().find_map(|s| match s.op {
            Operator::Eq | Operator::Arbitrary if s.wildcard.is_none() => s.version.as_ref(),
            _ => None,
        })
    }

    /// Detect sets no version can satisfy: conflicting `==` pins, a pin
    /// excluded by `!=`, or disjoint ordered bounds.
    pub fn is_contradictory(&self) -> bool {
        let pins: Vec<&Version> = self
            .specifiers
            .iter()
            .filter(|s| s.op == Operator::Eq && s.wildcard.is_none())
            .filter_map(|s| s.version())
            .collect();

        for pair in pins.windows(2) {
            if pair[0] != pair[1] {
                return true;
            }
        }

        if let Some(pin) = pins.first() {
            let excluded = self
                .specifiers
                .iter()
                .filter(|s| s.op == Operator::Ne && s.wildcard.is_none())
                .filter_map(|s| s.version())
                .any(|v| v == *pin);
            if excluded {
                return true;
            }
        }

        // Disjoint bounds: the strongest lower bound above the weakest
        // upper bound (or touching it when either side is exclusive).
        let lower = self
            .specifiers
            .iter()
            .filter(|s| matches!(s.op, Operator::Gt | Operator::Ge))
            .filter_map(|s| s.version().map(|v| (v, s.op == Operator::Gt)))
            .max_by(|a, b| a.0.cmp(b.0));
        let upper = self
            .specifiers
            .iter()
            .filter(|s| matches!(s.op, Operator::Lt | Operator::Le))
            .filter_map(|s| s.version().map(|v| (v, s.op == Operator::Lt)))
            .min_by(|a, b| a.0.cmp(b.0));

        if let (Some((lo, lo_excl)), Some((hi, hi_excl))) = (lower, upper) {
            if lo > hi {
                return true;
            }
            if lo == hi && (lo_excl || hi_excl) {
                return true;
            }
        }

        false
    }
}

impl Display for SpecifierSet {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let parts: Vec<String> = self.specifiers.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}
