//! Environment-marker expressions.
//!
//! Markers are the `; sys_platform != "win32"` conditions attached to
//! requirement lines. This module lexes, parses, evaluates, and explains
//! them: [`lexer`] tokenizes with column tracking, [`parse`] builds the
//! expression tree, and [`eval`] decides it against an [`Environment`]
//! (`crate::env::Environment`).

mod eval;
mod lexer;
mod parse;

pub use eval::Explanation;

use anyhow::Result;
use std::fmt::{self, Display, Formatter};

use crate::env::Environment;

/// The marker variables the grammar admits. Anything else is a
/// parse-time error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
    OsName,
    SysPlatform,
    PlatformMachine,
    PlatformPythonImplementation,
    PlatformRelease,
    PlatformSystem,
    PlatformVersion,
    PythonVersion,
    PythonFullVersion,
    ImplementationName,
    ImplementationVersion,
    Extra,
}

/// Every marker variable name, in the order used for display.
pub const VARIABLE_NAMES: &[&str] = &[
    "os_name",
    "sys_platform",
    "platform_machine",
    "platform_python_implementation",
    "platform_release",
    "platform_system",
    "platform_version",
    "python_version",
    "python_full_version",
    "implementation_name",
    "implementation_version",
    "extra",
];

impl Variable {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "os_name" => Some(Variable::OsName),
            "sys_platform" => Some(Variable::SysPlatform),
            "platform_machine" => Some(Variable::PlatformMachine),
            "platform_python_implementation" => Some(Variable::PlatformPythonImplementation),
            "platform_release" => Some(Variable::PlatformRelease),
            "platform_system" => Some(Variable::PlatformSystem),
            "platform_version" => Some(Variable::PlatformVersion),
            "python_version" => Some(Variable::PythonVersion),
            "python_full_version" => Some(Variable::PythonFullVersion),
            "implementation_name" => Some(Variable::ImplementationName),
            "implementation_version" => Some(Variable::ImplementationVersion),
            "extra" => Some(Variable::Extra),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Variable::OsName => "os_name",
            Variable::SysPlatform => "sys_platform",
            Variable::PlatformMachine => "platform_machine",
            Variable::PlatformPythonImplementation => "platform_python_implementation",
            Variable::PlatformRelease => "platform_release",
            Variable::PlatformSystem => "platform_system",
            Variable::PlatformVersion => "platform_version",
            Variable::PythonVersion => "python_version",
            Variable::PythonFullVersion => "python_full_version",
            Variable::ImplementationName => "implementation_name",
            Variable::ImplementationVersion => "implementation_version",
            Variable::Extra => "extra",
        }
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Comparison operator inside a marker atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    Compatible,
    Arbitrary,
    In,
    NotIn,
}

impl CompareOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Compatible => "~=",
            CompareOp::Arbitrary => "===",
            CompareOp::In => "in",
            CompareOp::NotIn => "not in",
        }
    }
}

/// One side of a marker atom: a variable or a quoted literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Variable(Variable),
    Literal(String),
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Operand::Variable(v) => write!(f, "{}", v),
            Operand::Literal(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// `lhs op rhs` where each side is a variable or literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub lhs: Operand,
    pub op: CompareOp,
    pub rhs: Operand,
}

impl Display for Atom {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op.as_str(), self.rhs)
    }
}

/// A marker expression tree. `or` binds loosest, then `and`; parentheses
/// group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    Or(Box<Marker>, Box<Marker>),
    And(Box<Marker>, Box<Marker>),
    Atom(Atom),
}

impl Marker {
    /// Parse a marker expression.
    pub fn parse(input: &str) -> Result<Self> {
        let tokens = lexer::lex(input)?;
        parse::parse(&tokens)
    }

    /// Decide the marker against an environment.
    pub fn evaluate(&self, env: &Environment) -> bool {
        eval::evaluate(self, env)
    }

    /// Produce the per-subexpression verdict tree for `reqmark explain`.
    pub fn explain(&self, env: &Environment) -> Explanation {
        eval::explain(self, env)
    }

    fn fmt_prec(&self, f: &mut Formatter, parent_is_and: bool) -> fmt::Result {
        match self {
            Marker::Atom(atom) => write!(f, "{}", atom),
            Marker::And(a, b) => {
                a.fmt_prec(f, true)?;
                write!(f, " and ")?;
                b.fmt_prec(f, true)
            }
            Marker::Or(a, b) => {
                // An or under an and was parenthesized in the source;
                // keep the grouping explicit.
                if parent_is_and {
                    write!(f, "(")?;
                }
                a.fmt_prec(f, false)?;
                write!(f, " or ")?;
                b.fmt_prec(f, false)?;
                if parent_is_and {
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}

impl Display for Marker {
    /// Re-render normalized: double quotes, single spaces.
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.fmt_prec(f, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_normalizes() {
        let m = Marker::parse("sys_platform!='win32'").unwrap();
        assert_eq!(m.to_string(), "sys_platform != \"win32\"");
    }

    #[test]
    fn test_display_keeps_parenthesized_or() {
        let m = Marker::parse(
            "(sys_platform == \"linux\" or sys_platform == \"darwin\") and python_version >= \"3.8\"",
        )
        .unwrap();
        assert_eq!(
            m.to_string(),
            "(sys_platform == \"linux\" or sys_platform == \"darwin\") and python_version >= \"3.8\""
        );
    }

    #[test]
    fn test_unknown_variable_is_error() {
        let err = Marker::parse("platform_flavor == \"x\"").unwrap_err();
        assert!(err.to_string().contains("platform_flavor"));
    }

    #[test]
    fn test_variable_name_roundtrip() {
        for name in VARIABLE_NAMES {
            let var = Variable::from_name(name).unwrap();
            assert_eq!(var.name(), *name);
        }
    }
}
