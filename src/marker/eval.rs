//! Marker evaluation against an environment.
//!
//! `in` / `not in` are substring tests. For the ordered comparison
//! operators, when both sides parse as versions the comparison is
//! version-ordered; otherwise it falls back to plain string ordering.

use crate::env::Environment;
use crate::version::Version;

use super::{Atom, CompareOp, Marker, Operand};

/// Decide a marker expression.
pub fn evaluate(marker: &Marker, env: &Environment) -> bool {
    match marker {
        Marker::Or(a, b) => evaluate(a, env) || evaluate(b, env),
        Marker::And(a, b) => evaluate(a, env) && evaluate(b, env),
        Marker::Atom(atom) => eval_atom(atom, env),
    }
}

/// A verdict tree for one marker expression, used by `reqmark explain`.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// The sub-expression, rendered. For atoms this includes the resolved
    /// values, e.g. `sys_platform != "win32"  [sys_platform = "linux"]`.
    pub text: String,
    pub verdict: bool,
    pub children: Vec<Explanation>,
}

/// Evaluate while recording a verdict for every sub-expression.
pub fn explain(marker: &Marker, env: &Environment) -> Explanation {
    match marker {
        Marker::Or(a, b) => {
            let left = explain(a, env);
            let right = explain(b, env);
            Explanation {
                text: "or".to_string(),
                verdict: left.verdict || right.verdict,
                children: vec![left, right],
            }
        }
        Marker::And(a, b) => {
            let left = explain(a, env);
            let right = explain(b, env);
            Explanation {
                text: "and".to_string(),
                verdict: left.verdict && right.verdict,
                children: vec![left, right],
            }
        }
        Marker::Atom(atom) => {
            let verdict = eval_atom(atom, env);
            let mut text = atom.to_string();
            let resolved = resolved_variables(atom, env);
            if !resolved.is_empty() {
                text.push_str(&format!("  [{}]", resolved.join(", ")));
            }
            Explanation {
                text,
                verdict,
                children: Vec::new(),
            }
        }
    }
}

fn resolved_variables(atom: &Atom, env: &Environment) -> Vec<String> {
    [&atom.lhs, &atom.rhs]
        .iter()
        .filter_map(|operand| match operand {
            Operand::Variable(var) => {
                Some(format!("{} = \"{}\"", var.name(), env.get(*var)))
            }
            Operand::Literal(_) => None,
        })
        .collect()
}

fn resolve<'a>(operand: &'a Operand, env: &'a Environment) -> &'a str {
    match operand {
        Operand::Variable(var) => env.get(*var),
        Operand::Literal(s) => s,
    }
}

fn eval_atom(atom: &Atom, env: &Environment) -> bool {
    let lhs = resolve(&atom.lhs, env);
    let rhs = resolve(&atom.rhs, env);

    match atom.op {
        CompareOp::In => rhs.contains(lhs),
        CompareOp::NotIn => !rhs.contains(lhs),
        CompareOp::Arbitrary => lhs == rhs,
        CompareOp::Eq => compare(lhs, rhs, |o| o.is_eq()),
        CompareOp::Ne => compare(lhs, rhs, |o| o.is_ne()),
        CompareOp::Lt => compare(lhs, rhs, |o| o.is_lt()),
        CompareOp::Le => compare(lhs, rhs, |o| o.is_le()),
        CompareOp::Gt => compare(lhs, rhs, |o| o.is_gt()),
        CompareOp::Ge => compare(lhs, rhs, |o| o.is_ge()),
        // ~= on two versions is the compatible-release test; on anything
        // else it degrades to equality.
        CompareOp::Compatible => match (Version::parse(lhs), Version::parse(rhs)) {
            (Ok(l), Ok(r)) if r.release.len() >= 2 => {
                let prefix = &r.release[..r.release.len() - 1];
                l >= r && l.epoch == r.epoch && l.release_starts_with(prefix)
            }
            _ => lhs == rhs,
        },
    }
}

fn compare(lhs: &str, rhs: &str, check: impl Fn(std::cmp::Ordering) -> bool) -> bool {
    match (Version::parse(lhs), Version::parse(rhs)) {
        (Ok(l), Ok(r)) => check(l.cmp(&r)),
        _ => check(lhs.cmp(rhs)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::Marker;

    fn eval_in(input: &str, env: &Environment) -> bool {
        Marker::parse(input).unwrap().evaluate(env)
    }

    #[test]
    fn test_implementation_check_true_on_cpython() {
        let env = Environment::preset("linux").unwrap();
        assert!(eval_in("platform_python_implementation != \"PyPy\"", &env));
    }

    #[test]
    fn test_sys_platform_gate() {
        let linux = Environment::preset("linux").unwrap();
        let windows = Environment::preset("windows").unwrap();
        assert!(eval_in("sys_platform != \"win32\"", &linux));
        assert!(!eval_in("sys_platform != \"win32\"", &windows));
    }

    #[test]
    fn test_substring_not_in() {
        let mut env = Environment::preset("linux").unwrap();
        env.apply("platform_release", "5.15.0-91-generic").unwrap();
        assert!(!eval_in("\"generic\" not in platform_release", &env));

        env.apply("platform_release", "5.15.0-91-aws").unwrap();
        assert!(eval_in("\"generic\" not in platform_release", &env));
    }

    #[test]
    fn test_version_ordered_comparison() {
        let mut env = Environment::preset("linux").unwrap();
        env.apply("python_version", "3.10").unwrap();
        // String comparison would say "3.10" < "3.9".
        assert!(eval_in("python_version >= \"3.9\"", &env));
    }

    #[test]
    fn test_string_comparison_fallback() {
        let env = Environment::preset("linux").unwrap();
        // os_name is not a version; plain string equality applies.
        assert!(eval_in("os_name == \"posix\"", &env));
        assert!(!eval_in("os_name < \"aaa\"", &env));
    }

    #[test]
    fn test_and_or_combination() {
        let env = Environment::preset("macos").unwrap();
        assert!(eval_in(
            "sys_platform == \"darwin\" and python_version >= \"3.8\"",
            &env
        ));
        assert!(eval_in(
            "sys_platform == \"win32\" or sys_platform == \"darwin\"",
            &env
        ));
        assert!(!eval_in(
            "sys_platform == \"win32\" and sys_platform == \"darwin\"",
            &env
        ));
    }

    #[test]
    fn test_extra_defaults_empty() {
        let env = Environment::preset("linux").unwrap();
        assert!(!eval_in("extra == \"test\"", &env));
        assert!(eval_in("extra == \"test\"", &env.with_extra("test")));
    }

    #[test]
    fn test_explain_reports_verdicts() {
        let env = Environment::preset("windows").unwrap();
        let marker =
            Marker::parse("sys_platform != \"win32\" or python_version >= \"3.8\"").unwrap();
        let explanation = marker.explain(&env);
        assert!(explanation.verdict);
        assert_eq!(explanation.children.len(), 2);
        assert!(!explanation.children[0].verdict);
        assert!(explanation.children[1].verdict);
        assert!(explanation.children[0].text.contains("sys_platform = \"win32\""));
    }
}
