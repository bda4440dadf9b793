//! Environment selection: which requirements apply, and freeze output.

use crate::env::Environment;
use crate::requirement::Requirement;

/// The split of a requirement list under one environment.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub included: Vec<Requirement>,
    /// Excluded requirements paired with the rendered marker that
    /// evaluated false.
    pub excluded: Vec<(Requirement, String)>,
}

/// Evaluate each requirement's marker against `env`.
pub fn select(reqs: &[&Requirement], env: &Environment) -> Selection {
    let mut selection = Selection::default();
    for req in reqs {
        if req.applies_to(env) {
            selection.included.push((*req).clone());
        } else {
            let marker = req
                .marker
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_default();
            selection.excluded.push(((*req).clone(), marker));
        }
    }
    selection
}

/// Render installable `name==version` lines for the included entries.
/// Entries without an exact pin keep their full specifier set; direct
/// URL references render as written.
pub fn freeze(selection: &Selection) -> String {
    let mut out = String::new();
    for req in &selection.included {
        match (req.specifiers.exact_pin(), &req.url) {
            (_, Some(url)) => out.push_str(&format!("{} @ {}\n", req.name, url)),
            (Some(pin), None) => {
                out.push_str(&format!("{}=={}\n", req.name.canonical(), pin))
            }
            (None, None) => {
                out.push_str(&format!("{}{}\n", req.name.canonical(), req.specifiers))
            }
        }
    }
    out
}

/// Freeze output with the generated-file header, for `--output`.
pub fn freeze_with_header(selection: &Selection, platform_label: &str) -> String {
    format!(
        "# Generated by reqmark on {} ({})\n{}",
        crate::utc_now_iso(),
        platform_label,
        freeze(selection)
    )
}
