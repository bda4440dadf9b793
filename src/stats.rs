//! Aggregated manifest statistics for the `stats` command.
//!
//! Pure aggregation; rendering lives in `formatters`.

use serde::Serialize;

use crate::env::Environment;
use crate::manifest::{Entry, Manifest};
use crate::selection::select;

/// Counts across a manifest chain.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsData {
    pub total: usize,
    pub pinned: usize,
    /// Requirements carrying an environment marker.
    pub marked: usize,
    /// Requirements selected under each built-in platform preset.
    pub by_platform: Vec<(String, usize)>,
    pub directives: usize,
    pub comments: usize,
}

/// Aggregate over a loaded manifest chain (root plus includes).
pub fn aggregate(manifests: &[Manifest]) -> StatsData {
    let mut data = StatsData::default();

    for manifest in manifests {
        for entry in &manifest.entries {
            match entry {
                Entry::Requirement(req) => {
                    data.total += 1;
                    if req.is_pinned() {
                        data.pinned += 1;
                    }
                    if req.marker.is_some() {
                        data.marked += 1;
                    }
                }
                Entry::Comment { .. } => data.comments += 1,
                Entry::Directive(_) => data.directives += 1,
                Entry::Blank { .. } => {}
            }
        }
    }

    let reqs = crate::manifest::resolve::all_requirements(manifests);
    for platform in ["linux", "macos", "windows"] {
        let Ok(env) = Environment::preset(platform) else {
            continue;
        };
        let selection = select(&reqs, &env);
        data.by_platform
            .push((platform.to_string(), selection.included.len()));
    }

    data
}
