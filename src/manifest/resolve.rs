//! Cross-file include resolution (`-r` / `-c` directives).
//!
//! Include paths resolve relative to the including file. Each file is
//! loaded once; a loop through `-r` directives is an error naming the
//! cycle.

use anyhow::{anyhow, Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::Manifest;
use crate::requirement::Requirement;

/// Load a manifest and, depth-first, every manifest it transitively
/// includes via `-r`. The root comes first.
pub fn load_with_includes(path: &Path) -> Result<Vec<Manifest>> {
    let mut loaded = Vec::new();
    let mut visited = HashSet::new();
    let mut stack = Vec::new();
    load_recursive(path, &mut loaded, &mut visited, &mut stack)?;
    Ok(loaded)
}

fn load_recursive(
    path: &Path,
    loaded: &mut Vec<Manifest>,
    visited: &mut HashSet<PathBuf>,
    stack: &mut Vec<PathBuf>,
) -> Result<()> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("failed to resolve manifest path {}", path.display()))?;

    if stack.contains(&canonical) {
        let mut cycle: Vec<String> = stack.iter().map(|p| p.display().to_string()).collect();
        cycle.push(canonical.display().to_string());
        return Err(anyhow!("include cycle detected: {}", cycle.join(" -> ")));
    }
    if !visited.insert(canonical.clone()) {
        // Diamond include; already loaded once.
        return Ok(());
    }

    let manifest = Manifest::load(path)?;
    let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let includes: Vec<(PathBuf, usize)> = manifest
        .includes()
        .map(|(target, line)| (base.join(target), line))
        .collect();

    loaded.push(manifest);
    stack.push(canonical);
    for (target, line) in includes {
        load_recursive(&target, loaded, visited, stack).with_context(|| {
            format!(
                "failed to load include '{}' referenced from {} (line {})",
                target.display(),
                path.display(),
                line
            )
        })?;
    }
    stack.pop();

    Ok(())
}

/// Load every constraint file referenced by the given manifests.
/// Constraint requirements feed lint cross-checks only, never selection.
pub fn load_constraints(manifests: &[Manifest]) -> Result<Vec<Manifest>> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    for manifest in manifests {
        let base = manifest
            .path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default();
        for (target, line) in manifest.constraints() {
            let full = base.join(target);
            let canonical = full.canonicalize().with_context(|| {
                format!(
                    "failed to resolve constraint file '{}' referenced from {} (line {})",
                    full.display(),
                    manifest
                        .path
                        .as_deref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "<memory>".to_string()),
                    line
                )
            })?;
            if seen.insert(canonical) {
                out.push(Manifest::load(&full)?);
            }
        }
    }
    Ok(out)
}

/// Flatten the requirements of a manifest chain, in load order.
pub fn all_requirements(manifests: &[Manifest]) -> Vec<&Requirement> {
    manifests.iter().flat_map(|m| m.requirements()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_includes_load_depth_first() {
        let dir = tempfile::tempdir().unwrap();
        let root = write(dir.path(), "root.txt", "-r a.txt\nroot-pkg==1.0\n");
        write(dir.path(), "a.txt", "-r b.txt\na-pkg==1.0\n");
        write(dir.path(), "b.txt", "b-pkg==1.0\n");

        let manifests = load_with_includes(&root).unwrap();
        assert_eq!(manifests.len(), 3);
        let names: Vec<String> = all_requirements(&manifests)
            .iter()
            .map(|r| r.name.as_str().to_string())
            .collect();
        assert_eq!(names, vec!["root-pkg", "a-pkg", "b-pkg"]);
    }

    #[test]
    fn test_relative_paths_resolve_from_including_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let root = write(dir.path(), "root.txt", "-r sub/inner.txt\n");
        write(&dir.path().join("sub"), "inner.txt", "inner-pkg==1.0\n");

        let manifests = load_with_includes(&root).unwrap();
        assert_eq!(all_requirements(&manifests).len(), 1);
    }

    #[test]
    fn test_diamond_loads_once() {
        let dir = tempfile::tempdir().unwrap();
        let root = write(dir.path(), "root.txt", "-r a.txt\n-r b.txt\n");
        write(dir.path(), "a.txt", "-r shared.txt\n");
        write(dir.path(), "b.txt", "-r shared.txt\n");
        write(dir.path(), "shared.txt", "shared-pkg==1.0\n");

        let manifests = load_with_includes(&root).unwrap();
        assert_eq!(manifests.len(), 4);
        assert_eq!(all_requirements(&manifests).len(), 1);
    }

    #[test]
    fn test_cycle_is_an_error_naming_the_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let root = write(dir.path(), "a.txt", "-r b.txt\n");
        write(dir.path(), "b.txt", "-r a.txt\n");

        let err = load_with_includes(&root).unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("include cycle detected"), "got: {}", chain);
        assert!(chain.contains("a.txt"));
    }

    #[test]
    fn test_missing_include_names_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = write(dir.path(), "root.txt", "-r missing.txt\n");

        let err = load_with_includes(&root).unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("missing.txt"));
        assert!(chain.contains("root.txt"));
    }

    #[test]
    fn test_constraints_loaded_separately() {
        let dir = tempfile::tempdir().unwrap();
        let root = write(
            dir.path(),
            "root.txt",
            "-c constraints.txt\nPillow==9.5.0\n",
        );
        write(dir.path(), "constraints.txt", "Pillow<10\n");

        let manifests = load_with_includes(&root).unwrap();
        // -c does not add requirements to the chain.
        assert_eq!(all_requirements(&manifests).len(), 1);

        let constraints = load_constraints(&manifests).unwrap();
        assert_eq!(constraints.len(), 1);
        assert_eq!(all_requirements(&constraints).len(), 1);
    }
}
