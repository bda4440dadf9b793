//! Manifest editing round-trips on disk.

use reqmark::manifest::Manifest;
use reqmark::name::PackageName;
use reqmark::requirement::Requirement;
use std::fs;

const FIXTURE: &str = "\
# pinned for reproducible CI runs
Pillow==9.5.0  # keep in sync with docs/install.md
opencv-python==4.7.0.72 ; platform_python_implementation != \"PyPy\"

--index-url https://mirror.example/simple
requests>=2.28
";

#[test]
fn test_edit_cycle_preserves_untouched_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("requirements.txt");
    fs::write(&path, FIXTURE).unwrap();

    let mut manifest = Manifest::load(&path).unwrap();
    manifest
        .add(Requirement::parse("numpy==1.24.2", 0).unwrap())
        .unwrap();
    manifest.save(&path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("# pinned for reproducible CI runs\n"));
    assert!(content.contains("Pillow==9.5.0  # keep in sync with docs/install.md"));
    assert!(content.contains("--index-url https://mirror.example/simple"));
    assert!(content.ends_with("numpy==1.24.2\n"));

    let mut manifest = Manifest::load(&path).unwrap();
    manifest.remove(&PackageName::parse("REQUESTS").unwrap()).unwrap();
    manifest.save(&path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(!content.contains("requests"));
    assert!(content.contains("numpy==1.24.2"));
}

#[test]
fn test_continuation_lines_join() {
    let manifest = Manifest::parse(
        "torch==1.13.1 \\\n    ; \"generic\" not in platform_release\n",
    )
    .unwrap();
    let req = manifest.requirements().next().unwrap();
    assert_eq!(req.name.as_str(), "torch");
    assert!(req.marker.is_some());
    assert_eq!(req.line, 1);
}

#[test]
fn test_hash_inside_marker_string_is_not_a_comment() {
    let manifest =
        Manifest::parse("foo==1.0 ; platform_version != \"#101-Ubuntu SMP\"\n").unwrap();
    let req = manifest.requirements().next().unwrap();
    assert!(req.comment.is_none());
    assert!(req.marker.as_ref().unwrap().to_string().contains("#101"));
}

#[test]
fn test_lenient_parse_collects_issues() {
    let (manifest, issues) = Manifest::parse_lenient(
        "good==1.0\n===broken\nalso-good==2.0\n",
    );
    assert_eq!(manifest.requirements().count(), 2);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].line, 2);
}

#[test]
fn test_strict_parse_reports_line_number() {
    let err = Manifest::parse("good==1.0\n===broken\n").unwrap_err();
    assert!(format!("{:#}", err).contains("line 2"));
}

#[test]
fn test_save_does_not_leave_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("requirements.txt");
    let manifest = Manifest::parse(FIXTURE).unwrap();
    manifest.save(&path).unwrap();

    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}
