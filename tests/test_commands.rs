//! End-to-end tests running the reqmark binary against temp projects.

mod support;

use support::harness::{TestHarness, DEFAULT_MANIFEST};

#[test]
fn test_list_shows_all_requirements() {
    let harness = TestHarness::new();
    let stdout = harness.run_ok(&["list"]);
    assert!(stdout.contains("Pillow"));
    assert!(stdout.contains("opencv-python"));
    assert!(stdout.contains("pywin32"));
    assert!(stdout.contains("sys_platform == \"win32\""));
}

#[test]
fn test_list_json_is_parseable() {
    let harness = TestHarness::new();
    let stdout = harness.run_ok(&["list", "--json"]);
    let items: Vec<serde_json::Value> = serde_json::from_str(&stdout).unwrap();
    assert_eq!(items.len(), 5);
    assert_eq!(items[0]["name"], "Pillow");
    assert_eq!(items[0]["canonical"], "pillow");
    assert_eq!(items[0]["specifier"], "==9.5.0");
}

#[test]
fn test_list_follows_includes() {
    let harness = TestHarness::new();
    harness.write_manifest("root.txt", "-r extra.txt\nroot-pkg==1.0\n");
    harness.write_manifest("extra.txt", "extra-pkg==2.0\n");
    let stdout = harness.run_ok(&["list", "root.txt"]);
    assert!(stdout.contains("root-pkg"));
    assert!(stdout.contains("extra-pkg"));

    let stdout = harness.run_ok(&["list", "root.txt", "--no-includes"]);
    assert!(stdout.contains("root-pkg"));
    assert!(!stdout.contains("extra-pkg"));
}

#[test]
fn test_list_filters() {
    let harness = TestHarness::new();
    let marked = harness.run_ok(&["list", "--marked-only"]);
    assert!(marked.contains("pywin32"));
    assert!(marked.contains("PyQt5"));
    assert!(!marked.contains("Pillow"));

    // The filter canonicalizes, so underscores match dashed names.
    let named = harness.run_ok(&["list", "--name", "opencv_python"]);
    assert!(named.contains("opencv-python"));
    assert!(!named.contains("requests"));
}

#[test]
fn test_show_finds_any_spelling() {
    let harness = TestHarness::new();
    let stdout = harness.run_ok(&["show", "pillow"]);
    assert!(stdout.contains("canonical: pillow"));
    assert!(stdout.contains("==9.5.0"));

    let output = harness.run(&["show", "nonexistent"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_show_json_reports_marker_verdict() {
    let harness = TestHarness::new();
    let stdout = harness.run_ok(&["show", "pywin32", "--json", "--platform", "linux"]);
    let data: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(data["canonical"], "pywin32");
    assert_eq!(data["applies"], false);

    let stdout = harness.run_ok(&["show", "pillow", "--json", "--platform", "linux"]);
    let data: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(data["applies"], true);
    assert!(data["marker"].is_null());
}

#[test]
fn test_missing_manifest_is_an_error() {
    let harness = TestHarness::new();
    let output = harness.run(&["list", "no-such-file.txt"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist"));
}

#[test]
fn test_lint_clean_manifest_exits_zero() {
    let harness = TestHarness::new();
    harness.write_manifest("clean.txt", "pillow==9.5.0\nrequests==2.31.0\n");
    let stdout = harness.run_ok(&["lint", "clean.txt"]);
    assert!(stdout.contains("clean"));
}

#[test]
fn test_lint_duplicate_exits_one() {
    let harness = TestHarness::new();
    harness.write_manifest("dup.txt", "foo==1.0\nFoo==2.0\n");
    let output = harness.run(&["lint", "dup.txt"]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("duplicate"));
}

#[test]
fn test_lint_warnings_alone_exit_zero() {
    let harness = TestHarness::new();
    // requests>=2.28 in the default manifest is unpinned: a warning.
    let stdout = harness.run_ok(&["lint"]);
    assert!(stdout.contains("unpinned"));
}

#[test]
fn test_lint_json_format() {
    let harness = TestHarness::new();
    harness.write_manifest("dup.txt", "foo==1.0\nfoo==2.0\n");
    let output = harness.run(&["lint", "dup.txt", "--format", "json"]);
    assert_eq!(output.status.code(), Some(1));
    let items: Vec<serde_json::Value> =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["findings"][0]["code"], "duplicate");
    assert_eq!(items[0]["findings"][0]["severity"], "error");
}

#[test]
fn test_lint_missing_include() {
    let harness = TestHarness::new();
    harness.write_manifest("root.txt", "-r gone.txt\nfoo==1.0\n");
    let output = harness.run(&["lint", "root.txt"]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("missing-include"));

    // Standalone mode ignores the include chain entirely.
    harness.run_ok(&["lint", "root.txt", "--no-includes"]);
}

#[test]
fn test_lint_constraint_conflict() {
    let harness = TestHarness::new();
    harness.write_manifest("root.txt", "-c constraints.txt\npillow==9.5.0\n");
    harness.write_manifest("constraints.txt", "pillow<9.0\n");
    let output = harness.run(&["lint", "root.txt"]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("constraint-conflict"));
}

#[test]
fn test_lint_glob_pattern() {
    let harness = TestHarness::new();
    harness.write_manifest("req-a.txt", "foo==1.0\n");
    harness.write_manifest("req-b.txt", "bar==1.0\nbar==2.0\n");
    let output = harness.run(&["lint", "req-*.txt"]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("req-b.txt"));
}

#[test]
fn test_fmt_check_and_write() {
    let harness = TestHarness::new();
    harness.write_manifest("messy.txt", "Pillow == 9.5.0;sys_platform!='win32'\n");

    let output = harness.run(&["fmt", "messy.txt", "--check"]);
    assert_eq!(output.status.code(), Some(1));

    harness.run_ok(&["fmt", "messy.txt", "--write"]);
    let content = harness.read("messy.txt");
    assert_eq!(content, "Pillow==9.5.0 ; sys_platform != \"win32\"\n");

    // Now idempotent.
    harness.run_ok(&["fmt", "messy.txt", "--check"]);
}

#[test]
fn test_fmt_preserves_comments_and_directives() {
    let harness = TestHarness::new();
    harness.write_manifest("m.txt", "# header\n-r other.txt\nfoo ==1.0\n");
    harness.write_manifest("other.txt", "");
    harness.run_ok(&["fmt", "m.txt", "--write"]);
    let content = harness.read("m.txt");
    assert!(content.starts_with("# header\n-r other.txt\n"));
    assert!(content.contains("foo==1.0"));
}

#[test]
fn test_add_appends_and_rejects_duplicates() {
    let harness = TestHarness::new();
    harness.run_ok(&["add", "numpy==1.24.2"]);
    let content = harness.read("requirements.txt");
    assert!(content.ends_with("numpy==1.24.2\n"));
    // The rest of the file is untouched.
    assert!(content.starts_with("# imaging\n"));

    let output = harness.run(&["add", "NumPy==1.26.0"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("already present"));
}

#[test]
fn test_add_rejects_malformed_line() {
    let harness = TestHarness::new();
    let output = harness.run(&["add", "===what"]);
    assert!(!output.status.success());
    assert_eq!(harness.read("requirements.txt"), DEFAULT_MANIFEST);
}

#[test]
fn test_remove_requires_yes_when_not_interactive() {
    let harness = TestHarness::new();
    let output = harness.run(&["remove", "pillow"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--yes"));
    assert!(harness.read("requirements.txt").contains("Pillow"));
}

#[test]
fn test_remove_with_yes() {
    let harness = TestHarness::new();
    harness.run_ok(&["remove", "PILLOW", "--yes"]);
    let content = harness.read("requirements.txt");
    assert!(!content.contains("Pillow"));
    assert!(content.contains("opencv-python"));

    let output = harness.run(&["remove", "pillow", "--yes"]);
    assert!(!output.status.success());
}

#[test]
fn test_eval_freeze_per_platform() {
    let harness = TestHarness::new();
    let linux = harness.run_ok(&["eval", "--platform", "linux", "--freeze"]);
    assert!(linux.contains("pyqt5==5.15.9"));
    assert!(!linux.contains("pywin32"));

    let windows = harness.run_ok(&["eval", "--platform", "windows", "--freeze"]);
    assert!(windows.contains("pywin32==306"));
    assert!(!windows.contains("pyqt5"));
    // Unpinned entries keep their specifier.
    assert!(windows.contains("requests>=2.28"));
}

#[test]
fn test_eval_report_shows_exclusions() {
    let harness = TestHarness::new();
    let stdout = harness.run_ok(&["eval", "--platform", "linux"]);
    assert!(stdout.contains("4 included, 1 excluded"));
    assert!(stdout.contains("excluded by: sys_platform == \"win32\""));
}

#[test]
fn test_eval_json_report() {
    let harness = TestHarness::new();
    let stdout = harness.run_ok(&["eval", "--platform", "linux", "--json"]);
    let data: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(data["environment"], "linux");
    assert_eq!(data["included"].as_array().unwrap().len(), 4);
    assert_eq!(data["excluded"][0]["name"], "pywin32");
}

#[test]
fn test_eval_output_writes_header() {
    let harness = TestHarness::new();
    harness.run_ok(&[
        "eval",
        "--platform",
        "macos",
        "--output",
        "frozen.txt",
    ]);
    let content = harness.read("frozen.txt");
    assert!(content.starts_with("# Generated by reqmark on "));
    assert!(content.contains("(macos)"));
    assert!(content.contains("pillow==9.5.0"));
}

#[test]
fn test_eval_set_overrides() {
    let harness = TestHarness::new();
    harness.write_manifest(
        "kernels.txt",
        "torch==1.13.1 ; \"generic\" not in platform_release\n",
    );
    let stdout = harness.run_ok(&[
        "eval",
        "kernels.txt",
        "--platform",
        "linux",
        "--set",
        "platform_release=5.15.0-1031-aws",
        "--freeze",
    ]);
    assert!(stdout.contains("torch==1.13.1"));

    let stdout = harness.run_ok(&["eval", "kernels.txt", "--platform", "linux", "--freeze"]);
    // The linux preset release contains "generic".
    assert!(!stdout.contains("torch"));
}

#[test]
fn test_eval_python_version_gate() {
    let harness = TestHarness::new();
    harness.write_manifest("py.txt", "tomli==2.0.1 ; python_version < \"3.11\"\n");
    let new = harness.run_ok(&["eval", "py.txt", "--platform", "linux", "--freeze"]);
    assert!(!new.contains("tomli"));

    let old = harness.run_ok(&[
        "eval", "py.txt", "--platform", "linux", "--python", "3.10", "--freeze",
    ]);
    assert!(old.contains("tomli==2.0.1"));
}

#[test]
fn test_explain_prints_verdict_tree() {
    let harness = TestHarness::new();
    let stdout = harness.run_ok(&["explain", "pyqt5", "--platform", "windows"]);
    assert!(stdout.contains("sys_platform != \"win32\""));
    assert!(stdout.contains("false"));
    assert!(stdout.contains("sys_platform = \"win32\""));

    let stdout = harness.run_ok(&["explain", "pillow", "--platform", "linux"]);
    assert!(stdout.contains("always applies"));
}

#[test]
fn test_stats_json() {
    let harness = TestHarness::new();
    let stdout = harness.run_ok(&["stats", "--json"]);
    let data: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(data["total"], 5);
    assert_eq!(data["pinned"], 4);
    assert_eq!(data["marked"], 3);
    assert_eq!(data["comments"], 1);
}

#[test]
fn test_config_validate() {
    let harness = TestHarness::new();
    harness.run_ok(&["config", "--validate"]);

    harness.write_config("env:\n  sys_platfrom: linux\n");
    let output = harness.run(&["config", "--validate"]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sys_platfrom"));
}

#[test]
fn test_project_config_sets_default_manifest() {
    let harness = TestHarness::new();
    harness.write_manifest("deps/base.txt", "base-pkg==1.0\n");
    harness.write_config("manifest: deps/base.txt\n");
    let stdout = harness.run_ok(&["list"]);
    assert!(stdout.contains("base-pkg"));
}

#[test]
fn test_profile_from_config() {
    let harness = TestHarness::new();
    harness.write_config(
        "profiles:\n  winci:\n    sys_platform: win32\n    os_name: nt\n",
    );
    let stdout = harness.run_ok(&["eval", "--profile", "winci", "--freeze"]);
    assert!(stdout.contains("pywin32==306"));
    assert!(!stdout.contains("pyqt5"));

    let output = harness.run(&["eval", "--profile", "nope"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown profile"));
}

#[test]
fn test_version_command() {
    let harness = TestHarness::new();
    let stdout = harness.run_ok(&["version"]);
    assert!(stdout.starts_with("reqmark "));

    let verbose = harness.run_ok(&["version", "--verbose"]);
    assert!(verbose.contains("commit:"));
    assert!(verbose.contains("built:"));
}

#[test]
fn test_completion_generates_script() {
    let harness = TestHarness::new();
    let stdout = harness.run_ok(&["completion", "bash"]);
    assert!(stdout.contains("reqmark"));
}
