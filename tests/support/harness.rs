use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// TestHarness provides an isolated project directory with a manifest
/// and optional config, plus a runner for the reqmark binary.
///
/// HOME is pointed at the temp dir so a developer's real global config
/// can never leak into a test.
pub struct TestHarness {
    pub dir: TempDir,
    #[allow(dead_code)]
    pub binary: PathBuf,
}

/// A small but representative manifest: pins, a marker per platform,
/// a comment, and an unpinned entry.
pub const DEFAULT_MANIFEST: &str = "\
# imaging
Pillow==9.5.0
opencv-python==4.7.0.72 ; platform_python_implementation != \"PyPy\"
PyQt5==5.15.9 ; sys_platform != \"win32\"
pywin32==306 ; sys_platform == \"win32\"
requests>=2.28
";

impl TestHarness {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let harness = TestHarness {
            dir,
            binary: PathBuf::from(env!("CARGO_BIN_EXE_reqmark")),
        };
        harness.write_manifest("requirements.txt", DEFAULT_MANIFEST);
        harness
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_manifest(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create manifest dir");
        }
        fs::write(&path, content).expect("Failed to write manifest");
        path
    }

    #[allow(dead_code)]
    pub fn write_config(&self, content: &str) {
        fs::write(self.dir.path().join(".reqmark.yaml"), content)
            .expect("Failed to write config");
    }

    #[allow(dead_code)]
    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// Run the reqmark binary in the harness directory.
    #[allow(dead_code)]
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(&self.binary)
            .args(args)
            .current_dir(self.path())
            .env("HOME", self.path())
            .env("NO_COLOR", "1")
            .output()
            .expect("Failed to run reqmark")
    }

    /// Run and assert success, returning stdout.
    #[allow(dead_code)]
    pub fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "reqmark {:?} failed:\nstdout: {}\nstderr: {}",
            args,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }
}
