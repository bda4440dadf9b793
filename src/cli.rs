//! CLI argument definitions for reqmark.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reqmark")]
#[command(version)]
#[command(about = "Inspect, validate, and evaluate requirements manifests", long_about = None)]
#[command(
    after_help = "GETTING STARTED:\n    reqmark list                List the requirements in requirements.txt\n    reqmark lint                Check for duplicates, conflicts, and unpinned packages\n    reqmark eval --platform linux --freeze\n                                Resolve markers for a target platform"
)]
pub struct Cli {
    /// Suppress all non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Target-environment flags shared by the marker-evaluating commands.
#[derive(Args, Debug, Default)]
pub struct EnvArgs {
    /// Evaluate against a platform preset (linux, macos, windows) instead
    /// of the host
    #[arg(long, value_name = "PLATFORM")]
    pub platform: Option<String>,

    /// Apply a named profile from the config `profiles:` table
    #[arg(long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Assume this Python version (X.Y or X.Y.Z)
    #[arg(long, value_name = "VERSION")]
    pub python: Option<String>,

    /// Override one marker variable (can be specified multiple times)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Evaluate with this extra enabled (the `extra` marker variable)
    #[arg(long, value_name = "NAME")]
    pub extra: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List requirements, following -r includes
    List {
        /// Manifest path (default: from config, else requirements.txt)
        manifest: Option<PathBuf>,
        /// JSON output
        #[arg(long)]
        json: bool,
        /// Only requirements with an environment marker
        #[arg(long)]
        marked_only: bool,
        /// Only names containing this substring (canonicalized)
        #[arg(long, value_name = "SUBSTR")]
        name: Option<String>,
        /// Do not follow -r includes
        #[arg(long)]
        no_includes: bool,
    },
    /// Show one requirement in detail
    Show {
        /// Package name (any equivalent spelling)
        name: String,
        /// Manifest path (default: from config, else requirements.txt)
        manifest: Option<PathBuf>,
        /// JSON output
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        env: EnvArgs,
    },
    /// Check manifests for duplicates, conflicts, and unpinned packages
    Lint {
        /// Manifest paths or glob patterns (default: the configured manifest)
        #[arg(value_name = "PATH")]
        paths: Vec<String>,
        /// Output format (text or json)
        #[arg(short, long, default_value = "text")]
        format: String,
        /// Do not follow -r includes or cross-check -c constraints
        #[arg(long)]
        no_includes: bool,
    },
    /// Evaluate markers against a target environment
    Eval {
        /// Manifest path (default: from config, else requirements.txt)
        manifest: Option<PathBuf>,
        #[command(flatten)]
        env: EnvArgs,
        /// Print installable name==version lines instead of a report
        #[arg(long)]
        freeze: bool,
        /// JSON report
        #[arg(long, conflicts_with = "freeze")]
        json: bool,
        /// Write the frozen output to a file (implies --freeze)
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Explain a requirement's marker verdict step by step
    Explain {
        /// Package name (any equivalent spelling)
        name: String,
        /// Manifest path (default: from config, else requirements.txt)
        manifest: Option<PathBuf>,
        #[command(flatten)]
        env: EnvArgs,
    },
    /// Normalize manifest formatting
    Fmt {
        /// Manifest path (default: from config, else requirements.txt)
        manifest: Option<PathBuf>,
        /// Rewrite the file in place instead of printing
        #[arg(long)]
        write: bool,
        /// Exit 1 if the file is not already normalized
        #[arg(long, conflicts_with = "write")]
        check: bool,
    },
    /// Add a requirement line to the manifest
    Add {
        /// The requirement, e.g. 'Pillow==9.5.0 ; sys_platform != "win32"'
        line: String,
        /// Manifest path (default: from config, else requirements.txt)
        manifest: Option<PathBuf>,
    },
    /// Remove a requirement from the manifest
    Remove {
        /// Package name (any equivalent spelling)
        name: String,
        /// Manifest path (default: from config, else requirements.txt)
        manifest: Option<PathBuf>,
        /// Skip confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Compare pinned versions against the package index
    Outdated {
        /// Manifest path (default: from config, else requirements.txt)
        manifest: Option<PathBuf>,
        /// Index endpoint (default: from config, else pypi.org)
        #[arg(long, value_name = "URL")]
        index_url: Option<String>,
        /// JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show manifest statistics
    Stats {
        /// Manifest path (default: from config, else requirements.txt)
        manifest: Option<PathBuf>,
        /// JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show or validate configuration
    Config {
        /// Validate the merged config (env keys, python_version, index_url)
        #[arg(long)]
        validate: bool,
    },
    /// Generate shell completion script
    Completion {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Generate man page
    #[command(hide = true)]
    Man {
        /// Output directory for the man page (defaults to current directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Show version information
    Version {
        /// Show additional build information
        #[arg(long, short)]
        verbose: bool,
    },
}
