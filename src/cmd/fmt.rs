//! `reqmark fmt` - normalize manifest formatting.
//!
//! Requirement lines re-render normalized (canonical spacing, double
//! quotes in markers); comments, blanks, and directives are untouched.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use reqmark::config::Config;
use reqmark::manifest::Manifest;
use reqmark::ui::{self, colors};

/// Returns false when `--check` found the file not normalized.
pub fn cmd_fmt(manifest: Option<&Path>, write: bool, check: bool) -> Result<bool> {
    let config = Config::load()?;
    let path = super::manifest_path(&config, manifest)?;

    let original = fs::read_to_string(&path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    let parsed = Manifest::parse(&original)
        .with_context(|| format!("failed to parse manifest {}", path.display()))?;
    let rendered = parsed.render();

    if check {
        if rendered == original {
            if !ui::is_quiet() {
                println!("{} {} is formatted", colors::success("✓"), path.display());
            }
            return Ok(true);
        }
        println!(
            "{} {} would be reformatted ({} line(s) differ)",
            colors::warning("⚠"),
            path.display(),
            differing_lines(&original, &rendered)
        );
        return Ok(false);
    }

    if write {
        if rendered != original {
            parsed.save(&path)?;
            if !ui::is_quiet() {
                println!("{} reformatted {}", colors::success("✓"), path.display());
            }
        } else if !ui::is_quiet() {
            println!("{} {} already formatted", colors::success("✓"), path.display());
        }
        return Ok(true);
    }

    print!("{}", rendered);
    Ok(true)
}

fn differing_lines(before: &str, after: &str) -> usize {
    let before: Vec<&str> = before.lines().collect();
    let after: Vec<&str> = after.lines().collect();
    let shared = before.len().min(after.len());
    let changed = (0..shared).filter(|&i| before[i] != after[i]).count();
    changed + before.len().max(after.len()) - shared
}
