//! `reqmark add` - append a requirement to the manifest.

use anyhow::{Context, Result};
use std::path::Path;

use reqmark::config::Config;
use reqmark::manifest::Manifest;
use reqmark::requirement::Requirement;
use reqmark::ui::{self, colors};

pub fn cmd_add(line: &str, manifest: Option<&Path>) -> Result<()> {
    let config = Config::load()?;
    let path = super::manifest_path(&config, manifest)?;

    let req = Requirement::parse(line, 0).context("invalid requirement line")?;

    let mut parsed = Manifest::load(&path)?;
    parsed.add(req.clone())?;
    parsed.save(&path)?;

    if !ui::is_quiet() {
        println!(
            "{} added {} to {}",
            colors::success("✓"),
            colors::identifier(req.name.as_str()),
            path.display()
        );
    }
    Ok(())
}
