//! `reqmark remove` - drop a requirement from the manifest.

use anyhow::{bail, Result};
use dialoguer::Confirm;
use std::path::Path;

use reqmark::config::Config;
use reqmark::manifest::Manifest;
use reqmark::name::PackageName;
use reqmark::ui::{self, colors};

pub fn cmd_remove(name: &str, manifest: Option<&Path>, yes: bool) -> Result<()> {
    let config = Config::load()?;
    let path = super::manifest_path(&config, manifest)?;

    let wanted = PackageName::parse(name)?;
    let mut parsed = Manifest::load(&path)?;
    let Some(existing) = parsed.find(&wanted) else {
        bail!("package '{}' not found in {}", name, path.display());
    };

    if !yes {
        if !atty::is(atty::Stream::Stdin) {
            bail!("refusing to remove without confirmation; pass --yes");
        }
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove '{}' from {}?", existing, path.display()))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Aborted");
            return Ok(());
        }
    }

    let removed = parsed
        .remove(&wanted)
        .unwrap_or_else(|| unreachable!("find() succeeded above"));
    parsed.save(&path)?;

    if !ui::is_quiet() {
        println!(
            "{} removed {} from {}",
            colors::success("✓"),
            colors::identifier(removed.name.as_str()),
            path.display()
        );
    }
    Ok(())
}
