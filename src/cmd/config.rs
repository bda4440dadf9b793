//! `reqmark config` - show or validate the merged configuration.

use anyhow::Result;

use reqmark::config::{validate, Config};
use reqmark::ui::colors;

/// Returns false when `--validate` found issues.
pub fn cmd_config(do_validate: bool) -> Result<bool> {
    let config = Config::load()?;

    if do_validate {
        let issues = validate(&config);
        if issues.is_empty() {
            println!("{} configuration is valid", colors::success("✓"));
            return Ok(true);
        }
        for issue in &issues {
            println!("{} {}", colors::error("✗"), issue);
        }
        return Ok(false);
    }

    println!("{}", colors::heading("Merged configuration"));
    println!("  manifest:       {}", config.manifest.display());
    println!("  python_version: {}", config.python_version);
    println!("  index_url:      {}", config.index_url);
    if !config.env.is_empty() {
        println!("  env:");
        for (key, value) in &config.env {
            println!("    {} = {}", key, value);
        }
    }
    if !config.profiles.is_empty() {
        println!(
            "  profiles:       {}",
            config
                .profiles
                .keys()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    println!(
        "  lint:           require_pins={} canonical_names={}",
        config.lint.require_pins, config.lint.canonical_names
    );
    Ok(true)
}
