//! `reqmark stats` - manifest statistics.

use anyhow::Result;
use std::path::Path;

use reqmark::config::Config;
use reqmark::formatters;
use reqmark::stats::aggregate;

pub fn cmd_stats(manifest: Option<&Path>, json: bool) -> Result<()> {
    let config = Config::load()?;
    let path = super::manifest_path(&config, manifest)?;
    let chain = super::load_chain(&path)?;

    let data = aggregate(&chain);
    if json {
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        print!("{}", formatters::stats_text(&data));
    }
    Ok(())
}
