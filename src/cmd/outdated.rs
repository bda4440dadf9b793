//! `reqmark outdated` - compare pins against the package index.

use anyhow::Result;
use std::path::Path;

use reqmark::config::Config;
use reqmark::formatters::{self, OutdatedRow, OutdatedStatus};
use reqmark::index::IndexClient;
use reqmark::manifest::resolve;
use reqmark::ui::{self, colors};

pub fn cmd_outdated(manifest: Option<&Path>, index_url: Option<&str>, json: bool) -> Result<()> {
    let config = Config::load()?;
    let path = super::manifest_path(&config, manifest)?;
    let chain = super::load_chain(&path)?;

    let client = IndexClient::new(index_url.unwrap_or(&config.index_url))?;

    let mut rows = Vec::new();
    let mut skipped = 0;
    for req in resolve::all_requirements(&chain) {
        let Some(pin) = req.specifiers.exact_pin() else {
            skipped += 1;
            continue;
        };
        // One failed lookup should not kill the whole report.
        let status = match client.latest_version(&req.name) {
            Ok(latest) if latest > *pin => OutdatedStatus::Behind(latest),
            Ok(_) => OutdatedStatus::UpToDate,
            Err(e) => OutdatedStatus::LookupFailed(format!("{:#}", e)),
        };
        rows.push(OutdatedRow {
            name: req.name.canonical(),
            pinned: pin.clone(),
            status,
        });
    }

    if json {
        let packages: Vec<serde_json::Value> = rows
            .iter()
            .map(|row| {
                let (status, latest, error) = match &row.status {
                    OutdatedStatus::UpToDate => ("up-to-date", None, None),
                    OutdatedStatus::Behind(latest) => ("behind", Some(latest.to_string()), None),
                    OutdatedStatus::LookupFailed(msg) => {
                        ("lookup-failed", None, Some(msg.clone()))
                    }
                };
                serde_json::json!({
                    "name": row.name,
                    "pinned": row.pinned.to_string(),
                    "status": status,
                    "latest": latest,
                    "error": error,
                })
            })
            .collect();
        let value = serde_json::json!({
            "packages": packages,
            "skipped_unpinned": skipped,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    print!("{}", formatters::outdated_table(&rows));
    if skipped > 0 && !ui::is_quiet() {
        println!(
            "{}",
            colors::secondary(&format!("{} unpinned requirement(s) skipped", skipped))
        );
    }
    Ok(())
}
