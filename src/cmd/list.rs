//! `reqmark list` - list requirements across the include chain.

use anyhow::Result;
use std::path::Path;

use reqmark::config::Config;
use reqmark::formatters;
use reqmark::manifest::Manifest;
use reqmark::requirement::Requirement;
use reqmark::ui::colors;

pub fn cmd_list(
    manifest: Option<&Path>,
    json: bool,
    marked_only: bool,
    name_filter: Option<&str>,
    no_includes: bool,
) -> Result<()> {
    let config = Config::load()?;
    let path = super::manifest_path(&config, manifest)?;
    let chain = if no_includes {
        vec![Manifest::load(&path)?]
    } else {
        super::load_chain(&path)?
    };

    // Filter on the canonical form so `--name py_qt` matches "PyQt5".
    let needle = name_filter.map(|n| n.to_lowercase().replace(['_', '.'], "-"));
    let keep = |req: &&Requirement| {
        (!marked_only || req.marker.is_some())
            && needle
                .as_deref()
                .map_or(true, |n| req.name.canonical().contains(n))
    };

    if json {
        let items: Vec<serde_json::Value> = chain
            .iter()
            .flat_map(|m| {
                let file = m.path.as_ref().map(|p| p.display().to_string());
                m.requirements()
                    .filter(|r| keep(&r))
                    .map(move |req| {
                        serde_json::json!({
                            "name": req.name.as_str(),
                            "canonical": req.name.canonical(),
                            "specifier": req.specifiers.to_string(),
                            "url": req.url.as_ref().map(|u| u.to_string()),
                            "marker": req.marker.as_ref().map(|m| m.to_string()),
                            "line": req.line,
                            "file": file.clone(),
                        })
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    let total: usize = chain
        .iter()
        .map(|m| m.requirements().filter(|r| keep(&r)).count())
        .sum();
    if total == 0 {
        if !reqmark::ui::is_quiet() {
            println!("No requirements in {}", path.display());
        }
        return Ok(());
    }

    if chain.len() == 1 {
        let reqs: Vec<&Requirement> = chain[0].requirements().filter(keep).collect();
        print!("{}", formatters::list_table(&reqs));
        return Ok(());
    }

    // Includes were followed; group rows under their source file.
    let mut first = true;
    for manifest in &chain {
        let reqs: Vec<&Requirement> = manifest.requirements().filter(keep).collect();
        if reqs.is_empty() {
            continue;
        }
        if !first {
            println!();
        }
        first = false;
        if let Some(file) = &manifest.path {
            println!("{}", colors::secondary(&file.display().to_string()));
        }
        print!("{}", formatters::list_table(&reqs));
    }
    Ok(())
}
