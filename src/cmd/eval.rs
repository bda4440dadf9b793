//! `reqmark eval` - resolve markers against a target environment.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use reqmark::config::Config;
use reqmark::formatters;
use reqmark::manifest::resolve;
use reqmark::selection::{self, freeze, freeze_with_header};
use reqmark::ui::colors;

use crate::cli::EnvArgs;

pub fn cmd_eval(
    manifest: Option<&Path>,
    env_args: &EnvArgs,
    freeze_flag: bool,
    json: bool,
    output: Option<&Path>,
) -> Result<()> {
    let config = Config::load()?;
    let path = super::manifest_path(&config, manifest)?;
    let chain = super::load_chain(&path)?;
    let env = super::build_environment(&config, env_args)?;

    let reqs = resolve::all_requirements(&chain);
    let selection = selection::select(&reqs, &env);

    if let Some(output) = output {
        let content = freeze_with_header(&selection, env.label());
        write_atomic(output, &content)?;
        if !reqmark::ui::is_quiet() {
            println!(
                "{} wrote {} requirement(s) to {}",
                colors::success("✓"),
                selection.included.len(),
                output.display()
            );
        }
        return Ok(());
    }

    if freeze_flag {
        print!("{}", freeze(&selection));
        return Ok(());
    }

    if json {
        let value = serde_json::json!({
            "environment": env.label(),
            "included": selection
                .included
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "name": r.name.canonical(),
                        "specifier": r.specifiers.to_string(),
                        "marker": r.marker.as_ref().map(|m| m.to_string()),
                    })
                })
                .collect::<Vec<_>>(),
            "excluded": selection
                .excluded
                .iter()
                .map(|(r, marker)| {
                    serde_json::json!({
                        "name": r.name.canonical(),
                        "marker": marker,
                    })
                })
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    print!("{}", formatters::eval_report(&selection, &env));
    Ok(())
}

/// Write via temp file and rename, same pattern as manifest saves.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = match dir {
        Some(dir) => tempfile::NamedTempFile::new_in(dir),
        None => tempfile::NamedTempFile::new_in("."),
    }
    .with_context(|| format!("failed to create temp file next to {}", path.display()))?;
    tmp.write_all(content.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;
    tmp.persist(path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}
