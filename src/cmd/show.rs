//! `reqmark show` - one requirement in detail.

use anyhow::{bail, Result};
use std::path::Path;

use reqmark::config::Config;
use reqmark::formatters;
use reqmark::name::PackageName;

use crate::cli::EnvArgs;

pub fn cmd_show(
    name: &str,
    manifest: Option<&Path>,
    json: bool,
    env_args: &EnvArgs,
) -> Result<()> {
    let config = Config::load()?;
    let path = super::manifest_path(&config, manifest)?;
    let chain = super::load_chain(&path)?;
    let env = super::build_environment(&config, env_args)?;

    let wanted = PackageName::parse(name)?;
    let Some(req) = chain.iter().find_map(|m| m.find(&wanted)) else {
        bail!("package '{}' not found in {}", name, path.display());
    };

    if json {
        let applies = req.marker.as_ref().map_or(true, |m| m.evaluate(&env));
        let value = serde_json::json!({
            "name": req.name.as_str(),
            "canonical": req.name.canonical(),
            "extras": &req.extras,
            "specifier": req.specifiers.to_string(),
            "url": req.url.as_ref().map(|u| u.to_string()),
            "marker": req.marker.as_ref().map(|m| m.to_string()),
            "comment": &req.comment,
            "line": req.line,
            "environment": env.label(),
            "applies": applies,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    print!("{}", formatters::show_requirement(req, &env));
    Ok(())
}
