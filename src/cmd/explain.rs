//! `reqmark explain` - step-by-step marker verdicts.

use anyhow::{bail, Result};
use std::path::Path;

use reqmark::config::Config;
use reqmark::formatters;
use reqmark::name::PackageName;
use reqmark::ui::colors;

use crate::cli::EnvArgs;

pub fn cmd_explain(name: &str, manifest: Option<&Path>, env_args: &EnvArgs) -> Result<()> {
    let config = Config::load()?;
    let path = super::manifest_path(&config, manifest)?;
    let chain = super::load_chain(&path)?;
    let env = super::build_environment(&config, env_args)?;

    let wanted = PackageName::parse(name)?;
    let Some(req) = chain.iter().find_map(|m| m.find(&wanted)) else {
        bail!("package '{}' not found in {}", name, path.display());
    };

    println!("{}", colors::heading(&req.to_string()));
    println!("environment: {}", env.label());

    let Some(marker) = &req.marker else {
        println!(
            "{} no marker; always applies",
            colors::success("✓")
        );
        return Ok(());
    };

    print!("{}", formatters::explanation_tree(&marker.explain(&env)));
    Ok(())
}
