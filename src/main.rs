//! CLI entry point and command dispatch for reqmark.

mod cli;
mod cmd;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.quiet {
        // Handlers and the library check REQMARK_QUIET so the flag does
        // not have to thread through every call.
        std::env::set_var("REQMARK_QUIET", "1");
    }

    match cli.command {
        Commands::List {
            manifest,
            json,
            marked_only,
            name,
            no_includes,
        } => cmd::list::cmd_list(
            manifest.as_deref(),
            json,
            marked_only,
            name.as_deref(),
            no_includes,
        ),
        Commands::Show {
            name,
            manifest,
            json,
            env,
        } => cmd::show::cmd_show(&name, manifest.as_deref(), json, &env),
        Commands::Lint {
            paths,
            format,
            no_includes,
        } => {
            let clean = cmd::lint::cmd_lint(&paths, &format, no_includes)?;
            if !clean {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Eval {
            manifest,
            env,
            freeze,
            json,
            output,
        } => cmd::eval::cmd_eval(manifest.as_deref(), &env, freeze, json, output.as_deref()),
        Commands::Explain {
            name,
            manifest,
            env,
        } => cmd::explain::cmd_explain(&name, manifest.as_deref(), &env),
        Commands::Fmt {
            manifest,
            write,
            check,
        } => {
            let formatted = cmd::fmt::cmd_fmt(manifest.as_deref(), write, check)?;
            if !formatted {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Add { line, manifest } => cmd::add::cmd_add(&line, manifest.as_deref()),
        Commands::Remove {
            name,
            manifest,
            yes,
        } => cmd::remove::cmd_remove(&name, manifest.as_deref(), yes),
        Commands::Outdated {
            manifest,
            index_url,
            json,
        } => cmd::outdated::cmd_outdated(manifest.as_deref(), index_url.as_deref(), json),
        Commands::Stats { manifest, json } => cmd::stats::cmd_stats(manifest.as_deref(), json),
        Commands::Config { validate } => {
            let valid = cmd::config::cmd_config(validate)?;
            if !valid {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Completion { shell } => cmd::util::cmd_completion(shell),
        Commands::Man { out_dir } => cmd::util::cmd_man(out_dir.as_ref()),
        Commands::Version { verbose } => cmd::util::cmd_version(verbose),
    }
}
