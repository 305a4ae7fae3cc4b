//! Config management commands: show, path, init.

use crate::cmd::ConfigCommand;
use crate::config::{Config, DEFAULT_CONFIG, resolve_config_path};
use anyhow::{Context, Result, bail};
use std::path::Path;

/// Dispatch config management subcommands.
pub fn run(action: &ConfigCommand, flag: Option<&Path>) -> Result<()> {
    let path = resolve_config_path(flag);
    match action {
        ConfigCommand::Show => show(&path),
        ConfigCommand::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommand::Init { force } => init(&path, *force),
    }
}

fn show(path: &Path) -> Result<()> {
    if !path.exists() {
        println!("No config file at {}", path.display());
        return Ok(());
    }
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Config::from_toml(&contents).with_context(|| format!("validating {}", path.display()))?;
    print!("{contents}");
    Ok(())
}

/// Write the default config to `path`.
pub fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists, pass --force to overwrite", path.display());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
