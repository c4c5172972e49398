//! Configuration commands

use anyhow::{Result, bail};
use claimcheck_core::Config;
use tracing::info;

use super::Context;

/// Print the effective configuration and its source
pub fn cmd_config_show(ctx: &Context) -> Result<()> {
  let project_config = Config::project_config_path(&ctx.cwd);
  let user_config = Config::user_config_path();

  println!("Effective configuration for: {}", ctx.cwd.display());
  println!();

  if project_config.exists() {
    println!("Using project config: {}", project_config.display());
  } else if let Some(user_path) = user_config.filter(|p| p.exists()) {
    println!("Using user config: {}", user_path.display());
  } else {
    println!("Using default configuration (no config file found)");
  }
  println!();

  println!("{}", toml::to_string_pretty(&ctx.config)?);
  Ok(())
}

/// Write a default project config file
pub fn cmd_config_init(force: bool) -> Result<()> {
  let cwd = std::env::current_dir()?;
  let config_path = Config::project_config_path(&cwd);

  if config_path.exists() && !force {
    bail!(
      "Config file already exists: {} (use --force to overwrite)",
      config_path.display()
    );
  }

  std::fs::write(&config_path, Config::generate_template())?;
  info!(path = %config_path.display(), "Wrote config template");

  println!("Created project config: {}", config_path.display());
  println!("Edit the file to customize settings.");
  Ok(())
}
