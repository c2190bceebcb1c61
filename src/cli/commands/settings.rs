//! Server connection and configuration commands.

use tokio::runtime::Runtime;

use super::controller;
use crate::config::{self, Config};
use crate::error::ResultExt;

/// Connect the service to a media server
pub fn cmd_connect(rt: &Runtime, config: &Config, media_url: &str, token: &str) -> anyhow::Result<()> {
    let controller = controller(config);
    rt.block_on(controller.connect(media_url, token))
        .with_context(format!("Failed to connect {} to {}", config.server.url, media_url))?;
    Ok(())
}

/// Print the effective configuration, optionally saving it
pub fn cmd_config(config: &Config, save: bool) -> anyhow::Result<()> {
    match config::config_path() {
        Some(path) => println!("# {}", path.display()),
        None => println!("# (no config directory available)"),
    }
    print!("{}", toml::to_string_pretty(config)?);

    if save {
        let path = config::save(config)?;
        println!("Saved to {}", path.display());
    }
    Ok(())
}
