use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Tool-level configuration. Values come from the config file (explicit
/// `--config`, or `$HOME/.schema-tool.toml` when present) with `SCHEMA_*`
/// environment variables layered on top.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Port the control-plane server listens on (0 picks a free port).
    pub server_port: Option<u16>,
}

pub fn load(path: Option<&Path>) -> Result<Config> {
    let resolved: Option<PathBuf> = match path {
        Some(explicit) => Some(explicit.to_path_buf()),
        None => dirs::home_dir()
            .map(|home| home.join(".schema-tool.toml"))
            .filter(|candidate| candidate.exists()),
    };

    let mut config = match &resolved {
        Some(file) => {
            let raw = fs::read_to_string(file)
                .with_context(|| format!("failed to read config file '{}'", file.display()))?;
            let parsed: Config = toml::from_str(&raw)
                .with_context(|| format!("invalid config file '{}'", file.display()))?;
            log::debug!("Using config file: {}", file.display());
            parsed
        }
        None => Config::default(),
    };

    if let Ok(port) = env::var("SCHEMA_SERVER_PORT") {
        config.server_port = Some(
            port.parse()
                .context("SCHEMA_SERVER_PORT must be a port number")?,
        );
    }

    Ok(config)
}
