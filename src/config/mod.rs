mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./hlsclip.toml",
        "./config.toml",
        "~/.config/hlsclip/config.toml",
        "/etc/hlsclip/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.dispatch.concurrency == 0 {
        anyhow::bail!("Dispatch concurrency must be at least 1");
    }

    if config.cache.max_entries == 0 {
        anyhow::bail!("Cache max_entries must be at least 1");
    }

    if !(config.thumbnails.duration_secs.is_finite() && config.thumbnails.duration_secs > 0.0) {
        anyhow::bail!(
            "Thumbnail duration must be positive, got {}",
            config.thumbnails.duration_secs
        );
    }

    for (name, options) in &config.variants {
        if options.trim().is_empty() {
            anyhow::bail!("Variant '{}' has empty encoder options", name);
        }
    }

    if config.templates.master.is_none() {
        tracing::warn!("No master template configured; playlist and job endpoints will fail");
    }
    if config.templates.media.is_none() {
        tracing::warn!("No media template configured; playlist and job endpoints will fail");
    }

    if config.storage.public_prefix.is_empty() {
        tracing::warn!("storage.public_prefix is empty; playlists will carry bare keys");
    }

    Ok(())
}
