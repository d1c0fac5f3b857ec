//! Configuration loading
//!
//! Handles loading configuration from embedded defaults, files, and environment.

use super::config::AppConfig;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Load configuration from `./config` and the environment
pub fn load_config() -> Result<AppConfig> {
    let env = std::env::var("PARLEY_ENV").unwrap_or_else(|_| "development".to_string());
    load_config_from(Path::new("config"), &env)
}

/// Load configuration with override files taken from `dir`
///
/// Later sources win: embedded defaults, `<dir>/default`, `<dir>/<env>`,
/// `<dir>/local`, then `PARLEY_*` variables.
pub fn load_config_from(dir: &Path, env: &str) -> Result<AppConfig> {
    let config = Config::builder()
        // 1. Embedded defaults (always available)
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        // 2. External overrides (optional)
        .add_source(File::from(dir.join("default")).required(false))
        .add_source(File::from(dir.join(env)).required(false))
        .add_source(File::from(dir.join("local")).required(false))
        // 3. Environment variables (highest priority)
        // prefix_separator("_") keeps PARLEY_CACHE__BACKEND working with a single
        // underscore after the prefix.
        .add_source(
            Environment::with_prefix("PARLEY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let app: AppConfig = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;
    app.validate().context("Invalid configuration")?;
    Ok(app)
}
