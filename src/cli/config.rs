//! `parley config` - show the effective configuration

use crate::app::{self, AppConfig};
use anyhow::{Context, Result};
use parley_llm::util::mask_api_key;

/// Run `parley config`
pub fn run() -> Result<()> {
    let config = app::load_config()?;
    println!("{}", render(&config, std::env::var(&config.llm.api_key_env).ok())?);
    Ok(())
}

/// Pretty JSON of the configuration followed by the masked key status
fn render(config: &AppConfig, api_key: Option<String>) -> Result<String> {
    let body = serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;
    let key = match api_key.filter(|k| !k.trim().is_empty()) {
        Some(key) => mask_api_key(&key),
        None => "(not set)".to_string(),
    };
    Ok(format!("{body}\n\n{} = {key}", config.llm.api_key_env))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_masks_key() {
        let config = AppConfig::default();
        let out = render(&config, Some("sk-ant-1234567890abcdef".to_string())).unwrap();

        assert!(out.contains("ANTHROPIC_API_KEY = sk-a...cdef"));
        assert!(!out.contains("1234567890"));
        assert!(out.contains("\"max_iterations\": 5"));
    }

    #[test]
    fn test_render_without_key() {
        let out = render(&AppConfig::default(), None).unwrap();
        assert!(out.ends_with("ANTHROPIC_API_KEY = (not set)"));
    }
}
