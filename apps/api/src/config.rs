use anyhow::{bail, Context, Result};

use crate::persistence::{DEFAULT_DEBOUNCE, DEFAULT_STORAGE_KEY};

/// Where the resume document is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Redis { url: String },
}

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageBackend,
    pub storage_key: String,
    pub save_debounce_ms: u64,
    pub wizard_steps: usize,
    pub rasterizer_url: Option<String>,
    pub preview_width_px: u32,
    pub preview_height_px: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let storage = match lookup("STORAGE_BACKEND").as_deref().unwrap_or("memory") {
            "memory" => StorageBackend::Memory,
            "redis" => StorageBackend::Redis {
                url: lookup("REDIS_URL").context(
                    "Required environment variable 'REDIS_URL' is not set (STORAGE_BACKEND=redis)",
                )?,
            },
            other => bail!("STORAGE_BACKEND must be 'memory' or 'redis', got '{other}'"),
        };

        let wizard_steps = parse_or(&lookup, "WIZARD_STEPS", 5usize)?;
        if wizard_steps == 0 {
            bail!("WIZARD_STEPS must be at least 1");
        }

        Ok(Config {
            storage,
            storage_key: lookup("STORAGE_KEY").unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
            save_debounce_ms: parse_or(&lookup, "SAVE_DEBOUNCE_MS", DEFAULT_DEBOUNCE.as_millis() as u64)?,
            wizard_steps,
            rasterizer_url: lookup("RASTERIZER_URL").filter(|url| !url.trim().is_empty()),
            preview_width_px: parse_or(&lookup, "PREVIEW_WIDTH_PX", 794u32)?,
            preview_height_px: parse_or(&lookup, "PREVIEW_HEIGHT_PX", 1123u32)?,
            port: parse_or(&lookup, "PORT", 8080u16)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.storage_key, "resumeData");
        assert_eq!(config.save_debounce_ms, 300);
        assert_eq!(config.wizard_steps, 5);
        assert_eq!(config.rasterizer_url, None);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_redis_backend_requires_url() {
        assert!(config_from(&[("STORAGE_BACKEND", "redis")]).is_err());
        let config = config_from(&[
            ("STORAGE_BACKEND", "redis"),
            ("REDIS_URL", "redis://localhost:6379"),
        ])
        .unwrap();
        assert_eq!(
            config.storage,
            StorageBackend::Redis {
                url: "redis://localhost:6379".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_unknown_backend_and_bad_numbers() {
        assert!(config_from(&[("STORAGE_BACKEND", "sqlite")]).is_err());
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("WIZARD_STEPS", "0")]).is_err());
    }

    #[test]
    fn test_blank_rasterizer_url_is_unset() {
        let config = config_from(&[("RASTERIZER_URL", "  ")]).unwrap();
        assert_eq!(config.rasterizer_url, None);
    }
}
