use std::path::{Path, PathBuf};

use anyhow::Context;

use super::types::AppConfig;

/// Get the default bytering data directory: ~/.bytering
pub fn get_bytering_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".bytering"))
}

/// Resolves the config from the usual places, then applies env overrides.
///
/// Priority: ~/.bytering/config.toml, then ./bytering.toml, then defaults.
pub fn load_default() -> anyhow::Result<AppConfig> {
    let user_config = get_bytering_data_dir()?.join("config.toml");
    let local_config = Path::new("bytering.toml");

    let mut cfg = if user_config.exists() {
        read_file(&user_config)?
    } else if local_config.exists() {
        read_file(local_config)?
    } else {
        AppConfig::default()
    };

    apply_env_overrides(&mut cfg)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Loads `path` exactly (no fallback) and applies env overrides.
pub fn load_from_path(path: &Path) -> anyhow::Result<AppConfig> {
    let mut cfg = read_file(path)?;
    apply_env_overrides(&mut cfg)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// `BYTERING_CAPACITY` and `BYTERING_LOG_LEVEL`; blank values are ignored.
pub fn apply_env_overrides(cfg: &mut AppConfig) -> anyhow::Result<()> {
    if let Ok(v) = std::env::var("BYTERING_CAPACITY") {
        if !v.trim().is_empty() {
            cfg.buffer.capacity = v
                .trim()
                .parse()
                .with_context(|| format!("invalid BYTERING_CAPACITY: {v}"))?;
        }
    }
    if let Ok(v) = std::env::var("BYTERING_LOG_LEVEL") {
        if !v.trim().is_empty() {
            cfg.logging.level = v;
        }
    }
    Ok(())
}

fn read_file(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    toml::from_str::<AppConfig>(&s).with_context(|| format!("parse config {}", path.display()))
}

fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    if cfg.buffer.capacity == 0 {
        anyhow::bail!("buffer.capacity must be greater than zero");
    }
    Ok(())
}
