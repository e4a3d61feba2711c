use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable consulted when no `--database` flag is given.
pub const DATABASE_ENV: &str = "ISSUEWATCH_DB";

const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;
const DEFAULT_STALE_AFTER_SECS: u64 = 300;
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IssuewatchConfig {
    pub database: Option<String>,
    pub port: Option<u16>,
    pub sweep_interval_secs: Option<u64>,
    pub stale_after_secs: Option<u64>,
}

impl IssuewatchConfig {
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS))
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs.unwrap_or(DEFAULT_STALE_AFTER_SECS))
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("issuewatch.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<IssuewatchConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: IssuewatchConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &IssuewatchConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Resolve the database path: explicit flag, then environment, then
/// config file. `None` here is what ultimately surfaces as a
/// configuration error on first store access.
pub fn resolve_database(
    flag: Option<&Path>,
    config: Option<&IssuewatchConfig>,
) -> Option<PathBuf> {
    if let Some(path) = flag {
        return Some(path.to_path_buf());
    }
    if let Ok(value) = std::env::var(DATABASE_ENV) {
        if !value.is_empty() {
            return Some(PathBuf::from(value));
        }
    }
    config
        .and_then(|c| c.database.as_deref())
        .map(PathBuf::from)
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
