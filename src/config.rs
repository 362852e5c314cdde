use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WanderConfig {
    pub database: Option<String>,
    pub port: Option<u16>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("wanderlist.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("travel.db")
}

/// Default port of the web server
pub const DEFAULT_PORT: u16 = 5000;

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<WanderConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: WanderConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &WanderConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Pick the database path: explicit flag first, then the config file,
/// then the default next to the working directory
pub fn resolve_database_path(flag: Option<PathBuf>, config: Option<&WanderConfig>) -> PathBuf {
    flag.or_else(|| {
        config
            .and_then(|c| c.database.clone())
            .map(PathBuf::from)
    })
    .unwrap_or_else(default_database_path)
}

/// Pick the server port: explicit flag first, then the config file
pub fn resolve_port(flag: Option<u16>, config: Option<&WanderConfig>) -> u16 {
    flag.or_else(|| config.and_then(|c| c.port)).unwrap_or(DEFAULT_PORT)
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
