use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::allocator::Alphabet;
use crate::canonical::Canonicalizer;
use crate::entry::MAX_ID_LEN;

/// Identifier and canonicalization preferences (`[preference]` in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceConfig {
    /// Length of generated identifiers (1..=12).
    pub id_char_count: usize,
    /// Drop `1 l L I i 0 O o` from the identifier alphabet.
    pub exclude_confusing_chars: bool,
    /// Identifiers that collide with routes of the front end and are never issued.
    pub reserved_path: Vec<String>,
    /// Scheme applied to input that has none.
    pub default_scheme: String,
    /// Refuse create/retrieve while set.
    pub maintenance_mode: bool,
}

impl Default for PreferenceConfig {
    fn default() -> Self {
        Self {
            id_char_count: 6,
            exclude_confusing_chars: true,
            reserved_path: ["api", "doc", "docs", "static", "status"]
                .into_iter()
                .map(String::from)
                .collect(),
            default_scheme: "https".to_string(),
            maintenance_mode: false,
        }
    }
}

/// Entry database settings (`[database]` in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file; None = `~/.local/state/urishort/uri.db`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Pool size.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_connections: 8,
        }
    }
}

/// Global configuration loaded from `~/.config/urishort/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortenerConfig {
    pub preference: PreferenceConfig,
    pub database: DatabaseConfig,
}

impl ShortenerConfig {
    /// Reject settings the allocator or canonicalizer cannot run with.
    pub fn validate(&self) -> Result<()> {
        let pref = &self.preference;
        if pref.id_char_count == 0 || pref.id_char_count > MAX_ID_LEN {
            bail!(
                "preference.id_char_count must be between 1 and {MAX_ID_LEN}, got {}",
                pref.id_char_count
            );
        }
        Canonicalizer::new(&pref.default_scheme)
            .with_context(|| format!("preference.default_scheme {:?}", pref.default_scheme))?;
        if Alphabet::new(pref.exclude_confusing_chars).is_empty() {
            bail!("identifier alphabet is empty");
        }
        if self.database.max_connections == 0 {
            bail!("database.max_connections must be at least 1");
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("urishort")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ShortenerConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ShortenerConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load and validate configuration from an explicit path. The file must exist.
pub fn load_from(path: &Path) -> Result<ShortenerConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: ShortenerConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
