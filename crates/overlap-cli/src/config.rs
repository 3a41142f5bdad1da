//! `tzo` configuration: a small TOML file, every key optional.
//!
//! ```toml
//! reference_timezone = "UTC"    # zone whose calendar days key team free time
//! dst_policy = "wall_clock"     # wall_clock | shift_forward | skip
//! default_days = 5              # horizon when --days is omitted
//! log_level = "warn"            # used when RUST_LOG is unset and no -v
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use overlap_engine::DstPolicy;
use serde::Deserialize;

const CONFIG_ENV: &str = "TZO_CONFIG";

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub reference_timezone: String,
    pub dst_policy: DstPolicy,
    pub default_days: i64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_timezone: "UTC".to_string(),
            dst_policy: DstPolicy::default(),
            default_days: 5,
            log_level: "warn".to_string(),
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tzo").join("config.toml"))
}

/// Load configuration from, in order: `explicit`, `$TZO_CONFIG`, the user
/// config directory. The first two must exist; the last is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.is_empty() {
            return read_config(Path::new(&path))
                .with_context(|| format!("Failed to load config from ${}", CONFIG_ENV));
        }
    }

    match default_config_path() {
        Some(path) if path.exists() => read_config(&path),
        _ => Ok(Config::default()),
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}
