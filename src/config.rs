use crate::rates::RateTable;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub mining: MiningConfig,
    pub staking: StakingConfig,
    /// Crypto-kind -> display name, deposit address, quoted rate.
    pub rates: RateTable,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MiningConfig {
    pub tick_interval_secs: u64,
    pub autosave_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StakingConfig {
    /// Seconds between deposit submission and automatic verification.
    pub verification_delay_secs: i64,
    /// How often the daemon re-derives verification state from timestamps.
    pub refresh_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mining: MiningConfig::default(),
            staking: StakingConfig::default(),
            rates: RateTable::default(),
        }
    }
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: 1,
            autosave_interval_secs: 30,
        }
    }
}

impl Default for StakingConfig {
    fn default() -> Self {
        Self {
            verification_delay_secs: 120,
            refresh_interval_secs: 10,
        }
    }
}

impl Config {
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".deadspot")
            .join("config.toml")
    }

    /// Load the config file, writing the defaults on first run.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let raw = fs::read_to_string(path).context("Failed to read config file")?;
            let config: Config = toml::from_str(&raw).context("Failed to parse config file")?;
            return Ok(config);
        }

        info!("🆕 No config found, writing defaults to {:?}", path);
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {parent:?}"))?;
        }

        let raw = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, raw).context("Failed to write config file")?;
        Ok(())
    }

    pub fn verification_delay(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.staking.verification_delay_secs)
    }
}
