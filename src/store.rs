//! Snapshot persistence.
//!
//! Two fixed keys in the data directory: one JSON document for the player,
//! one for the deposit book. A missing or unreadable snapshot is replaced
//! with initial/empty state (with a warning) rather than crashing — the
//! engines never depend on how or whether their state is stored.

use crate::state::AppState;
use crate::types::{Deposit, PlayerState};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

pub const PLAYER_KEY: &str = "player.json";
pub const DEPOSITS_KEY: &str = "deposits.json";

#[derive(Debug, Serialize, Deserialize)]
struct PlayerDoc {
    player: PlayerState,
    /// Wall-clock time of the last applied tick, used for offline catch-up.
    last_update: DateTime<Utc>,
}

pub struct Store {
    data_dir: PathBuf,
}

impl Store {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {data_dir:?}"))?;
        Ok(Self { data_dir })
    }

    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".deadspot")
    }

    pub fn load(&self, now: DateTime<Utc>) -> AppState {
        let (player, last_update) = match self.read_json::<PlayerDoc>(PLAYER_KEY) {
            Some(doc) => (doc.player, doc.last_update),
            None => (PlayerState::initial(), now),
        };

        let deposits = self
            .read_json::<Vec<Deposit>>(DEPOSITS_KEY)
            .unwrap_or_default();

        AppState {
            player,
            deposits,
            last_update,
        }
    }

    pub fn save(&self, state: &AppState) -> Result<()> {
        let doc = PlayerDoc {
            player: state.player.clone(),
            last_update: state.last_update,
        };
        self.write_json(PLAYER_KEY, &doc)?;
        self.write_json(DEPOSITS_KEY, &state.deposits)?;
        Ok(())
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.data_dir.join(key);
        if !path.exists() {
            return None;
        }

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("⚠️  Failed to read {key}: {e}. Starting from initial state.");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("⚠️  Malformed snapshot {key}: {e}. Starting from initial state.");
                None
            }
        }
    }

    fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.data_dir.join(key);
        let raw = serde_json::to_string_pretty(value)
            .with_context(|| format!("Failed to serialize {key}"))?;
        fs::write(&path, raw).with_context(|| format!("Failed to write {path:?}"))?;
        Ok(())
    }
}
