use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A simulated staking deposit declared by the user.
///
/// `external_tx_ref` is an opaque user-supplied string; nothing here touches
/// a real ledger. A deposit starts unverified and flips to verified exactly
/// once, derived from `created_at` plus the configured verification delay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deposit {
    pub id: Uuid,
    pub crypto: String,
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub term_days: u32,
    pub external_tx_ref: String,
    pub created_at: DateTime<Utc>,
    pub verified: bool,
}

/// Informational withdrawal ticket. No balance is deducted anywhere; the
/// settlement delay models an operational SLA window, not a transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalTicket {
    pub id: Uuid,
    pub crypto: String,
    pub amount: f64,
    pub destination_address: String,
    pub requested_at: DateTime<Utc>,
    pub settlement_hours: u32,
}

impl WithdrawalTicket {
    pub fn estimated_settlement(&self) -> DateTime<Utc> {
        self.requested_at + chrono::Duration::hours(self.settlement_hours as i64)
    }
}

/// Full progression state for the DEADSPOT miner.
///
/// Old snapshots missing newer fields deserialize with the initial value for
/// those fields, so the on-disk shape can grow without a migration step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerState {
    pub currency: f64,
    pub experience: f64,
    pub level: u32,
    pub energy: u32,
    pub max_energy: u32,
    pub click_power: f64,
    pub production_rate: f64,
    pub prestige_level: u32,
    pub prestige_currency: f64,
    pub last_faucet_claim: Option<DateTime<Utc>>,

    // Upgrade counters. These reset on prestige along with everything else;
    // only prestige_level and prestige_currency survive.
    pub double_click_level: u32,
    pub extra_click_power_level: u32,
    pub experience_multiplier_level: u32,
    pub energy_regen_speed_level: u32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::initial()
    }
}

impl PlayerState {
    pub fn initial() -> Self {
        Self {
            currency: 0.0,
            experience: 0.0,
            level: 1,
            energy: 1000,
            max_energy: 1000,
            click_power: 1.0,
            production_rate: 0.0,
            prestige_level: 0,
            prestige_currency: 0.0,
            last_faucet_claim: None,
            double_click_level: 0,
            extra_click_power_level: 0,
            experience_multiplier_level: 0,
            energy_regen_speed_level: 0,
        }
    }

    /// +7% to every click, experience, and production gain per prestige level.
    pub fn prestige_multiplier(&self) -> f64 {
        1.0 + self.prestige_level as f64 * 0.07
    }
}
