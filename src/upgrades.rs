use crate::types::PlayerState;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Cost curve growth factor shared by all four upgrade tracks.
pub const COST_GROWTH: f64 = 1.5;

/// The four purchasable upgrade tracks. Each owns an independent level
/// counter on [`PlayerState`] and its own base cost, but they all follow the
/// same geometric cost law.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum UpgradeKind {
    /// Doubles the effective power of every click while owned.
    DoubleClick,
    /// Adds its level to click power before multipliers.
    ExtraClickPower,
    /// Multiplies experience gain per click.
    ExperienceMultiplier,
    /// Speeds up energy regeneration per whole second.
    EnergyRegenSpeed,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 4] = [
        UpgradeKind::DoubleClick,
        UpgradeKind::ExtraClickPower,
        UpgradeKind::ExperienceMultiplier,
        UpgradeKind::EnergyRegenSpeed,
    ];

    pub fn base_cost(self) -> f64 {
        match self {
            UpgradeKind::DoubleClick => 100.0,
            UpgradeKind::ExtraClickPower => 50.0,
            UpgradeKind::ExperienceMultiplier => 200.0,
            UpgradeKind::EnergyRegenSpeed => 300.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UpgradeKind::DoubleClick => "Double Click",
            UpgradeKind::ExtraClickPower => "Extra Click Power",
            UpgradeKind::ExperienceMultiplier => "Experience Multiplier",
            UpgradeKind::EnergyRegenSpeed => "Energy Regen Speed",
        }
    }
}

/// `base * 1.5^level`. Holds for level 0 (`== base`) and grows strictly.
pub fn cost_for(kind: UpgradeKind, level: u32) -> f64 {
    kind.base_cost() * COST_GROWTH.powi(level as i32)
}

impl PlayerState {
    pub fn upgrade_level(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::DoubleClick => self.double_click_level,
            UpgradeKind::ExtraClickPower => self.extra_click_power_level,
            UpgradeKind::ExperienceMultiplier => self.experience_multiplier_level,
            UpgradeKind::EnergyRegenSpeed => self.energy_regen_speed_level,
        }
    }

    pub(crate) fn upgrade_level_mut(&mut self, kind: UpgradeKind) -> &mut u32 {
        match kind {
            UpgradeKind::DoubleClick => &mut self.double_click_level,
            UpgradeKind::ExtraClickPower => &mut self.extra_click_power_level,
            UpgradeKind::ExperienceMultiplier => &mut self.experience_multiplier_level,
            UpgradeKind::EnergyRegenSpeed => &mut self.energy_regen_speed_level,
        }
    }
}
