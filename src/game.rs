//! Idle progression engine for the DEADSPOT miner.
//!
//! Every operation here is a pure state transition: it takes the player
//! state plus an explicit clock (and RNG where rewards are random), and
//! either mutates the state atomically or returns an error leaving it
//! untouched. Timers and cooldowns are data, never in-engine waiting.

use crate::error::EngineError;
use crate::types::PlayerState;
use crate::upgrades::{cost_for, UpgradeKind};
use chrono::{DateTime, Utc};
use rand::Rng;

/// Faucet cooldown: 30 minutes.
pub const FAUCET_COOLDOWN_MS: i64 = 30 * 60 * 1000;

/// Faucet reward range, uniform in [0.001, 0.23).
pub const FAUCET_REWARD_MIN: f64 = 0.001;
pub const FAUCET_REWARD_MAX: f64 = 0.23;

/// Minimum currency to prestige (inclusive).
pub const PRESTIGE_THRESHOLD: f64 = 500_000.0;

/// Advance time-based accrual by `elapsed_ms`.
///
/// Energy regenerates by whole elapsed seconds only; passive production uses
/// fractional seconds. The asymmetry is intentional and load-bearing for
/// save compatibility. Safe for arbitrarily large `elapsed_ms` (offline
/// catch-up after a suspend produces the same totals as per-second ticks).
pub fn tick(state: &mut PlayerState, elapsed_ms: u64) {
    let whole_secs = elapsed_ms / 1000;
    let regen = whole_secs.saturating_mul(1 + state.energy_regen_speed_level as u64);
    let new_energy = (state.energy as u64)
        .saturating_add(regen)
        .min(state.max_energy as u64);
    state.energy = new_energy as u32;

    state.currency += state.production_rate * (elapsed_ms as f64 / 1000.0);
}

/// Outcome of a single manual click, for display purposes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickOutcome {
    pub currency_gained: f64,
    pub experience_gained: f64,
    pub levels_gained: u32,
}

/// One manual mining click.
///
/// Consumes exactly one energy. Every click also permanently raises passive
/// production, which is what makes the idle loop compound. All field updates
/// land atomically; on `InsufficientEnergy` nothing changes.
pub fn click(state: &mut PlayerState) -> Result<ClickOutcome, EngineError> {
    if state.energy == 0 {
        return Err(EngineError::InsufficientEnergy);
    }

    let click_multiplier = if state.double_click_level > 0 { 2.0 } else { 1.0 };
    let effective_power =
        (state.click_power + state.extra_click_power_level as f64) * click_multiplier;
    let prestige_mult = state.prestige_multiplier();

    let currency_gained = 0.00001 * effective_power * prestige_mult;
    let experience_gained =
        0.10 * (1.0 + state.experience_multiplier_level as f64) * prestige_mult;
    let production_gained = 0.000001 * effective_power * prestige_mult;

    let new_experience = state.experience + experience_gained;
    let new_level =
        (new_experience / (100.0 * state.level as f64)).floor() as u32 + state.level;
    let levels_gained = new_level - state.level;

    state.currency += currency_gained;
    state.experience = new_experience;
    state.energy -= 1;
    // Single scaled step using the pre-update level, not a per-level sum.
    state.max_energy += levels_gained * (30 + state.level);
    state.click_power += levels_gained as f64 * 4.0 * prestige_mult;
    state.production_rate += production_gained;
    state.level = new_level;

    Ok(ClickOutcome {
        currency_gained,
        experience_gained,
        levels_gained,
    })
}

/// Claim the free faucet reward, subject to a 30-minute cooldown.
///
/// Returns the reward amount. The reward also nudges passive production up
/// by a thousandth of itself.
pub fn claim_faucet(
    state: &mut PlayerState,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> Result<f64, EngineError> {
    if let Some(last) = state.last_faucet_claim {
        let elapsed_ms = (now - last).num_milliseconds();
        if elapsed_ms < FAUCET_COOLDOWN_MS {
            let remaining_ms = FAUCET_COOLDOWN_MS - elapsed_ms;
            return Err(EngineError::CooldownActive {
                remaining_minutes: (remaining_ms + 59_999) / 60_000,
            });
        }
    }

    let reward = rng.gen_range(FAUCET_REWARD_MIN..FAUCET_REWARD_MAX);
    state.currency += reward;
    state.production_rate += reward / 1000.0;
    state.last_faucet_claim = Some(now);

    Ok(reward)
}

/// Buy one level of the named upgrade.
///
/// The cost is always recomputed from the current level; a caller-displayed
/// price is never trusted. Returns the amount charged.
pub fn buy_upgrade(state: &mut PlayerState, kind: UpgradeKind) -> Result<f64, EngineError> {
    let cost = cost_for(kind, state.upgrade_level(kind));
    if state.currency < cost {
        return Err(EngineError::InsufficientFunds { cost });
    }

    state.currency -= cost;
    *state.upgrade_level_mut(kind) += 1;

    Ok(cost)
}

/// Trade all transient progress for one permanent prestige level.
///
/// Requires at least 500,000 DEADSPOT. The full currency balance is archived
/// into `prestige_currency`; everything else returns to its initial value.
/// Returns the new prestige level.
pub fn attempt_prestige(state: &mut PlayerState) -> Result<u32, EngineError> {
    if state.currency < PRESTIGE_THRESHOLD {
        return Err(EngineError::InsufficientCurrency {
            required: PRESTIGE_THRESHOLD,
        });
    }

    *state = PlayerState {
        prestige_level: state.prestige_level + 1,
        prestige_currency: state.prestige_currency + state.currency,
        ..PlayerState::initial()
    };

    Ok(state.prestige_level)
}

/// Unconditional full reset, prestige fields included. Idempotent.
pub fn reset_game(state: &mut PlayerState) {
    *state = PlayerState::initial();
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn fresh_click_matches_base_gains() {
        let mut state = PlayerState::initial();
        let outcome = click(&mut state).unwrap();

        assert_eq!(state.energy, 999);
        assert!((outcome.currency_gained - 0.00001).abs() < 1e-12);
        assert!((state.currency - 0.00001).abs() < 1e-12);
        assert!((state.experience - 0.10).abs() < 1e-12);
        assert_eq!(state.level, 1);
        assert_eq!(outcome.levels_gained, 0);
        assert!((state.production_rate - 0.000001).abs() < 1e-15);
    }

    #[test]
    fn click_with_zero_energy_changes_nothing() {
        let mut state = PlayerState::initial();
        state.energy = 0;
        let before = state.clone();

        assert_eq!(click(&mut state), Err(EngineError::InsufficientEnergy));
        assert_eq!(state, before);
    }

    #[test]
    fn click_applies_upgrade_and_prestige_multipliers() {
        let mut state = PlayerState::initial();
        state.double_click_level = 1;
        state.extra_click_power_level = 3;
        state.experience_multiplier_level = 2;
        state.prestige_level = 2;

        let mult = state.prestige_multiplier();
        assert!((mult - 1.14).abs() < 1e-12);

        let outcome = click(&mut state).unwrap();
        // (1 + 3) * 2 = 8 effective power
        assert!((outcome.currency_gained - 0.00001 * 8.0 * mult).abs() < 1e-15);
        assert!((outcome.experience_gained - 0.10 * 3.0 * mult).abs() < 1e-12);
    }

    #[test]
    fn level_up_raises_max_energy_and_click_power_once() {
        let mut state = PlayerState::initial();
        state.experience = 99.95;

        let outcome = click(&mut state).unwrap();
        assert_eq!(outcome.levels_gained, 1);
        assert_eq!(state.level, 2);
        // Scaled by the pre-update level: 1 * (30 + 1).
        assert_eq!(state.max_energy, 1031);
        assert!((state.click_power - 5.0).abs() < 1e-12);
    }

    #[test]
    fn tick_zero_elapsed_is_a_noop() {
        let mut state = PlayerState::initial();
        state.energy = 500;
        state.production_rate = 0.5;
        let before = state.clone();

        tick(&mut state, 0);
        assert_eq!(state, before);
    }

    #[test]
    fn tick_regenerates_whole_seconds_only() {
        let mut state = PlayerState::initial();
        state.energy = 100;

        tick(&mut state, 2999);
        assert_eq!(state.energy, 102);
    }

    #[test]
    fn tick_respects_regen_speed_and_energy_cap() {
        let mut state = PlayerState::initial();
        state.energy = 990;
        state.energy_regen_speed_level = 4;

        tick(&mut state, 1000);
        assert_eq!(state.energy, 995);

        tick(&mut state, 60_000);
        assert_eq!(state.energy, state.max_energy);
    }

    #[test]
    fn tick_accrues_fractional_production() {
        let mut state = PlayerState::initial();
        state.production_rate = 2.0;

        tick(&mut state, 500);
        assert!((state.currency - 1.0).abs() < 1e-12);
    }

    #[test]
    fn one_big_tick_equals_many_small_ticks() {
        let mut bulk = PlayerState::initial();
        bulk.energy = 0;
        bulk.production_rate = 0.25;
        let mut incremental = bulk.clone();

        tick(&mut bulk, 90_000);
        for _ in 0..90 {
            tick(&mut incremental, 1000);
        }

        assert_eq!(bulk.energy, incremental.energy);
        assert!((bulk.currency - incremental.currency).abs() < 1e-9);
    }

    #[test]
    fn tick_survives_huge_offline_gaps() {
        let mut state = PlayerState::initial();
        state.energy = 0;
        state.production_rate = 0.001;

        // Two weeks suspended.
        tick(&mut state, 14 * 24 * 3600 * 1000);
        assert_eq!(state.energy, state.max_energy);
        assert!(state.currency > 0.0);
    }

    #[test]
    fn faucet_claim_rewards_within_range_and_sets_cooldown() {
        let mut state = PlayerState::initial();
        let mut rng = StdRng::seed_from_u64(7);
        let now = ts(10_000);

        let reward = claim_faucet(&mut state, now, &mut rng).unwrap();
        assert!((FAUCET_REWARD_MIN..FAUCET_REWARD_MAX).contains(&reward));
        assert!((state.currency - reward).abs() < 1e-12);
        assert!((state.production_rate - reward / 1000.0).abs() < 1e-15);
        assert_eq!(state.last_faucet_claim, Some(now));
    }

    #[test]
    fn faucet_cooldown_reports_remaining_minutes() {
        let mut state = PlayerState::initial();
        let mut rng = StdRng::seed_from_u64(7);
        let first = ts(0);
        claim_faucet(&mut state, first, &mut rng).unwrap();

        let before = state.clone();
        // 10 minutes later: 20 minutes remain.
        let err = claim_faucet(&mut state, ts(600), &mut rng).unwrap_err();
        assert_eq!(
            err,
            EngineError::CooldownActive {
                remaining_minutes: 20
            }
        );
        assert_eq!(state, before);

        // 29:59.5 elapsed rounds the remaining 500ms up to a whole minute.
        let err = claim_faucet(&mut state, first + chrono::Duration::milliseconds(1_799_500), &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::CooldownActive {
                remaining_minutes: 1
            }
        );

        // Exactly 30 minutes: claimable again.
        assert!(claim_faucet(&mut state, ts(1800), &mut rng).is_ok());
    }

    #[test]
    fn buy_upgrade_charges_level_zero_base_cost() {
        let mut state = PlayerState::initial();
        state.currency = 150.0;

        let charged = buy_upgrade(&mut state, UpgradeKind::DoubleClick).unwrap();
        assert_eq!(charged, 100.0);
        assert!((state.currency - 50.0).abs() < 1e-12);
        assert_eq!(state.double_click_level, 1);
    }

    #[test]
    fn buy_upgrade_recomputes_cost_from_current_level() {
        let mut state = PlayerState::initial();
        state.currency = 1000.0;
        state.extra_click_power_level = 2;

        // 50 * 1.5^2 = 112.5
        let charged = buy_upgrade(&mut state, UpgradeKind::ExtraClickPower).unwrap();
        assert!((charged - 112.5).abs() < 1e-12);
        assert_eq!(state.extra_click_power_level, 3);
    }

    #[test]
    fn buy_upgrade_insufficient_funds_is_untouched() {
        let mut state = PlayerState::initial();
        state.currency = 99.0;
        let before = state.clone();

        let err = buy_upgrade(&mut state, UpgradeKind::DoubleClick).unwrap_err();
        assert_eq!(err, EngineError::InsufficientFunds { cost: 100.0 });
        assert_eq!(state, before);
    }

    #[test]
    fn prestige_below_threshold_leaves_state_identical() {
        let mut state = PlayerState::initial();
        state.currency = 499_999.999;
        let before = state.clone();

        assert!(attempt_prestige(&mut state).is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn prestige_boundary_is_inclusive_and_conserves_currency() {
        let mut state = PlayerState::initial();
        state.currency = 500_000.0;
        state.experience = 12_345.0;
        state.level = 9;
        state.energy = 3;
        state.max_energy = 2000;
        state.click_power = 40.0;
        state.production_rate = 1.5;
        state.double_click_level = 2;
        state.extra_click_power_level = 5;
        state.experience_multiplier_level = 1;
        state.energy_regen_speed_level = 3;
        state.last_faucet_claim = Some(ts(100));
        state.prestige_level = 1;
        state.prestige_currency = 750_000.0;

        let new_level = attempt_prestige(&mut state).unwrap();
        assert_eq!(new_level, 2);
        assert_eq!(state.prestige_level, 2);
        assert!((state.prestige_currency - 1_250_000.0).abs() < 1e-6);

        let fresh = PlayerState::initial();
        assert_eq!(state.currency, fresh.currency);
        assert_eq!(state.experience, fresh.experience);
        assert_eq!(state.level, fresh.level);
        assert_eq!(state.energy, fresh.energy);
        assert_eq!(state.max_energy, fresh.max_energy);
        assert_eq!(state.click_power, fresh.click_power);
        assert_eq!(state.production_rate, fresh.production_rate);
        assert_eq!(state.double_click_level, 0);
        assert_eq!(state.extra_click_power_level, 0);
        assert_eq!(state.experience_multiplier_level, 0);
        assert_eq!(state.energy_regen_speed_level, 0);
        assert_eq!(state.last_faucet_claim, None);
    }

    #[test]
    fn reset_wipes_prestige_too_and_is_idempotent() {
        let mut state = PlayerState::initial();
        state.currency = 1e6;
        state.prestige_level = 4;
        state.prestige_currency = 2e6;

        reset_game(&mut state);
        assert_eq!(state, PlayerState::initial());

        reset_game(&mut state);
        assert_eq!(state, PlayerState::initial());
    }
}
