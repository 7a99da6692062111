use crate::game;
use crate::types::{Deposit, PlayerState};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Everything the daemon owns for one session: the single player record,
/// the deposit book, and the last wall-clock instant a tick was applied.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub player: PlayerState,
    pub deposits: Vec<Deposit>,
    pub last_update: DateTime<Utc>,
}

impl AppState {
    pub fn initial(now: DateTime<Utc>) -> Self {
        Self {
            player: PlayerState::initial(),
            deposits: Vec::new(),
            last_update: now,
        }
    }

    /// Bring time-based accrual current up to `now` and return the elapsed
    /// milliseconds that were applied. Large gaps (daemon suspended or not
    /// running) accrue the same as per-second ticks would have.
    pub fn advance_to(&mut self, now: DateTime<Utc>) -> u64 {
        let elapsed_ms = (now - self.last_update).num_milliseconds().max(0) as u64;
        game::tick(&mut self.player, elapsed_ms);
        self.last_update = now;
        elapsed_ms
    }
}

/// Shared handle over [`AppState`] for the daemon's concurrent loops.
/// Each public method takes the write lock once, so every operation is
/// atomic with respect to the others.
pub struct StateManager {
    state: Arc<RwLock<AppState>>,
}

impl StateManager {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub async fn snapshot(&self) -> AppState {
        self.state.read().await.clone()
    }

    /// Apply the periodic tick. Returns the elapsed milliseconds applied and
    /// the passive currency gained over them.
    pub async fn advance_to(&self, now: DateTime<Utc>) -> (u64, f64) {
        let mut state = self.state.write().await;
        let before = state.player.currency;
        let elapsed_ms = state.advance_to(now);
        (elapsed_ms, state.player.currency - before)
    }

    /// Run a verification pass over the deposit book. Returns how many
    /// deposits newly verified.
    pub async fn refresh_verifications(
        &self,
        now: DateTime<Utc>,
        verification_delay: Duration,
    ) -> usize {
        let mut state = self.state.write().await;
        crate::staking::refresh_verifications(&mut state.deposits, now, verification_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn advance_accrues_and_moves_the_clock() {
        let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let mut initial = AppState::initial(start);
        initial.player.production_rate = 2.0;
        let manager = StateManager::new(initial);

        let now = start + Duration::milliseconds(2500);
        let (elapsed_ms, gained) = manager.advance_to(now).await;
        assert_eq!(elapsed_ms, 2500);
        assert!((gained - 5.0).abs() < 1e-9);

        let snapshot = manager.snapshot().await;
        assert_eq!(snapshot.last_update, now);

        // A second advance to the same instant applies nothing.
        let (elapsed_ms, gained) = manager.advance_to(now).await;
        assert_eq!(elapsed_ms, 0);
        assert_eq!(gained, 0.0);
    }

    #[tokio::test]
    async fn clock_going_backwards_is_clamped_to_zero() {
        let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let manager = StateManager::new(AppState::initial(start));

        let (elapsed_ms, _) = manager.advance_to(start - Duration::seconds(60)).await;
        assert_eq!(elapsed_ms, 0);
    }
}
