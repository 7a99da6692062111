use crate::state::StateManager;
use chrono::Utc;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{debug, info};

/// Drives the periodic progression tick.
///
/// Elapsed time is always measured from the persisted `last_update`, never
/// assumed equal to the tick interval, so a slow scheduler or a suspended
/// process catches up instead of losing accrual.
pub struct MiningEngine {
    state_manager: Arc<StateManager>,
    tick_interval_secs: u64,
}

impl MiningEngine {
    pub fn new(state_manager: Arc<StateManager>, tick_interval_secs: u64) -> Self {
        Self {
            state_manager,
            tick_interval_secs,
        }
    }

    pub async fn run(&self) {
        let mut ticker = interval(Duration::from_secs(self.tick_interval_secs));

        info!(
            "⛏️  Mining engine started (tick every {}s)",
            self.tick_interval_secs
        );

        loop {
            ticker.tick().await;

            let now = Utc::now();
            let (elapsed_ms, gained) = self.state_manager.advance_to(now).await;
            let state = self.state_manager.snapshot().await;

            debug!(
                "Mining tick: +{:.8} DEADSPOT over {}ms (rate: {:.8}/s) | Energy: {}/{}",
                gained,
                elapsed_ms,
                state.player.production_rate,
                state.player.energy,
                state.player.max_energy
            );
        }
    }
}
