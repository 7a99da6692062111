use crate::config::Config;
use crate::mining::MiningEngine;
use crate::state::{AppState, StateManager};
use crate::store::Store;
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{error, info};

/// The long-running process: mining ticks, timestamp-derived deposit
/// verification, and periodic snapshot autosave.
pub struct DeadspotDaemon {
    config: Config,
    state_manager: Arc<StateManager>,
    store: Arc<Store>,
    mining_engine: MiningEngine,
}

impl DeadspotDaemon {
    pub fn new(config: Config, store: Store, state: AppState) -> Self {
        let state_manager = Arc::new(StateManager::new(state));
        let mining_engine = MiningEngine::new(
            state_manager.clone(),
            config.mining.tick_interval_secs,
        );

        Self {
            config,
            state_manager,
            store: Arc::new(store),
            mining_engine,
        }
    }

    pub async fn run(self) -> Result<()> {
        // Reconcile any offline gap before the loops start.
        let (elapsed_ms, gained) = self.state_manager.advance_to(Utc::now()).await;
        if elapsed_ms > 1000 {
            info!(
                "⏪ Caught up {:.1}s of offline accrual (+{:.8} DEADSPOT)",
                elapsed_ms as f64 / 1000.0,
                gained
            );
        }

        // Spawn deposit verification loop
        let verify_state = self.state_manager.clone();
        let verification_delay = self.config.verification_delay();
        let refresh_interval = self.config.staking.refresh_interval_secs;
        tokio::spawn(async move {
            Self::verification_loop(verify_state, verification_delay, refresh_interval).await;
        });

        // Spawn autosave loop
        let save_state = self.state_manager.clone();
        let save_store = self.store.clone();
        let autosave_interval = self.config.mining.autosave_interval_secs;
        tokio::spawn(async move {
            Self::autosave_loop(save_state, save_store, autosave_interval).await;
        });

        // Mining loop runs in the current task
        self.mining_engine.run().await;

        Ok(())
    }

    async fn verification_loop(
        state_manager: Arc<StateManager>,
        verification_delay: chrono::Duration,
        interval_secs: u64,
    ) {
        let mut ticker = interval(Duration::from_secs(interval_secs));

        info!(
            "🔎 Deposit verification started (delay: {}s, check every {}s)",
            verification_delay.num_seconds(),
            interval_secs
        );

        loop {
            ticker.tick().await;

            let newly_verified = state_manager
                .refresh_verifications(Utc::now(), verification_delay)
                .await;
            if newly_verified > 0 {
                info!("✅ {} deposit(s) verified", newly_verified);
            }
        }
    }

    async fn autosave_loop(
        state_manager: Arc<StateManager>,
        store: Arc<Store>,
        interval_secs: u64,
    ) {
        let mut ticker = interval(Duration::from_secs(interval_secs));

        info!("💾 Autosave started (every {}s)", interval_secs);

        loop {
            ticker.tick().await;

            let snapshot = state_manager.snapshot().await;
            if let Err(e) = store.save(&snapshot) {
                error!("❌ Autosave failed: {}", e);
            }
        }
    }
}
