use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

mod config;
mod daemon;
mod error;
mod game;
mod mining;
mod rates;
mod staking;
mod state;
mod store;
mod types;
mod upgrades;

use crate::config::Config;
use crate::daemon::DeadspotDaemon;
use crate::error::EngineError;
use crate::state::AppState;
use crate::store::Store;
use crate::upgrades::{cost_for, UpgradeKind};

#[derive(Parser)]
#[command(
    name = "deadspot-daemon",
    version,
    about = "DEADSPOT staking & idle-mining simulator"
)]
struct Cli {
    /// Data directory for snapshots (default: ~/.deadspot)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the background daemon (mining ticks, verification, autosave)
    Run,
    /// Show player progression and staking balances
    Status,
    /// Mine manually
    Click {
        /// Number of clicks to apply
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
    /// Claim the free faucet reward (30-minute cooldown)
    Faucet,
    /// Buy one level of an upgrade
    Buy { upgrade: UpgradeKind },
    /// Trade 500,000+ DEADSPOT for a permanent prestige level
    Prestige,
    /// Wipe all progress, prestige included
    Reset,
    /// List staking rates and deposit addresses
    Rates,
    /// Declare a staking deposit
    Deposit {
        crypto: String,
        amount: f64,
        days: u32,
        /// Transaction id of the (simulated) on-chain transfer
        #[arg(long)]
        tx_ref: String,
    },
    /// Request a simulated withdrawal against the accrued balance
    Withdraw {
        crypto: String,
        amount: f64,
        /// Destination wallet address
        #[arg(long)]
        address: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deadspot_daemon=debug,info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = Config::load_or_create(&Config::config_path())?;
    let data_dir = cli.data_dir.unwrap_or_else(Store::default_data_dir);
    let store = Store::new(data_dir)?;

    let now = Utc::now();
    let mut state = store.load(now);
    // Every entry point reconciles offline accrual first.
    state.advance_to(now);

    match cli.command {
        Command::Run => {
            println!("\n╔════════════════════════════════════════════════════════╗");
            println!("║                 DEADSPOT DAEMON v1.0.0                 ║");
            println!("║          Staking & Idle-Mining Simulator               ║");
            println!("╚════════════════════════════════════════════════════════╝\n");

            info!("🚀 DEADSPOT daemon starting...");
            let daemon = DeadspotDaemon::new(config, store, state);
            daemon.run().await?;
        }
        Command::Status => {
            print_status(&state, now);
        }
        Command::Click { count } => {
            let mut total_currency = 0.0;
            let mut total_levels = 0;
            let mut applied = 0;
            let mut stopped: Option<EngineError> = None;

            for _ in 0..count {
                match game::click(&mut state.player) {
                    Ok(outcome) => {
                        total_currency += outcome.currency_gained;
                        total_levels += outcome.levels_gained;
                        applied += 1;
                    }
                    Err(e) => {
                        stopped = Some(e);
                        break;
                    }
                }
            }

            store.save(&state)?;
            println!(
                "⚡ {applied} click(s): +{total_currency:.8} DEADSPOT | Energy: {}/{}",
                state.player.energy, state.player.max_energy
            );
            if total_levels > 0 {
                println!("🎉 Level up! Now level {}", state.player.level);
            }
            if let Some(e) = stopped {
                fail(e);
            }
        }
        Command::Faucet => {
            let mut rng = rand::thread_rng();
            match game::claim_faucet(&mut state.player, now, &mut rng) {
                Ok(reward) => {
                    store.save(&state)?;
                    println!("🚰 Faucet claimed: +{reward:.6} DEADSPOT");
                }
                Err(e) => fail(e),
            }
        }
        Command::Buy { upgrade } => {
            match game::buy_upgrade(&mut state.player, upgrade) {
                Ok(charged) => {
                    store.save(&state)?;
                    let level = state.player.upgrade_level(upgrade);
                    println!(
                        "🔧 {} -> level {} (-{:.2} DEADSPOT, next costs {:.2})",
                        upgrade.label(),
                        level,
                        charged,
                        cost_for(upgrade, level)
                    );
                }
                Err(e) => fail(e),
            }
        }
        Command::Prestige => {
            match game::attempt_prestige(&mut state.player) {
                Ok(level) => {
                    store.save(&state)?;
                    println!(
                        "⭐ Prestige {}! Banked {:.2} DEADSPOT, all gains now +{:.0}%",
                        level,
                        state.player.prestige_currency,
                        state.player.prestige_level as f64 * 7.0
                    );
                }
                Err(e) => fail(e),
            }
        }
        Command::Reset => {
            game::reset_game(&mut state.player);
            state.deposits.clear();
            store.save(&state)?;
            println!("🔄 Game reset. All progress erased.");
        }
        Command::Rates => {
            println!("💎 Staking rate table:");
            for (kind, info) in config.rates.iter() {
                println!(
                    "  {:<10} {:<18} {:.1}%  deposit to {}",
                    kind, info.display_name, info.annual_rate_percent, info.deposit_address
                );
            }
        }
        Command::Deposit {
            crypto,
            amount,
            days,
            tx_ref,
        } => {
            match staking::submit_deposit(&config.rates, &crypto, amount, days, &tx_ref, now) {
                Ok(deposit) => {
                    let info = config.rates.get(&crypto).unwrap();
                    state.deposits.push(deposit.clone());
                    store.save(&state)?;
                    println!(
                        "💎 Deposit {} submitted: {} {} over {} days at {:.1}%",
                        deposit.id, amount, info.display_name, days, deposit.annual_rate_percent
                    );
                    println!(
                        "⏳ Pending verification (~{}s). Funds count once verified.",
                        config.staking.verification_delay_secs
                    );
                }
                Err(e) => fail(e),
            }
        }
        Command::Withdraw {
            crypto,
            amount,
            address,
        } => {
            let balance = staking::total_balance(&state.deposits, now);
            let mut rng = rand::thread_rng();
            match staking::request_withdrawal(
                &config.rates,
                &crypto,
                amount,
                &address,
                balance,
                now,
                &mut rng,
            ) {
                Ok(ticket) => {
                    let info = config.rates.get(&crypto).unwrap();
                    println!(
                        "💸 Withdrawal {} accepted: {} {} to {}",
                        ticket.id, ticket.amount, info.display_name, ticket.destination_address
                    );
                    println!(
                        "⏳ Estimated settlement in {}h (by {})",
                        ticket.settlement_hours,
                        ticket.estimated_settlement().format("%Y-%m-%d %H:%M UTC")
                    );
                }
                Err(e) => fail(e),
            }
        }
    }

    Ok(())
}

fn print_status(state: &AppState, now: chrono::DateTime<Utc>) {
    let p = &state.player;
    println!("⛏️  DEADSPOT Miner");
    println!("  DEADSPOT:   {:.8}", p.currency);
    println!("  Level:      {} (exp {:.2})", p.level, p.experience);
    println!("  Energy:     {}/{}", p.energy, p.max_energy);
    println!("  Mining:     {:.8}/s", p.production_rate);
    println!(
        "  Prestige:   {} (+{:.0}% bonus, {:.2} banked)",
        p.prestige_level,
        p.prestige_level as f64 * 7.0,
        p.prestige_currency
    );
    for kind in UpgradeKind::ALL {
        println!(
            "  {:<24} level {} (next: {:.2})",
            kind.label(),
            p.upgrade_level(kind),
            cost_for(kind, p.upgrade_level(kind))
        );
    }

    let verified = state.deposits.iter().filter(|d| d.verified).count();
    let pending = state.deposits.len() - verified;
    println!("💎 Staking");
    println!(
        "  Balance:    {:.6} ({} active, {} pending)",
        staking::total_balance(&state.deposits, now),
        verified,
        pending
    );
    println!(
        "  Earnings:   {:.6}",
        staking::total_earnings(&state.deposits, now)
    );
}

fn fail(e: EngineError) -> ! {
    eprintln!("❌ {e}");
    std::process::exit(1);
}
