//! Staking accrual engine.
//!
//! Deposits accrue linearly against the quoted percentage spread evenly over
//! the deposit term, capped at term end. Verification is derived from the
//! stored creation timestamp plus a fixed delay, so it survives restarts
//! without any live timer.

use crate::error::EngineError;
use crate::rates::RateTable;
use crate::types::{Deposit, WithdrawalTicket};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use uuid::Uuid;

pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Withdrawal settlement SLA window, in whole hours.
pub const SETTLEMENT_MIN_HOURS: u32 = 10;
pub const SETTLEMENT_MAX_HOURS: u32 = 48;

/// Validate and record a new deposit. The annual rate is copied from the
/// rate table at submission time; later table edits never reprice it.
pub fn submit_deposit(
    rates: &RateTable,
    crypto: &str,
    principal: f64,
    term_days: u32,
    external_tx_ref: &str,
    now: DateTime<Utc>,
) -> Result<Deposit, EngineError> {
    let info = rates
        .get(crypto)
        .ok_or_else(|| EngineError::invalid_input(format!("unknown crypto kind: {crypto}")))?;

    if !principal.is_finite() || principal <= 0.0 {
        return Err(EngineError::invalid_input("principal must be positive"));
    }
    if term_days == 0 {
        return Err(EngineError::invalid_input("term must be at least one day"));
    }
    if external_tx_ref.trim().is_empty() {
        return Err(EngineError::invalid_input("transaction reference is required"));
    }

    Ok(Deposit {
        id: Uuid::new_v4(),
        crypto: crypto.to_string(),
        principal,
        annual_rate_percent: info.annual_rate_percent,
        term_days,
        external_tx_ref: external_tx_ref.to_string(),
        created_at: now,
        verified: false,
    })
}

/// Flip `pending -> verified` for every deposit whose delay has elapsed.
/// The transition is terminal and each deposit is independent. Returns how
/// many deposits verified on this pass.
pub fn refresh_verifications(
    deposits: &mut [Deposit],
    now: DateTime<Utc>,
    verification_delay: Duration,
) -> usize {
    let mut newly_verified = 0;
    for deposit in deposits.iter_mut() {
        if !deposit.verified && now - deposit.created_at >= verification_delay {
            deposit.verified = true;
            newly_verified += 1;
        }
    }
    newly_verified
}

/// Yield accrued so far. Zero while unverified; linear up to term end;
/// constant thereafter. The quoted percentage pays out in full over the term
/// (the divisor is `term_days`, not 365 — a deliberate product quirk).
pub fn accrued_yield(deposit: &Deposit, now: DateTime<Utc>) -> f64 {
    if !deposit.verified {
        return 0.0;
    }

    let elapsed_ms = (now - deposit.created_at).num_milliseconds().max(0);
    let days = (elapsed_ms as f64 / MS_PER_DAY).min(deposit.term_days as f64);
    let daily_rate = deposit.annual_rate_percent / 100.0 / deposit.term_days as f64;

    deposit.principal * daily_rate * days
}

/// Principal plus accrued yield; zero while unverified.
pub fn accrued_value(deposit: &Deposit, now: DateTime<Utc>) -> f64 {
    if !deposit.verified {
        return 0.0;
    }
    deposit.principal + accrued_yield(deposit, now)
}

pub fn total_balance(deposits: &[Deposit], now: DateTime<Utc>) -> f64 {
    deposits.iter().map(|d| accrued_value(d, now)).sum()
}

pub fn total_earnings(deposits: &[Deposit], now: DateTime<Utc>) -> f64 {
    deposits.iter().map(|d| accrued_yield(d, now)).sum()
}

/// Produce an informational withdrawal ticket with a random settlement delay
/// in the SLA window. No balance is deducted; the ticket only tells the user
/// when to expect the simulated transfer.
pub fn request_withdrawal(
    rates: &RateTable,
    crypto: &str,
    amount: f64,
    destination_address: &str,
    total_balance: f64,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> Result<WithdrawalTicket, EngineError> {
    if rates.get(crypto).is_none() {
        return Err(EngineError::invalid_input(format!(
            "unknown crypto kind: {crypto}"
        )));
    }
    if !amount.is_finite() || amount <= 0.0 {
        return Err(EngineError::invalid_input("amount must be positive"));
    }
    if destination_address.trim().is_empty() {
        return Err(EngineError::invalid_input("destination address is required"));
    }
    if amount > total_balance {
        return Err(EngineError::InsufficientBalance);
    }

    Ok(WithdrawalTicket {
        id: Uuid::new_v4(),
        crypto: crypto.to_string(),
        amount,
        destination_address: destination_address.to_string(),
        requested_at: now,
        settlement_hours: rng.gen_range(SETTLEMENT_MIN_HOURS..=SETTLEMENT_MAX_HOURS),
    })
}
