use thiserror::Error;

/// Errors produced by the staking and mining engines.
///
/// All of these are local and non-fatal: a failed operation leaves the
/// state exactly as it was. There is no retry policy at the engine level.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("insufficient balance for withdrawal")]
    InsufficientBalance,

    #[error("insufficient energy")]
    InsufficientEnergy,

    #[error("insufficient funds: upgrade costs {cost:.6} DEADSPOT")]
    InsufficientFunds { cost: f64 },

    #[error("insufficient currency: prestige requires {required} DEADSPOT")]
    InsufficientCurrency { required: f64 },

    #[error("faucet on cooldown for {remaining_minutes} more minute(s)")]
    CooldownActive { remaining_minutes: i64 },
}

impl EngineError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        EngineError::InvalidInput(msg.into())
    }
}
