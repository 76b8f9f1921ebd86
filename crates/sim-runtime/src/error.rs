//! Error taxonomy of the public game operations.
//!
//! Validation failures report why and mutate nothing; persistence failures
//! mean the transaction rolled back and the session may continue. Reaching
//! BANKRUPT or VICTORY is not an error: terminal status comes back in
//! ordinary summaries, except when an economic action is attempted on an
//! already-finished save.

use persistence::StoreError;
use rust_decimal::Decimal;
use sim_core::{BaseTier, SaveStatus};
use thiserror::Error;

/// Everything a public game operation can fail with.
#[derive(Debug, Error)]
pub enum GameError {
    /// No such save.
    #[error("save {0} not found")]
    SaveNotFound(i64),
    /// No such aircraft in this save.
    #[error("aircraft {0} not found")]
    AircraftNotFound(i64),
    /// The aircraft already flies a contract.
    #[error("aircraft {0} is not idle")]
    AircraftNotIdle(i64),
    /// No such catalog model.
    #[error("aircraft model {0} not found")]
    ModelNotFound(String),
    /// STARTER models and models above the save's base tier cannot be bought.
    #[error("aircraft model {0} is not purchasable")]
    ModelNotPurchasable(String),
    /// No such base in this save.
    #[error("base {0} not found")]
    BaseNotFound(i64),
    /// The base already sits at the terminal tier.
    #[error("base tier {0} has no further upgrade")]
    TierIsTerminal(BaseTier),
    /// A chosen menu/option index was out of range.
    #[error("invalid selection index {0}")]
    InvalidSelection(usize),
    /// The treasury cannot cover the charge; nothing was debited.
    #[error("insufficient cash: need {needed}, have {available}")]
    InsufficientCash {
        /// Amount the operation would charge.
        needed: Decimal,
        /// Cash currently available.
        available: Decimal,
    },
    /// An economic action was attempted on a finished save.
    #[error("game is over with status {0}")]
    GameOver(SaveStatus),
    /// A transactional step failed and rolled back; recoverable.
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

impl GameError {
    /// Validation errors leave state untouched by construction;
    /// persistence errors leave it untouched by rollback.
    pub fn is_validation(&self) -> bool {
        !matches!(self, GameError::Persistence(_))
    }
}
