#![deny(warnings)]

//! Transactional game engine for Air-Cargo Tycoon.
//!
//! [`session::GameSession`] is the public surface the CLI talks to:
//! bootstrap and load, purchases, upgrades, offer generation/acceptance,
//! and the day-advancement machinery in [`day`] and [`fastforward`].
//! Every mutating operation is a single database transaction: it commits
//! whole or rolls back whole, leaving cash, day and contract state exactly
//! as before the call.

pub mod day;
pub mod error;
pub mod fastforward;
pub mod session;

#[cfg(test)]
mod testutil;

pub use day::{advance_day, process_billing, BillingOutcome, DaySummary};
pub use error::GameError;
pub use fastforward::{
    fast_forward, fast_forward_until_first_return, FastForwardSummary, StopReason,
};
pub use session::{
    BaseUpgradeReceipt, FleetEntry, GameSession, NewGameParams, UpgradeReceipt,
};
