#![deny(warnings)]

//! Economic models for Air-Cargo Tycoon.
//!
//! Pure calculators consumed by the runtime:
//! - Eco multiplier resolution (clamped additive model) and reward factor
//! - Upgrade pricing for aircraft levels and base tiers
//! - Cargo offer generation from geographic distance
//!
//! Nothing here touches persisted state; every function is deterministic
//! given its inputs and, where randomness matters, an injected RNG.

pub mod cost;
pub mod eco;
pub mod offers;

pub use cost::{aircraft_upgrade_cost, base_tier_upgrade_cost};
pub use eco::{effective_eco_multiplier, preview_next_level, reward_factor, EcoPreview};
pub use offers::{
    generate_offers, generate_offers_seeded, haversine_km, offer_reward, shuttle_schedule,
    AircraftPerf, CargoOffer, DestinationCandidate,
};
