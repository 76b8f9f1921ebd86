#![deny(warnings)]

//! Core domain models and invariants for Air-Cargo Tycoon.
//!
//! This crate defines serializable types used across the simulation, the
//! status enums with their database string forms, money rounding, and
//! validation helpers to guarantee basic invariants.

pub mod catalog;
pub mod config;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Round a currency amount to two decimal places, half-up.
///
/// All persisted or displayed money goes through this helper so cost
/// previews and actual charges never diverge.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Errors for malformed persisted values and broken domain invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// A status/category column held a string no enum variant maps to.
    #[error("unknown {kind} value: {value}")]
    UnknownEnumValue {
        /// Which enum was being parsed.
        kind: &'static str,
        /// The offending string.
        value: String,
    },
    /// Contract deadline must not precede its creation day.
    #[error("deadline day {deadline_day} precedes creation day {created_day}")]
    DeadlineBeforeCreation {
        /// Day the contract was created.
        created_day: i64,
        /// Day the contract is due.
        deadline_day: i64,
    },
    /// Flight arrival must not precede departure.
    #[error("arrival day {arrival_day} precedes departure day {dep_day}")]
    ArrivalBeforeDeparture {
        /// Departure day.
        dep_day: i64,
        /// Arrival day.
        arrival_day: i64,
    },
    /// Price or cost must be non-negative.
    #[error("negative monetary value is invalid")]
    NegativeMoney,
}

/// Lifecycle of a whole game save.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveStatus {
    /// The company is solvent and playable.
    Active,
    /// Monthly bills exceeded cash; terminal.
    Bankrupt,
    /// Survival target reached while still active; terminal.
    Victory,
}

impl SaveStatus {
    /// Database string form.
    pub fn as_str(self) -> &'static str {
        match self {
            SaveStatus::Active => "ACTIVE",
            SaveStatus::Bankrupt => "BANKRUPT",
            SaveStatus::Victory => "VICTORY",
        }
    }

    /// Terminal saves accept no further income-producing actions.
    pub fn is_terminal(self) -> bool {
        !matches!(self, SaveStatus::Active)
    }
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SaveStatus {
    type Err = DomainError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(SaveStatus::Active),
            "BANKRUPT" => Ok(SaveStatus::Bankrupt),
            "VICTORY" => Ok(SaveStatus::Victory),
            other => Err(DomainError::UnknownEnumValue {
                kind: "save status",
                value: other.to_string(),
            }),
        }
    }
}

/// Whether an aircraft is available for a new contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AircraftStatus {
    /// Parked and assignable.
    Idle,
    /// Flying exactly one ENROUTE flight.
    Busy,
}

impl AircraftStatus {
    /// Database string form.
    pub fn as_str(self) -> &'static str {
        match self {
            AircraftStatus::Idle => "IDLE",
            AircraftStatus::Busy => "BUSY",
        }
    }
}

impl fmt::Display for AircraftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AircraftStatus {
    type Err = DomainError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IDLE" => Ok(AircraftStatus::Idle),
            "BUSY" => Ok(AircraftStatus::Busy),
            other => Err(DomainError::UnknownEnumValue {
                kind: "aircraft status",
                value: other.to_string(),
            }),
        }
    }
}

/// Flight lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightStatus {
    /// In the air until `arrival_day` is reached.
    Enroute,
    /// Resolved by the day advancer.
    Arrived,
}

impl FlightStatus {
    /// Database string form.
    pub fn as_str(self) -> &'static str {
        match self {
            FlightStatus::Enroute => "ENROUTE",
            FlightStatus::Arrived => "ARRIVED",
        }
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlightStatus {
    type Err = DomainError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ENROUTE" => Ok(FlightStatus::Enroute),
            "ARRIVED" => Ok(FlightStatus::Arrived),
            other => Err(DomainError::UnknownEnumValue {
                kind: "flight status",
                value: other.to_string(),
            }),
        }
    }
}

/// Contract lifecycle. Contracts settle together with their flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractStatus {
    /// Accepted, flight enroute.
    InProgress,
    /// Delivered on or before the deadline; full reward paid.
    Completed,
    /// Delivered after the deadline; penalty deducted from the reward.
    CompletedLate,
}

impl ContractStatus {
    /// Database string form.
    pub fn as_str(self) -> &'static str {
        match self {
            ContractStatus::InProgress => "IN_PROGRESS",
            ContractStatus::Completed => "COMPLETED",
            ContractStatus::CompletedLate => "COMPLETED_LATE",
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractStatus {
    type Err = DomainError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN_PROGRESS" => Ok(ContractStatus::InProgress),
            "COMPLETED" => Ok(ContractStatus::Completed),
            "COMPLETED_LATE" => Ok(ContractStatus::CompletedLate),
            other => Err(DomainError::UnknownEnumValue {
                kind: "contract status",
                value: other.to_string(),
            }),
        }
    }
}

/// Ordered aircraft classification. STARTER is the non-purchasable gift
/// class; the rest gate catalog visibility by base tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AircraftCategory {
    /// One-time starting gift, separate cost curves.
    Starter,
    /// Small cargo aircraft.
    Small,
    /// Medium cargo aircraft.
    Medium,
    /// Large cargo aircraft.
    Large,
    /// Heavy freighters.
    Huge,
}

impl AircraftCategory {
    /// Database string form.
    pub fn as_str(self) -> &'static str {
        match self {
            AircraftCategory::Starter => "STARTER",
            AircraftCategory::Small => "SMALL",
            AircraftCategory::Medium => "MEDIUM",
            AircraftCategory::Large => "LARGE",
            AircraftCategory::Huge => "HUGE",
        }
    }

    /// Tier rank used for shop gating; STARTER ranks below every base tier.
    pub fn tier_rank(self) -> i64 {
        match self {
            AircraftCategory::Starter => 0,
            AircraftCategory::Small => 1,
            AircraftCategory::Medium => 2,
            AircraftCategory::Large => 3,
            AircraftCategory::Huge => 4,
        }
    }
}

impl fmt::Display for AircraftCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AircraftCategory {
    type Err = DomainError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STARTER" => Ok(AircraftCategory::Starter),
            "SMALL" => Ok(AircraftCategory::Small),
            "MEDIUM" => Ok(AircraftCategory::Medium),
            "LARGE" => Ok(AircraftCategory::Large),
            "HUGE" => Ok(AircraftCategory::Huge),
            other => Err(DomainError::UnknownEnumValue {
                kind: "aircraft category",
                value: other.to_string(),
            }),
        }
    }
}

/// Base facility size tier, strictly increasing through upgrades.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BaseTier {
    /// Initial tier for every founded base.
    Small,
    /// Second tier.
    Medium,
    /// Third tier.
    Large,
    /// Terminal tier; no further upgrade exists.
    Huge,
}

impl BaseTier {
    /// Database string form.
    pub fn as_str(self) -> &'static str {
        match self {
            BaseTier::Small => "SMALL",
            BaseTier::Medium => "MEDIUM",
            BaseTier::Large => "LARGE",
            BaseTier::Huge => "HUGE",
        }
    }

    /// Rank for comparisons against [`AircraftCategory::tier_rank`].
    pub fn rank(self) -> i64 {
        match self {
            BaseTier::Small => 1,
            BaseTier::Medium => 2,
            BaseTier::Large => 3,
            BaseTier::Huge => 4,
        }
    }

    /// The next tier up, or `None` at the terminal tier.
    pub fn next(self) -> Option<BaseTier> {
        match self {
            BaseTier::Small => Some(BaseTier::Medium),
            BaseTier::Medium => Some(BaseTier::Large),
            BaseTier::Large => Some(BaseTier::Huge),
            BaseTier::Huge => None,
        }
    }
}

impl fmt::Display for BaseTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BaseTier {
    type Err = DomainError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SMALL" => Ok(BaseTier::Small),
            "MEDIUM" => Ok(BaseTier::Medium),
            "LARGE" => Ok(BaseTier::Large),
            "HUGE" => Ok(BaseTier::Huge),
            other => Err(DomainError::UnknownEnumValue {
                kind: "base tier",
                value: other.to_string(),
            }),
        }
    }
}

/// One game save: the company identity, calendar and treasury.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSave {
    /// Row id.
    pub save_id: i64,
    /// Company/player name.
    pub player_name: String,
    /// Simulated day, monotonically increasing from 1.
    pub current_day: i64,
    /// Treasury, fixed-point currency.
    pub cash: Decimal,
    /// Stored difficulty label; the engine does not consult it.
    pub difficulty: String,
    /// Lifecycle status.
    pub status: SaveStatus,
    /// Seed for reproducible offer generation.
    pub rng_seed: Option<i64>,
}

/// A static catalog entry describing an aircraft model.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AircraftModel {
    /// Catalog key, e.g. "DC3FREE".
    pub model_code: String,
    /// Manufacturer name.
    pub manufacturer: String,
    /// Human-readable model name.
    pub model_name: String,
    /// List price.
    pub purchase_price: Decimal,
    /// Cargo capacity in kilograms.
    pub base_cargo_kg: i64,
    /// Maximum range in kilometres.
    pub range_km: f64,
    /// Cruise speed in knots.
    pub cruise_speed_kts: f64,
    /// Size/category classification.
    pub category: AircraftCategory,
    /// Base environmental fee multiplier; may be negative.
    pub eco_fee_multiplier: f64,
    /// Eco class letter (A best .. E worst) selecting upgrade rules.
    pub eco_class: String,
}

/// An owned aircraft.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Aircraft {
    /// Row id.
    pub aircraft_id: i64,
    /// Owning save.
    pub save_id: i64,
    /// Catalog reference.
    pub model_code: String,
    /// Tail registration.
    pub registration: String,
    /// Optional player-given name.
    pub nickname: Option<String>,
    /// Where the aircraft is parked (or will land).
    pub current_airport_ident: String,
    /// Day the aircraft joined the fleet.
    pub acquired_day: i64,
    /// Actual price paid (0 for the gift starter).
    pub purchase_price: Decimal,
    /// Airframe condition, 0-100.
    pub condition_percent: i64,
    /// IDLE or BUSY; BUSY iff exactly one flight is ENROUTE.
    pub status: AircraftStatus,
    /// Accumulated flight hours.
    pub hours_flown: f64,
    /// Day the aircraft was sold, if retired (never hard-deleted).
    pub sold_day: Option<i64>,
    /// Sale price, if retired.
    pub sale_price: Option<Decimal>,
    /// Home base reference.
    pub base_id: Option<i64>,
}

impl Aircraft {
    /// Active aircraft count for billing and views; soft-retired planes
    /// keep their history rows but stop costing maintenance.
    pub fn is_active(&self) -> bool {
        matches!(self.sold_day, None | Some(0))
    }
}

/// Current upgrade state of one aircraft, derived from the most recent
/// history row (never stored as a mutable field).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpgradeState {
    /// Current level; 0 when no history rows exist.
    pub level: i64,
    /// Reserved per-aircraft delta override recorded at installation.
    pub eco_factor_per_level: f64,
    /// Lower bound applied to the eco multiplier only when negative.
    pub eco_floor: f64,
}

/// An accepted cargo commitment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Contract {
    /// Row id.
    pub contract_id: i64,
    /// Owning save.
    pub save_id: i64,
    /// Assigned aircraft.
    pub aircraft_id: i64,
    /// Destination airport ident.
    pub dest_ident: String,
    /// Cargo mass in kilograms.
    pub payload_kg: i64,
    /// Reward on on-time completion.
    pub reward: Decimal,
    /// Deducted from the reward when late; never pushes the payout negative.
    pub penalty: Decimal,
    /// Day the offer was accepted and the contract created.
    pub created_day: i64,
    /// Due day; `deadline_day >= created_day`.
    pub deadline_day: i64,
    /// Equal to `created_day` for accepted offers.
    pub accepted_day: i64,
    /// Settlement day, set when the flight arrives.
    pub completed_day: Option<i64>,
    /// Lifecycle status.
    pub status: ContractStatus,
}

/// The physical movement record fulfilling a contract, one-to-one.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Flight {
    /// Row id.
    pub flight_id: i64,
    /// Owning save.
    pub save_id: i64,
    /// The contract this flight fulfils.
    pub contract_id: i64,
    /// Flying aircraft.
    pub aircraft_id: i64,
    /// Departure airport ident.
    pub dep_ident: String,
    /// Arrival airport ident.
    pub arr_ident: String,
    /// Departure day.
    pub dep_day: i64,
    /// Arrival day; `arrival_day >= dep_day`.
    pub arrival_day: i64,
    /// ENROUTE until the day advancer resolves it.
    pub status: FlightStatus,
    /// Full shuttle distance (leg distance times trips).
    pub distance_km: f64,
}

/// An owned base facility with its derived tier.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OwnedBase {
    /// Row id.
    pub base_id: i64,
    /// Owning save.
    pub save_id: i64,
    /// Airport ident the base sits at.
    pub base_ident: String,
    /// Display name.
    pub base_name: String,
    /// Day the base was founded.
    pub acquired_day: i64,
    /// Price paid at founding; tier upgrade costs scale from it.
    pub purchase_cost: Decimal,
    /// Current tier, derived from the latest `base_upgrades` row.
    pub tier: BaseTier,
}

/// An airport known to the geography lookup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Airport {
    /// ICAO ident.
    pub ident: String,
    /// Display name.
    pub name: Option<String>,
    /// small_airport / medium_airport / large_airport.
    pub airport_type: String,
    /// Latitude in degrees, if known.
    pub latitude_deg: Option<f64>,
    /// Longitude in degrees, if known.
    pub longitude_deg: Option<f64>,
}

impl Airport {
    /// Coordinates when both components are present.
    pub fn coords(&self) -> Option<(f64, f64)> {
        match (self.latitude_deg, self.longitude_deg) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Validate a contract's day ordering and money signs.
pub fn validate_contract(c: &Contract) -> Result<(), DomainError> {
    if c.deadline_day < c.created_day {
        return Err(DomainError::DeadlineBeforeCreation {
            created_day: c.created_day,
            deadline_day: c.deadline_day,
        });
    }
    if c.reward < Decimal::ZERO || c.penalty < Decimal::ZERO {
        return Err(DomainError::NegativeMoney);
    }
    Ok(())
}

/// Validate a flight's day ordering.
pub fn validate_flight(f: &Flight) -> Result<(), DomainError> {
    if f.arrival_day < f.dep_day {
        return Err(DomainError::ArrivalBeforeDeparture {
            dep_day: f.dep_day,
            arrival_day: f.arrival_day,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn round_money_is_half_up() {
        assert_eq!(round_money(Decimal::new(12345, 3)), Decimal::new(1235, 2)); // 12.345 -> 12.35
        assert_eq!(round_money(Decimal::new(12344, 3)), Decimal::new(1234, 2)); // 12.344 -> 12.34
        assert_eq!(round_money(Decimal::new(-12345, 3)), Decimal::new(-1235, 2));
    }

    #[test]
    fn status_strings_roundtrip() {
        for s in [SaveStatus::Active, SaveStatus::Bankrupt, SaveStatus::Victory] {
            assert_eq!(s.as_str().parse::<SaveStatus>().unwrap(), s);
        }
        for s in [ContractStatus::InProgress, ContractStatus::Completed, ContractStatus::CompletedLate] {
            assert_eq!(s.as_str().parse::<ContractStatus>().unwrap(), s);
        }
        assert!("JETLAGGED".parse::<SaveStatus>().is_err());
    }

    #[test]
    fn terminal_statuses() {
        assert!(!SaveStatus::Active.is_terminal());
        assert!(SaveStatus::Bankrupt.is_terminal());
        assert!(SaveStatus::Victory.is_terminal());
    }

    #[test]
    fn base_tier_progression_ends_at_huge() {
        assert_eq!(BaseTier::Small.next(), Some(BaseTier::Medium));
        assert_eq!(BaseTier::Medium.next(), Some(BaseTier::Large));
        assert_eq!(BaseTier::Large.next(), Some(BaseTier::Huge));
        assert_eq!(BaseTier::Huge.next(), None);
    }

    #[test]
    fn starter_ranks_below_every_base_tier() {
        assert!(AircraftCategory::Starter.tier_rank() < BaseTier::Small.rank());
        assert_eq!(AircraftCategory::Huge.tier_rank(), BaseTier::Huge.rank());
    }

    #[test]
    fn save_serde_roundtrip() {
        let save = GameSave {
            save_id: 1,
            player_name: "Aurora Cargo".to_string(),
            current_day: 42,
            cash: Decimal::new(30_000_000, 2),
            difficulty: "NORMAL".to_string(),
            status: SaveStatus::Active,
            rng_seed: Some(7),
        };
        let s = serde_json::to_string(&save).unwrap();
        let back: GameSave = serde_json::from_str(&s).unwrap();
        assert_eq!(back.current_day, 42);
        assert_eq!(back.cash, Decimal::new(30_000_000, 2));
    }

    #[test]
    fn contract_day_ordering_enforced() {
        let mut c = Contract {
            contract_id: 1,
            save_id: 1,
            aircraft_id: 1,
            dest_ident: "EGLL".to_string(),
            payload_kg: 1000,
            reward: Decimal::new(50_000, 2),
            penalty: Decimal::new(12_500, 2),
            created_day: 10,
            deadline_day: 12,
            accepted_day: 10,
            completed_day: None,
            status: ContractStatus::InProgress,
        };
        assert!(validate_contract(&c).is_ok());
        c.deadline_day = 9;
        assert!(validate_contract(&c).is_err());
    }

    proptest! {
        #[test]
        fn round_money_idempotent(units in -1_000_000_000i64..1_000_000_000, scale in 0u32..6) {
            let d = Decimal::new(units, scale);
            let once = round_money(d);
            prop_assert_eq!(once, round_money(once));
            prop_assert!(once.scale() <= 2);
        }

        #[test]
        fn flight_validation_total(dep in 0i64..10_000, len in -5i64..5_000) {
            let f = Flight {
                flight_id: 1,
                save_id: 1,
                contract_id: 1,
                aircraft_id: 1,
                dep_ident: "EFHK".to_string(),
                arr_ident: "EGLL".to_string(),
                dep_day: dep,
                arrival_day: dep + len,
                status: FlightStatus::Enroute,
                distance_km: 1000.0,
            };
            prop_assert_eq!(validate_flight(&f).is_ok(), len >= 0);
        }
    }
}
