//! Typed row structs and their conversions into domain types.
//!
//! Each query maps to exactly one row shape. Money columns are stored as
//! TEXT (decimal strings, rounded to cents) and parsed back here; a parse
//! failure is a corrupt row, not a silent zero.

use crate::StoreError;
use rust_decimal::Decimal;
use sim_core::{
    round_money, Aircraft, AircraftModel, Airport, ContractStatus, FlightStatus, GameSave,
    OwnedBase, SaveStatus, UpgradeState,
};
use sqlx::FromRow;
use std::str::FromStr;

/// Serialize money for a TEXT column bind, always with a cents scale.
pub(crate) fn money_text(amount: Decimal) -> String {
    let mut cents = round_money(amount);
    cents.rescale(2);
    cents.to_string()
}

/// Parse a money TEXT column.
pub(crate) fn parse_money(text: &str, column: &str) -> Result<Decimal, StoreError> {
    Decimal::from_str(text).map_err(|e| StoreError::Corrupt(format!("{column}: {e}")))
}

/// `game_saves` row.
#[derive(Debug, Clone, FromRow)]
pub struct SaveRow {
    pub save_id: i64,
    pub player_name: String,
    pub current_day: i64,
    pub cash: String,
    pub difficulty: String,
    pub status: String,
    pub rng_seed: Option<i64>,
}

impl SaveRow {
    /// Convert into the domain save.
    pub fn into_domain(self) -> Result<GameSave, StoreError> {
        Ok(GameSave {
            save_id: self.save_id,
            player_name: self.player_name,
            current_day: self.current_day,
            cash: parse_money(&self.cash, "game_saves.cash")?,
            difficulty: self.difficulty,
            status: SaveStatus::from_str(&self.status)?,
            rng_seed: self.rng_seed,
        })
    }
}

/// `aircraft_models` row.
#[derive(Debug, Clone, FromRow)]
pub struct ModelRow {
    pub model_code: String,
    pub manufacturer: String,
    pub model_name: String,
    pub purchase_price: String,
    pub base_cargo_kg: i64,
    pub range_km: f64,
    pub cruise_speed_kts: f64,
    pub category: String,
    pub eco_fee_multiplier: f64,
    pub eco_class: String,
}

impl ModelRow {
    /// Convert into the domain model.
    pub fn into_domain(self) -> Result<AircraftModel, StoreError> {
        Ok(AircraftModel {
            purchase_price: parse_money(&self.purchase_price, "aircraft_models.purchase_price")?,
            category: self.category.parse()?,
            model_code: self.model_code,
            manufacturer: self.manufacturer,
            model_name: self.model_name,
            base_cargo_kg: self.base_cargo_kg,
            range_km: self.range_km,
            cruise_speed_kts: self.cruise_speed_kts,
            eco_fee_multiplier: self.eco_fee_multiplier,
            eco_class: self.eco_class,
        })
    }
}

/// `aircraft` row.
#[derive(Debug, Clone, FromRow)]
pub struct AircraftRow {
    pub aircraft_id: i64,
    pub save_id: i64,
    pub model_code: String,
    pub registration: String,
    pub nickname: Option<String>,
    pub current_airport_ident: String,
    pub acquired_day: i64,
    pub purchase_price: String,
    pub condition_percent: i64,
    pub status: String,
    pub hours_flown: f64,
    pub sold_day: Option<i64>,
    pub sale_price: Option<String>,
    pub base_id: Option<i64>,
}

impl AircraftRow {
    /// Convert into the domain aircraft.
    pub fn into_domain(self) -> Result<Aircraft, StoreError> {
        let sale_price = match &self.sale_price {
            Some(text) => Some(parse_money(text, "aircraft.sale_price")?),
            None => None,
        };
        Ok(Aircraft {
            aircraft_id: self.aircraft_id,
            save_id: self.save_id,
            registration: self.registration,
            nickname: self.nickname,
            current_airport_ident: self.current_airport_ident,
            acquired_day: self.acquired_day,
            purchase_price: parse_money(&self.purchase_price, "aircraft.purchase_price")?,
            condition_percent: self.condition_percent,
            status: self.status.parse()?,
            hours_flown: self.hours_flown,
            sold_day: self.sold_day,
            sale_price,
            base_id: self.base_id,
            model_code: self.model_code,
        })
    }
}

/// Aircraft joined with its model, for fleet views and offer generation.
#[derive(Debug, Clone, FromRow)]
pub struct AircraftWithModelRow {
    #[sqlx(flatten)]
    pub aircraft: AircraftRow,
    pub m_manufacturer: String,
    pub m_model_name: String,
    pub m_purchase_price: String,
    pub m_base_cargo_kg: i64,
    pub m_range_km: f64,
    pub m_cruise_speed_kts: f64,
    pub m_category: String,
    pub m_eco_fee_multiplier: f64,
    pub m_eco_class: String,
}

impl AircraftWithModelRow {
    /// Convert into the aircraft/model pair.
    pub fn into_domain(self) -> Result<(Aircraft, AircraftModel), StoreError> {
        let model = AircraftModel {
            model_code: self.aircraft.model_code.clone(),
            manufacturer: self.m_manufacturer,
            model_name: self.m_model_name,
            purchase_price: parse_money(&self.m_purchase_price, "aircraft_models.purchase_price")?,
            base_cargo_kg: self.m_base_cargo_kg,
            range_km: self.m_range_km,
            cruise_speed_kts: self.m_cruise_speed_kts,
            category: self.m_category.parse()?,
            eco_fee_multiplier: self.m_eco_fee_multiplier,
            eco_class: self.m_eco_class,
        };
        Ok((self.aircraft.into_domain()?, model))
    }
}

/// Latest `aircraft_upgrades` state row.
#[derive(Debug, Clone, FromRow)]
pub struct UpgradeStateRow {
    pub level: i64,
    pub eco_factor_per_level: f64,
    pub eco_floor: f64,
}

impl UpgradeStateRow {
    /// Convert into the derived upgrade state.
    pub fn into_domain(self) -> UpgradeState {
        UpgradeState {
            level: self.level.max(0),
            eco_factor_per_level: self.eco_factor_per_level,
            eco_floor: self.eco_floor,
        }
    }
}

/// One flight due for arrival, joined with its contract's settlement
/// figures. This is the single shape the day advancer consumes.
#[derive(Debug, Clone, FromRow)]
pub struct DueArrivalRow {
    pub flight_id: i64,
    pub contract_id: i64,
    pub aircraft_id: i64,
    pub arr_ident: String,
    pub arrival_day: i64,
    pub deadline_day: i64,
    pub reward: String,
    pub penalty: String,
}

/// Parsed due arrival.
#[derive(Debug, Clone)]
pub struct DueArrival {
    pub flight_id: i64,
    pub contract_id: i64,
    pub aircraft_id: i64,
    pub arr_ident: String,
    pub arrival_day: i64,
    pub deadline_day: i64,
    pub reward: Decimal,
    pub penalty: Decimal,
}

impl DueArrivalRow {
    /// Convert into the parsed arrival.
    pub fn into_domain(self) -> Result<DueArrival, StoreError> {
        Ok(DueArrival {
            reward: parse_money(&self.reward, "contracts.reward")?,
            penalty: parse_money(&self.penalty, "contracts.penalty")?,
            flight_id: self.flight_id,
            contract_id: self.contract_id,
            aircraft_id: self.aircraft_id,
            arr_ident: self.arr_ident,
            arrival_day: self.arrival_day,
            deadline_day: self.deadline_day,
        })
    }
}

/// `owned_bases` row joined with its latest tier history entry.
#[derive(Debug, Clone, FromRow)]
pub struct BaseWithTierRow {
    pub base_id: i64,
    pub save_id: i64,
    pub base_ident: String,
    pub base_name: String,
    pub acquired_day: i64,
    pub purchase_cost: String,
    pub tier: Option<String>,
}

impl BaseWithTierRow {
    /// Convert into the domain base; bases without history default SMALL.
    pub fn into_domain(self) -> Result<OwnedBase, StoreError> {
        let tier = match &self.tier {
            Some(code) => code.parse()?,
            None => sim_core::BaseTier::Small,
        };
        Ok(OwnedBase {
            base_id: self.base_id,
            save_id: self.save_id,
            base_ident: self.base_ident,
            base_name: self.base_name,
            acquired_day: self.acquired_day,
            purchase_cost: parse_money(&self.purchase_cost, "owned_bases.purchase_cost")?,
            tier,
        })
    }
}

/// `airports` row.
#[derive(Debug, Clone, FromRow)]
pub struct AirportRow {
    pub ident: String,
    pub name: Option<String>,
    pub airport_type: String,
    pub latitude_deg: Option<f64>,
    pub longitude_deg: Option<f64>,
}

impl AirportRow {
    /// Convert into the domain airport.
    pub fn into_domain(self) -> Airport {
        Airport {
            ident: self.ident,
            name: self.name,
            airport_type: self.airport_type,
            latitude_deg: self.latitude_deg,
            longitude_deg: self.longitude_deg,
        }
    }
}

/// Save-listing row for the load menu.
#[derive(Debug, Clone, FromRow)]
pub struct SaveSummaryRow {
    pub save_id: i64,
    pub player_name: String,
    pub current_day: i64,
    pub cash: String,
    pub difficulty: String,
    pub status: String,
    pub updated_at: String,
}

/// Parsed save summary.
#[derive(Debug, Clone)]
pub struct SaveSummary {
    pub save_id: i64,
    pub player_name: String,
    pub current_day: i64,
    pub cash: Decimal,
    pub difficulty: String,
    pub status: SaveStatus,
    pub updated_at: String,
}

impl SaveSummaryRow {
    /// Convert into the parsed summary.
    pub fn into_domain(self) -> Result<SaveSummary, StoreError> {
        Ok(SaveSummary {
            cash: parse_money(&self.cash, "game_saves.cash")?,
            status: self.status.parse()?,
            save_id: self.save_id,
            player_name: self.player_name,
            current_day: self.current_day,
            difficulty: self.difficulty,
            updated_at: self.updated_at,
        })
    }
}

/// Active-contract view row: contract joined with aircraft and flight.
#[derive(Debug, Clone, FromRow)]
pub struct ContractViewRow {
    pub contract_id: i64,
    pub dest_ident: String,
    pub payload_kg: i64,
    pub reward: String,
    pub penalty: String,
    pub deadline_day: i64,
    pub status: String,
    pub registration: Option<String>,
    pub arrival_day: Option<i64>,
    pub flight_status: Option<String>,
}

/// Parsed active-contract view.
#[derive(Debug, Clone)]
pub struct ContractView {
    pub contract_id: i64,
    pub dest_ident: String,
    pub payload_kg: i64,
    pub reward: Decimal,
    pub penalty: Decimal,
    pub deadline_day: i64,
    pub status: ContractStatus,
    pub registration: Option<String>,
    pub arrival_day: Option<i64>,
    pub flight_status: Option<FlightStatus>,
}

impl ContractViewRow {
    /// Convert into the parsed view.
    pub fn into_domain(self) -> Result<ContractView, StoreError> {
        let flight_status = match &self.flight_status {
            Some(s) => Some(s.parse::<FlightStatus>()?),
            None => None,
        };
        Ok(ContractView {
            reward: parse_money(&self.reward, "contracts.reward")?,
            penalty: parse_money(&self.penalty, "contracts.penalty")?,
            status: self.status.parse()?,
            flight_status,
            contract_id: self.contract_id,
            dest_ident: self.dest_ident,
            payload_kg: self.payload_kg,
            deadline_day: self.deadline_day,
            registration: self.registration,
            arrival_day: self.arrival_day,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_text_rounds_half_up() {
        assert_eq!(money_text(Decimal::new(12345, 3)), "12.35");
        assert_eq!(money_text(Decimal::new(100, 0)), "100.00");
    }

    #[test]
    fn parse_money_rejects_garbage() {
        assert!(parse_money("12.34", "t").is_ok());
        assert!(parse_money("NaN-ish", "t").is_err());
    }

    #[test]
    fn base_row_without_history_defaults_small() {
        let row = BaseWithTierRow {
            base_id: 1,
            save_id: 1,
            base_ident: "EFHK".to_string(),
            base_name: "Helsinki-Vantaa".to_string(),
            acquired_day: 1,
            purchase_cost: "90000.00".to_string(),
            tier: None,
        };
        let base = row.into_domain().unwrap();
        assert_eq!(base.tier, sim_core::BaseTier::Small);
    }

    #[test]
    fn corrupt_status_is_an_error_not_a_default() {
        let row = SaveRow {
            save_id: 1,
            player_name: "x".to_string(),
            current_day: 1,
            cash: "0.00".to_string(),
            difficulty: "NORMAL".to_string(),
            status: "ASLEEP".to_string(),
            rng_seed: None,
        };
        assert!(row.into_domain().is_err());
    }
}
