//! Cargo offer generation.
//!
//! Offers are valid for the current day only and are never persisted unless
//! accepted. Payload ranges scale with the distance tier and deliberately
//! may exceed aircraft capacity: excess loads turn into a multi-leg shuttle
//! where each extra trip repeats the base flight duration.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sim_core::config::EconomyConfig;
use sim_core::round_money;

use crate::eco::reward_factor;

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Knots to kilometres flown per simulated day.
const KTS_TO_KM_PER_DAY: f64 = 1.852 * 24.0;

/// Great-circle distance between two coordinates in kilometres.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// The performance figures offer math needs from an aircraft model.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct AircraftPerf {
    /// Cargo capacity in kilograms.
    pub capacity_kg: i64,
    /// Cruise speed in knots.
    pub cruise_speed_kts: f64,
}

/// A candidate destination as supplied by the geography lookup. Candidates
/// without coordinates are skipped during generation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DestinationCandidate {
    /// Airport ident.
    pub ident: String,
    /// Display name, if known.
    pub name: Option<String>,
    /// Coordinates, if known.
    pub coords: Option<(f64, f64)>,
}

/// One generated cargo offer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CargoOffer {
    /// Destination airport ident.
    pub dest_ident: String,
    /// Destination display name.
    pub dest_name: Option<String>,
    /// Cargo mass; may exceed aircraft capacity.
    pub payload_kg: i64,
    /// Single-leg great-circle distance in kilometres.
    pub distance_km: f64,
    /// Days one leg takes at cruise speed.
    pub base_days: i64,
    /// Shuttle rounds needed to move the whole payload.
    pub trips: i64,
    /// `base_days * trips`.
    pub total_days: i64,
    /// Payment on on-time delivery.
    pub reward: Decimal,
    /// Late-delivery deduction; never negative.
    pub penalty: Decimal,
    /// Due day including the trip-scaled buffer.
    pub deadline_day: i64,
}

/// Flight-duration math for a payload on a leg: days per leg, shuttle
/// rounds, and the resulting total duration.
pub fn shuttle_schedule(distance_km: f64, payload_kg: i64, perf: &AircraftPerf) -> (i64, i64, i64) {
    let capacity = perf.capacity_kg.max(1);
    let speed_km_per_day = (perf.cruise_speed_kts * KTS_TO_KM_PER_DAY).max(1.0);
    let base_days = ((distance_km / speed_km_per_day).ceil() as i64).max(1);
    let trips = ((payload_kg.max(1) + capacity - 1) / capacity).max(1);
    let total_days = base_days * trips;
    (base_days, trips, total_days)
}

/// Reward and penalty for a payload over a distance at a given reward
/// factor. The reward is floored at the configured minimum; the penalty is
/// a ratio of the reward and never negative.
pub fn offer_reward(
    payload_kg: i64,
    distance_km: f64,
    factor: Decimal,
    economy: &EconomyConfig,
) -> (Decimal, Decimal) {
    let dist = Decimal::from_f64(distance_km).unwrap_or_default();
    let base = Decimal::from(payload_kg) * economy.reward_per_kg + dist * economy.reward_per_km;
    let mut reward = round_money(base * factor);
    if reward < economy.min_reward {
        reward = economy.min_reward;
    }
    let mut penalty = round_money(reward * economy.penalty_ratio);
    if penalty < Decimal::ZERO {
        penalty = Decimal::ZERO;
    }
    (reward, penalty)
}

fn deadline_for(current_day: i64, total_days: i64, trips: i64) -> i64 {
    current_day + total_days + (trips / 2).max(1)
}

fn draw_payload(distance_km: f64, capacity: i64, rng: &mut impl Rng) -> i64 {
    let capacity = capacity.max(1);
    let (lo, hi) = if distance_km < 500.0 {
        ((capacity / 2).max(1), capacity * 3)
    } else if distance_km < 1500.0 {
        (capacity, capacity * 4)
    } else {
        (capacity * 2, capacity * 6)
    };
    rng.gen_range(lo..=hi.max(lo))
}

/// Generate up to `count` offers for an idle aircraft.
///
/// Candidates without coordinates are skipped, so fewer than `count` offers
/// come back when geodata is thin. Reads nothing and writes nothing.
#[allow(clippy::too_many_arguments)]
pub fn generate_offers(
    dep_coords: (f64, f64),
    candidates: &[DestinationCandidate],
    perf: &AircraftPerf,
    eco_delta: f64,
    current_day: i64,
    count: usize,
    economy: &EconomyConfig,
    rng: &mut impl Rng,
) -> Vec<CargoOffer> {
    let factor = reward_factor(eco_delta, economy);
    let mut offers = Vec::with_capacity(count);

    for cand in candidates {
        if offers.len() >= count {
            break;
        }
        let Some((lat, lon)) = cand.coords else {
            continue;
        };
        let distance_km = haversine_km(dep_coords.0, dep_coords.1, lat, lon);
        let payload_kg = draw_payload(distance_km, perf.capacity_kg, rng);
        let (base_days, trips, total_days) = shuttle_schedule(distance_km, payload_kg, perf);
        let (reward, penalty) = offer_reward(payload_kg, distance_km, factor, economy);

        offers.push(CargoOffer {
            dest_ident: cand.ident.clone(),
            dest_name: cand.name.clone(),
            payload_kg,
            distance_km,
            base_days,
            trips,
            total_days,
            reward,
            penalty,
            deadline_day: deadline_for(current_day, total_days, trips),
        });
    }

    offers
}

/// Seeded variant: a given `(seed)` always yields the same offers for the
/// same candidate list, which keeps one day's quotes reproducible.
#[allow(clippy::too_many_arguments)]
pub fn generate_offers_seeded(
    dep_coords: (f64, f64),
    candidates: &[DestinationCandidate],
    perf: &AircraftPerf,
    eco_delta: f64,
    current_day: i64,
    count: usize,
    economy: &EconomyConfig,
    seed: u64,
) -> Vec<CargoOffer> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_offers(
        dep_coords, candidates, perf, eco_delta, current_day, count, economy, &mut rng,
    )
}
