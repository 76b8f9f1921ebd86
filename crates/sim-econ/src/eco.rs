//! Eco multiplier resolution.
//!
//! The effective multiplier is additive in the upgrade level and clamped to
//! class-specific bounds: `effective = clamp(base + level * delta, lo, hi)`.
//! The same resolved value feeds menu previews and reward computation so a
//! quoted multiplier can never differ from the charged one.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sim_core::config::{EcoClassRule, EconomyConfig};
use sim_core::UpgradeState;

/// Resolve the effective eco multiplier for an aircraft.
///
/// `base` is the model-level multiplier and may be negative (a subsidy);
/// non-finite values degrade to 0.0. The per-aircraft `eco_floor` tightens
/// the lower bound only when it is negative, so a non-negative floor never
/// suppresses an intentionally negative base value. If the combined lower
/// bound exceeds the class maximum, the result collapses to the maximum.
pub fn effective_eco_multiplier(base: f64, level: i64, eco_floor: f64, rule: &EcoClassRule) -> f64 {
    let base = if base.is_finite() { base } else { 0.0 };
    let level = level.max(0);

    let mut lo = if eco_floor < 0.0 {
        rule.min.max(eco_floor)
    } else {
        rule.min
    };
    let hi = rule.max;
    if lo > hi {
        lo = hi;
    }

    let effective = base + (level as f64) * rule.delta;
    effective.clamp(lo, hi)
}

/// Map a resolved eco delta to the bounded reward factor:
/// `clamp(1 + delta, mult_min, mult_max)`.
pub fn reward_factor(eco_delta: f64, economy: &EconomyConfig) -> Decimal {
    let raw = Decimal::from_f64(1.0 + eco_delta).unwrap_or(Decimal::ONE);
    raw.clamp(economy.mult_min, economy.mult_max)
}

/// Current-vs-next-level eco values for upgrade menus.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EcoPreview {
    /// Current upgrade level.
    pub current_level: i64,
    /// Effective multiplier at the current level.
    pub current_eco: f64,
    /// Level after the next upgrade.
    pub next_level: i64,
    /// Effective multiplier after the next upgrade.
    pub next_eco: f64,
}

/// Compute the upgrade preview without mutating anything.
pub fn preview_next_level(base: f64, state: &UpgradeState, rule: &EcoClassRule) -> EcoPreview {
    let level = state.level.max(0);
    EcoPreview {
        current_level: level,
        current_eco: effective_eco_multiplier(base, level, state.eco_floor, rule),
        next_level: level + 1,
        next_eco: effective_eco_multiplier(base, level + 1, state.eco_floor, rule),
    }
}
