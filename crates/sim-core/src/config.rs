//! Immutable balance configuration.
//!
//! Every tunable the engine consults lives here, loaded once at process
//! start and passed by reference into the components that need it.

use crate::BaseTier;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Upgrade code under which aircraft eco history rows are recorded.
pub const ECO_UPGRADE_CODE: &str = "ECO";

/// Per-eco-class additive upgrade rule.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EcoClassRule {
    /// Multiplier delta added per upgrade level.
    pub delta: f64,
    /// Class lower bound for the effective multiplier.
    pub min: f64,
    /// Class upper bound for the effective multiplier.
    pub max: f64,
}

const FALLBACK_RULE: EcoClassRule = EcoClassRule {
    delta: 0.05,
    min: -0.50,
    max: 0.50,
};

/// Eco upgrade parameters and the class rule table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EcoConfig {
    /// Default per-level delta recorded on history rows (reserved override).
    pub default_factor_per_level: f64,
    /// Default floor recorded on history rows; applied only when negative.
    pub default_floor: f64,
    /// Rules keyed by eco class letter, with a DEFAULT entry.
    pub class_rules: BTreeMap<String, EcoClassRule>,
}

impl EcoConfig {
    /// Rule for an eco class, falling back to DEFAULT for unknown classes.
    pub fn rule_for(&self, eco_class: &str) -> &EcoClassRule {
        let key = eco_class.trim().to_uppercase();
        self.class_rules
            .get(&key)
            .or_else(|| self.class_rules.get("DEFAULT"))
            .unwrap_or(&FALLBACK_RULE)
    }
}

impl Default for EcoConfig {
    fn default() -> Self {
        let mut rules = BTreeMap::new();
        rules.insert("A".to_string(), EcoClassRule { delta: 0.06, min: -0.60, max: 0.40 });
        rules.insert("B".to_string(), EcoClassRule { delta: 0.05, min: -0.50, max: 0.50 });
        rules.insert("C".to_string(), EcoClassRule { delta: 0.04, min: -0.40, max: 0.60 });
        rules.insert("D".to_string(), EcoClassRule { delta: 0.03, min: -0.30, max: 0.70 });
        rules.insert("E".to_string(), EcoClassRule { delta: 0.02, min: -0.20, max: 0.80 });
        rules.insert("DEFAULT".to_string(), FALLBACK_RULE);
        EcoConfig {
            default_factor_per_level: 0.1,
            default_floor: 0.50,
            class_rules: rules,
        }
    }
}

/// Offer economics: reward composition, penalty ratio and factor bounds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EconomyConfig {
    /// Reward per kilogram of payload.
    pub reward_per_kg: Decimal,
    /// Reward per kilometre of leg distance.
    pub reward_per_km: Decimal,
    /// Floor preventing negligible offers on short hops.
    pub min_reward: Decimal,
    /// Penalty as a fraction of the reward.
    pub penalty_ratio: Decimal,
    /// Lower bound of the reward factor derived from the eco delta.
    pub mult_min: Decimal,
    /// Upper bound of the reward factor.
    pub mult_max: Decimal,
    /// Offers produced per request.
    pub offers_per_request: usize,
    /// Candidate oversampling factor tolerating missing geodata.
    pub oversample_factor: usize,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        EconomyConfig {
            reward_per_kg: Decimal::new(50, 2),     // 0.50
            reward_per_km: Decimal::new(120, 2),    // 1.20
            min_reward: Decimal::new(50_000, 2),    // 500.00
            penalty_ratio: Decimal::new(25, 2),     // 0.25
            mult_min: Decimal::new(50, 2),          // 0.50
            mult_max: Decimal::new(300, 2),         // 3.00
            offers_per_request: 5,
            oversample_factor: 2,
        }
    }
}

/// Upgrade pricing curves for aircraft and base tiers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpgradeCostConfig {
    /// First-level price for STARTER aircraft.
    pub starter_base_cost: Decimal,
    /// Growth factor per level for STARTER aircraft.
    pub starter_growth: Decimal,
    /// Non-starter base as a fraction of the purchase price.
    pub non_starter_base_pct: Decimal,
    /// Minimum non-starter base price.
    pub non_starter_min_base: Decimal,
    /// Growth factor per level for non-starter aircraft.
    pub non_starter_growth: Decimal,
}

impl UpgradeCostConfig {
    /// Fixed base-tier transition percentage of the founding cost.
    /// Returns `None` at the terminal tier.
    pub fn tier_transition_pct(&self, from: BaseTier) -> Option<Decimal> {
        match from {
            BaseTier::Small => Some(Decimal::new(50, 2)),   // -> MEDIUM, 50 %
            BaseTier::Medium => Some(Decimal::new(90, 2)),  // -> LARGE, 90 %
            BaseTier::Large => Some(Decimal::new(150, 2)),  // -> HUGE, 150 %
            BaseTier::Huge => None,
        }
    }
}

impl Default for UpgradeCostConfig {
    fn default() -> Self {
        UpgradeCostConfig {
            starter_base_cost: Decimal::new(100_000, 0),
            starter_growth: Decimal::new(125, 2),       // 1.25
            non_starter_base_pct: Decimal::new(10, 2),  // 0.10
            non_starter_min_base: Decimal::new(100_000, 0),
            non_starter_growth: Decimal::new(120, 2),   // 1.20
        }
    }
}

/// Recurring billing charged every `cycle_days`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BillingConfig {
    /// Fixed headquarters fee per cycle.
    pub hq_monthly_fee: Decimal,
    /// Maintenance per active aircraft per cycle.
    pub maint_per_aircraft: Decimal,
    /// Maintenance factor for STARTER aircraft (1.00 = no discount).
    pub starter_maint_discount: Decimal,
    /// Billing cycle length in days.
    pub cycle_days: i64,
}

impl Default for BillingConfig {
    fn default() -> Self {
        BillingConfig {
            hq_monthly_fee: Decimal::new(2_500_000, 2),    // 25 000.00
            maint_per_aircraft: Decimal::new(500_000, 2),  // 5 000.00
            starter_maint_discount: Decimal::ONE,
            cycle_days: 30,
        }
    }
}

/// Survival goal.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GoalConfig {
    /// Days the company must survive for victory.
    pub survival_target_days: i64,
}

impl Default for GoalConfig {
    fn default() -> Self {
        GoalConfig {
            survival_target_days: 666,
        }
    }
}

/// A founding-base choice offered at the start of a new game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StartingBaseOption {
    /// Airport ident.
    pub ident: String,
    /// Display name.
    pub name: String,
    /// Price as a fraction of the starting cash.
    pub cost_factor: Decimal,
}

/// The whole session configuration, immutable after load.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GameConfig {
    /// Eco upgrade rules.
    pub eco: EcoConfig,
    /// Offer economics.
    pub economy: EconomyConfig,
    /// Upgrade pricing.
    pub upgrade_costs: UpgradeCostConfig,
    /// Recurring billing.
    pub billing: BillingConfig,
    /// Survival goal.
    pub goal: GoalConfig,
    /// First-base options for new games.
    pub starting_bases: Vec<StartingBaseOption>,
}

impl GameConfig {
    /// The stock configuration with the default starting-base options.
    pub fn standard() -> Self {
        GameConfig {
            starting_bases: vec![
                StartingBaseOption {
                    ident: "EFHK".to_string(),
                    name: "Helsinki-Vantaa".to_string(),
                    cost_factor: Decimal::new(30, 2),
                },
                StartingBaseOption {
                    ident: "LFPG".to_string(),
                    name: "Paris Charles de Gaulle".to_string(),
                    cost_factor: Decimal::new(50, 2),
                },
                StartingBaseOption {
                    ident: "KJFK".to_string(),
                    name: "New York JFK".to_string(),
                    cost_factor: Decimal::new(70, 2),
                },
            ],
            ..GameConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_class_falls_back_to_default() {
        let eco = EcoConfig::default();
        assert_eq!(eco.rule_for("Z"), eco.rule_for("DEFAULT"));
        assert_eq!(eco.rule_for(" b "), eco.rule_for("B"));
    }

    #[test]
    fn tier_transition_table_matches_design() {
        let costs = UpgradeCostConfig::default();
        assert_eq!(costs.tier_transition_pct(BaseTier::Small), Some(Decimal::new(50, 2)));
        assert_eq!(costs.tier_transition_pct(BaseTier::Medium), Some(Decimal::new(90, 2)));
        assert_eq!(costs.tier_transition_pct(BaseTier::Large), Some(Decimal::new(150, 2)));
        assert_eq!(costs.tier_transition_pct(BaseTier::Huge), None);
    }

    #[test]
    fn standard_config_has_three_starting_bases() {
        let cfg = GameConfig::standard();
        assert_eq!(cfg.starting_bases.len(), 3);
        assert!(cfg.starting_bases.iter().any(|b| b.ident == "EFHK"));
    }
}
