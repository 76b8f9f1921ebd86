//! Upgrade pricing.
//!
//! Aircraft eco levels follow a geometric growth curve: STARTER aircraft
//! use a fixed base, everything else a base derived from the purchase
//! price with a configured minimum. The returned cost is the price of that
//! single level, not cumulative.

use rust_decimal::Decimal;
use sim_core::config::UpgradeCostConfig;
use sim_core::{round_money, AircraftCategory, BaseTier};

/// Price of upgrading an aircraft to `next_level` (current level + 1).
///
/// `cost = base * growth^(next_level - 1)`, rounded half-up to cents.
/// Levels below 1 are treated as 1.
pub fn aircraft_upgrade_cost(
    category: AircraftCategory,
    purchase_price: Decimal,
    next_level: i64,
    cfg: &UpgradeCostConfig,
) -> Decimal {
    let (base, growth) = if category == AircraftCategory::Starter {
        (cfg.starter_base_cost, cfg.starter_growth)
    } else {
        let pct_base = purchase_price * cfg.non_starter_base_pct;
        (cfg.non_starter_min_base.max(pct_base), cfg.non_starter_growth)
    };

    // Levels stay small; repeated multiplication avoids pulling in the
    // Decimal maths feature for a pow.
    let mut cost = base;
    for _ in 1..next_level.max(1) {
        cost *= growth;
    }
    round_money(cost)
}

/// Price of moving a base from `from` to the next tier:
/// `founding cost * transition percentage`. `None` at the terminal tier.
pub fn base_tier_upgrade_cost(
    purchase_cost: Decimal,
    from: BaseTier,
    cfg: &UpgradeCostConfig,
) -> Option<Decimal> {
    let pct = cfg.tier_transition_pct(from)?;
    Some(round_money(purchase_cost * pct))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn starter_level_one_is_base_cost() {
        let cfg = UpgradeCostConfig::default();
        let c = aircraft_upgrade_cost(AircraftCategory::Starter, Decimal::ZERO, 1, &cfg);
        assert_eq!(c, Decimal::new(10_000_000, 2)); // 100 000.00
    }

    #[test]
    fn starter_growth_compounds() {
        let cfg = UpgradeCostConfig::default();
        let l2 = aircraft_upgrade_cost(AircraftCategory::Starter, Decimal::ZERO, 2, &cfg);
        assert_eq!(l2, Decimal::new(12_500_000, 2)); // 100 000 * 1.25
        let l3 = aircraft_upgrade_cost(AircraftCategory::Starter, Decimal::ZERO, 3, &cfg);
        assert_eq!(l3, Decimal::new(15_625_000, 2)); // 100 000 * 1.25^2
    }

    #[test]
    fn non_starter_base_respects_minimum() {
        let cfg = UpgradeCostConfig::default();
        // 10 % of 500 000 is below the 100 000 floor.
        let cheap = aircraft_upgrade_cost(
            AircraftCategory::Small,
            Decimal::new(500_000, 0),
            1,
            &cfg,
        );
        assert_eq!(cheap, Decimal::new(10_000_000, 2));
        // 10 % of 32 000 000 is 3 200 000.
        let jet = aircraft_upgrade_cost(
            AircraftCategory::Medium,
            Decimal::new(32_000_000, 0),
            1,
            &cfg,
        );
        assert_eq!(jet, Decimal::new(320_000_000, 2));
    }

    #[test]
    fn level_below_one_priced_as_level_one() {
        let cfg = UpgradeCostConfig::default();
        let a = aircraft_upgrade_cost(AircraftCategory::Starter, Decimal::ZERO, 0, &cfg);
        let b = aircraft_upgrade_cost(AircraftCategory::Starter, Decimal::ZERO, 1, &cfg);
        assert_eq!(a, b);
    }

    #[test]
    fn base_tier_costs_match_percentages() {
        let cfg = UpgradeCostConfig::default();
        let founding = Decimal::new(90_000, 0);
        assert_eq!(
            base_tier_upgrade_cost(founding, BaseTier::Small, &cfg),
            Some(Decimal::new(4_500_000, 2)) // 45 000.00
        );
        assert_eq!(
            base_tier_upgrade_cost(founding, BaseTier::Medium, &cfg),
            Some(Decimal::new(8_100_000, 2)) // 81 000.00
        );
        assert_eq!(
            base_tier_upgrade_cost(founding, BaseTier::Large, &cfg),
            Some(Decimal::new(13_500_000, 2)) // 135 000.00
        );
        assert_eq!(base_tier_upgrade_cost(founding, BaseTier::Huge, &cfg), None);
    }

    proptest! {
        #[test]
        fn cost_monotonic_in_level(level in 1i64..20, price in 0i64..1_000_000_000) {
            let cfg = UpgradeCostConfig::default();
            let p = Decimal::new(price, 0);
            for cat in [AircraftCategory::Starter, AircraftCategory::Large] {
                let a = aircraft_upgrade_cost(cat, p, level, &cfg);
                let b = aircraft_upgrade_cost(cat, p, level + 1, &cfg);
                prop_assert!(b >= a);
            }
        }
    }
}
