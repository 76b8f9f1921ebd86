//! Game session: the operation surface the CLI talks to.
//!
//! A session is a lightweight handle `(store, config, save_id)`; state
//! lives in the database and every mutating operation re-reads the save
//! row inside its own transaction before touching cash.

use crate::day::{self, DaySummary};
use crate::error::GameError;
use crate::fastforward::{self, FastForwardSummary};
use persistence::rows::{ContractView, SaveSummary};
use persistence::{queries, SqliteConnection, Store, StoreError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sim_core::config::{GameConfig, ECO_UPGRADE_CODE};
use sim_core::{
    catalog, round_money, Aircraft, AircraftCategory, AircraftModel, AircraftStatus, BaseTier,
    GameSave, OwnedBase, UpgradeState,
};
use sim_econ::{
    aircraft_upgrade_cost, base_tier_upgrade_cost, effective_eco_multiplier,
    generate_offers_seeded, preview_next_level, AircraftPerf, CargoOffer, DestinationCandidate,
    EcoPreview,
};
use tracing::{info, warn};

/// Parameters for bootstrapping a new game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewGameParams {
    /// Company/player name.
    pub player_name: String,
    /// Opening treasury.
    pub starting_cash: Decimal,
    /// Stored difficulty label.
    pub difficulty: String,
    /// Seed for reproducible offers; `None` falls back to the save id.
    pub rng_seed: Option<i64>,
    /// Index into [`GameConfig::starting_bases`].
    pub base_choice: usize,
    /// Registration for the gift STARTER aircraft (callers own string
    /// generation).
    pub gift_registration: String,
}

impl NewGameParams {
    /// Defaults: 300 000 starting cash, NORMAL difficulty, first base.
    pub fn new(player_name: &str, gift_registration: &str) -> Self {
        NewGameParams {
            player_name: player_name.to_string(),
            starting_cash: Decimal::new(300_000, 0),
            difficulty: "NORMAL".to_string(),
            rng_seed: None,
            base_choice: 0,
            gift_registration: gift_registration.to_string(),
        }
    }
}

/// One fleet listing line: aircraft, model and derived eco state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FleetEntry {
    /// The aircraft.
    pub aircraft: Aircraft,
    /// Its catalog model.
    pub model: AircraftModel,
    /// Current ECO upgrade level.
    pub eco_level: i64,
    /// Effective eco multiplier at that level.
    pub effective_eco: f64,
}

/// Receipt for a purchased aircraft ECO level.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct UpgradeReceipt {
    /// Upgraded aircraft.
    pub aircraft_id: i64,
    /// Level now installed.
    pub new_level: i64,
    /// Amount debited.
    pub cost: Decimal,
    /// Eco values before/after, from the same resolver the menus show.
    pub eco: EcoPreview,
}

/// Receipt for a base tier upgrade.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BaseUpgradeReceipt {
    /// Upgraded base.
    pub base_id: i64,
    /// Tier now installed.
    pub new_tier: BaseTier,
    /// Amount debited.
    pub cost: Decimal,
}

/// Handle to one game save.
#[derive(Clone, Debug)]
pub struct GameSession {
    store: Store,
    cfg: GameConfig,
    save_id: i64,
}

impl GameSession {
    /// Bootstrap a new game: create the save, found the chosen starting
    /// base (debiting its price) and grant the gift STARTER aircraft.
    pub async fn new_game(
        store: Store,
        cfg: GameConfig,
        params: NewGameParams,
    ) -> Result<GameSession, GameError> {
        let option = cfg
            .starting_bases
            .get(params.base_choice)
            .cloned()
            .ok_or(GameError::InvalidSelection(params.base_choice))?;
        let base_cost = round_money(params.starting_cash * option.cost_factor);

        let save_id = {
            let mut conn = store.acquire().await?;
            queries::insert_save(
                &mut conn,
                &params.player_name,
                params.starting_cash,
                &params.difficulty,
                params.rng_seed,
            )
            .await?
        };

        let session = GameSession { store, cfg, save_id };
        let base_id = session
            .found_base(&option.ident, &option.name, base_cost)
            .await?;
        session
            .grant_gift_aircraft(base_id, &option.ident, &params.gift_registration)
            .await?;
        info!(save_id, base = %option.ident, "new game bootstrapped");
        Ok(session)
    }

    /// Attach to an existing save.
    pub async fn load(store: Store, cfg: GameConfig, save_id: i64) -> Result<GameSession, GameError> {
        let mut conn = store.acquire().await?;
        queries::fetch_save(&mut conn, save_id)
            .await?
            .ok_or(GameError::SaveNotFound(save_id))?;
        drop(conn);
        Ok(GameSession { store, cfg, save_id })
    }

    /// Recent saves for a load menu.
    pub async fn list_recent(store: &Store, limit: i64) -> Result<Vec<SaveSummary>, GameError> {
        let mut conn = store.acquire().await?;
        Ok(queries::list_recent_saves(&mut conn, limit).await?)
    }

    /// The save id this session drives.
    pub fn save_id(&self) -> i64 {
        self.save_id
    }

    /// The immutable session configuration.
    pub fn config(&self) -> &GameConfig {
        &self.cfg
    }

    /// Current save state.
    pub async fn save(&self) -> Result<GameSave, GameError> {
        let mut conn = self.store.acquire().await?;
        queries::fetch_save(&mut conn, self.save_id)
            .await?
            .ok_or(GameError::SaveNotFound(self.save_id))
    }

    /// Active fleet with derived eco state per aircraft.
    pub async fn fleet(&self) -> Result<Vec<FleetEntry>, GameError> {
        let mut conn = self.store.acquire().await?;
        let pairs = queries::fleet(&mut conn, self.save_id).await?;
        let mut entries = Vec::with_capacity(pairs.len());
        for (aircraft, model) in pairs {
            let state =
                upgrade_state_or_default(&mut conn, aircraft.aircraft_id, &self.cfg).await?;
            let rule = self.cfg.eco.rule_for(&model.eco_class);
            let effective_eco = effective_eco_multiplier(
                model.eco_fee_multiplier,
                state.level,
                state.eco_floor,
                rule,
            );
            entries.push(FleetEntry {
                eco_level: state.level,
                effective_eco,
                aircraft,
                model,
            });
        }
        Ok(entries)
    }

    /// Owned bases with derived tiers.
    pub async fn bases(&self) -> Result<Vec<OwnedBase>, GameError> {
        let mut conn = self.store.acquire().await?;
        Ok(queries::bases_for_save(&mut conn, self.save_id).await?)
    }

    /// Models currently purchasable: STARTER never shows, and the category
    /// tier is gated by the save's highest base tier.
    pub async fn shop_models(&self) -> Result<Vec<AircraftModel>, GameError> {
        let mut conn = self.store.acquire().await?;
        let bases = queries::bases_for_save(&mut conn, self.save_id).await?;
        let max_rank = bases.iter().map(|b| b.tier.rank()).max().unwrap_or(0);
        let models = queries::all_models(&mut conn).await?;
        Ok(models
            .into_iter()
            .filter(|m| {
                m.category != AircraftCategory::Starter && m.category.tier_rank() <= max_rank
            })
            .collect())
    }

    /// In-progress contracts with aircraft registration and flight ETA.
    pub async fn active_contracts(&self) -> Result<Vec<ContractView>, GameError> {
        let mut conn = self.store.acquire().await?;
        Ok(queries::active_contracts(&mut conn, self.save_id).await?)
    }

    /// Buy an aircraft from the shop: lock the treasury, check funds,
    /// insert the airframe and debit the price in one transaction.
    pub async fn purchase_aircraft(
        &self,
        model_code: &str,
        airport_ident: Option<&str>,
        registration: &str,
        nickname: Option<&str>,
    ) -> Result<i64, GameError> {
        let mut conn = self.store.acquire().await?;
        let model = queries::fetch_model(&mut conn, model_code)
            .await?
            .ok_or_else(|| GameError::ModelNotFound(model_code.to_string()))?;
        if model.category == AircraftCategory::Starter {
            return Err(GameError::ModelNotPurchasable(model_code.to_string()));
        }
        let bases = queries::bases_for_save(&mut conn, self.save_id).await?;
        let max_rank = bases.iter().map(|b| b.tier.rank()).max().unwrap_or(0);
        let Some(primary) = bases.first() else {
            return Err(GameError::ModelNotPurchasable(model_code.to_string()));
        };
        if model.category.tier_rank() > max_rank {
            return Err(GameError::ModelNotPurchasable(model_code.to_string()));
        }
        let home_ident = airport_ident.unwrap_or(&primary.base_ident).to_string();
        let base_id = queries::base_by_ident(&mut conn, self.save_id, &home_ident)
            .await?
            .map(|b| b.base_id)
            .unwrap_or(primary.base_id);
        drop(conn);

        let mut tx = self.store.begin().await?;
        let save = self.lock_active_save(&mut tx).await?;
        let price = model.purchase_price;
        if save.cash < price {
            return Err(GameError::InsufficientCash {
                needed: price,
                available: save.cash,
            });
        }
        let aircraft = Aircraft {
            aircraft_id: 0,
            save_id: self.save_id,
            model_code: model.model_code.clone(),
            registration: registration.to_string(),
            nickname: nickname.map(str::to_string),
            current_airport_ident: home_ident,
            acquired_day: save.current_day,
            purchase_price: price,
            condition_percent: 100,
            status: AircraftStatus::Idle,
            hours_flown: 0.0,
            sold_day: None,
            sale_price: None,
            base_id: Some(base_id),
        };
        let aircraft_id = queries::insert_aircraft(&mut tx, &aircraft).await?;
        queries::set_save_cash(&mut tx, self.save_id, round_money(save.cash - price)).await?;
        tx.commit().await.map_err(StoreError::from)?;
        info!(aircraft_id, model = %model.model_code, price = %price, "aircraft purchased");
        Ok(aircraft_id)
    }

    /// Effective eco multiplier at the current level; pure preview, same
    /// resolver the reward computation uses.
    pub async fn preview_eco_multiplier(&self, aircraft_id: i64) -> Result<f64, GameError> {
        let mut conn = self.store.acquire().await?;
        let (_, model) = self.fetch_owned(&mut conn, aircraft_id).await?;
        let state = upgrade_state_or_default(&mut conn, aircraft_id, &self.cfg).await?;
        let rule = self.cfg.eco.rule_for(&model.eco_class);
        Ok(effective_eco_multiplier(
            model.eco_fee_multiplier,
            state.level,
            state.eco_floor,
            rule,
        ))
    }

    /// Eco preview and price for the next ECO level, without mutating
    /// anything.
    pub async fn preview_aircraft_upgrade(
        &self,
        aircraft_id: i64,
    ) -> Result<(EcoPreview, Decimal), GameError> {
        let mut conn = self.store.acquire().await?;
        let (aircraft, model) = self.fetch_owned(&mut conn, aircraft_id).await?;
        let state = upgrade_state_or_default(&mut conn, aircraft_id, &self.cfg).await?;
        let rule = self.cfg.eco.rule_for(&model.eco_class);
        let preview = preview_next_level(model.eco_fee_multiplier, &state, rule);
        let cost = aircraft_upgrade_cost(
            model.category,
            pricing_base(&aircraft, &model),
            preview.next_level,
            &self.cfg.upgrade_costs,
        );
        Ok((preview, cost))
    }

    /// Install the next ECO level: append the history row and debit the
    /// cost, atomically. The preview in the receipt is the exact pair of
    /// values a menu quoted beforehand.
    pub async fn upgrade_aircraft(&self, aircraft_id: i64) -> Result<UpgradeReceipt, GameError> {
        let mut conn = self.store.acquire().await?;
        let (aircraft, model) = self.fetch_owned(&mut conn, aircraft_id).await?;
        let state = upgrade_state_or_default(&mut conn, aircraft_id, &self.cfg).await?;
        let rule = self.cfg.eco.rule_for(&model.eco_class);
        let preview = preview_next_level(model.eco_fee_multiplier, &state, rule);
        let cost = aircraft_upgrade_cost(
            model.category,
            pricing_base(&aircraft, &model),
            preview.next_level,
            &self.cfg.upgrade_costs,
        );
        drop(conn);

        let mut tx = self.store.begin().await?;
        let save = self.lock_active_save(&mut tx).await?;
        if save.cash < cost {
            return Err(GameError::InsufficientCash {
                needed: cost,
                available: save.cash,
            });
        }
        queries::insert_upgrade(
            &mut tx,
            aircraft_id,
            ECO_UPGRADE_CODE,
            preview.next_level,
            save.current_day,
            state.eco_factor_per_level,
            state.eco_floor,
        )
        .await?;
        queries::set_save_cash(&mut tx, self.save_id, round_money(save.cash - cost)).await?;
        tx.commit().await.map_err(StoreError::from)?;
        info!(aircraft_id, level = preview.next_level, cost = %cost, "eco upgrade installed");
        Ok(UpgradeReceipt {
            aircraft_id,
            new_level: preview.next_level,
            cost,
            eco: preview,
        })
    }

    /// Upgrade a base to its next tier; HUGE is terminal.
    pub async fn upgrade_base(&self, base_id: i64) -> Result<BaseUpgradeReceipt, GameError> {
        let mut conn = self.store.acquire().await?;
        let base = queries::fetch_base(&mut conn, base_id)
            .await?
            .filter(|b| b.save_id == self.save_id)
            .ok_or(GameError::BaseNotFound(base_id))?;
        drop(conn);
        let next_tier = base.tier.next().ok_or(GameError::TierIsTerminal(base.tier))?;
        let cost = base_tier_upgrade_cost(base.purchase_cost, base.tier, &self.cfg.upgrade_costs)
            .ok_or(GameError::TierIsTerminal(base.tier))?;

        let mut tx = self.store.begin().await?;
        let save = self.lock_active_save(&mut tx).await?;
        if save.cash < cost {
            return Err(GameError::InsufficientCash {
                needed: cost,
                available: save.cash,
            });
        }
        queries::insert_base_upgrade(&mut tx, base_id, next_tier, save.current_day, cost).await?;
        queries::set_save_cash(&mut tx, self.save_id, round_money(save.cash - cost)).await?;
        tx.commit().await.map_err(StoreError::from)?;
        info!(base_id, tier = %next_tier, cost = %cost, "base upgraded");
        Ok(BaseUpgradeReceipt {
            base_id,
            new_tier: next_tier,
            cost,
        })
    }

    /// Generate today's cargo offers for an idle aircraft. Read-only; the
    /// offers are gone unless one is accepted.
    pub async fn generate_offers(&self, aircraft_id: i64) -> Result<Vec<CargoOffer>, GameError> {
        let mut conn = self.store.acquire().await?;
        let save = queries::fetch_save(&mut conn, self.save_id)
            .await?
            .ok_or(GameError::SaveNotFound(self.save_id))?;
        let (aircraft, model) = self.fetch_owned(&mut conn, aircraft_id).await?;
        if aircraft.status != AircraftStatus::Idle {
            return Err(GameError::AircraftNotIdle(aircraft_id));
        }
        let Some(dep_coords) =
            queries::airport_coords(&mut conn, &aircraft.current_airport_ident).await?
        else {
            warn!(
                ident = %aircraft.current_airport_ident,
                "departure airport has no geodata, no offers"
            );
            return Ok(Vec::new());
        };
        let count = self.cfg.economy.offers_per_request;
        let sampled = queries::sample_airports(
            &mut conn,
            (count * self.cfg.economy.oversample_factor) as i64,
            &aircraft.current_airport_ident,
        )
        .await?;
        let candidates: Vec<DestinationCandidate> = sampled
            .into_iter()
            .map(|a| DestinationCandidate {
                coords: a.coords(),
                ident: a.ident,
                name: a.name,
            })
            .collect();
        let state = upgrade_state_or_default(&mut conn, aircraft_id, &self.cfg).await?;
        let rule = self.cfg.eco.rule_for(&model.eco_class);
        let eco_delta = effective_eco_multiplier(
            model.eco_fee_multiplier,
            state.level,
            state.eco_floor,
            rule,
        );
        let perf = AircraftPerf {
            capacity_kg: model.base_cargo_kg,
            cruise_speed_kts: model.cruise_speed_kts,
        };
        let seed = offer_seed(
            save.rng_seed.unwrap_or(self.save_id),
            save.current_day,
            aircraft_id,
        );
        Ok(generate_offers_seeded(
            dep_coords,
            &candidates,
            &perf,
            eco_delta,
            save.current_day,
            count,
            &self.cfg.economy,
            seed,
        ))
    }

    /// Commit to an offer: create the contract and its flight together and
    /// mark the aircraft BUSY, atomically. Returns the contract id.
    pub async fn accept_offer(
        &self,
        aircraft_id: i64,
        offer: &CargoOffer,
    ) -> Result<i64, GameError> {
        let mut tx = self.store.begin().await?;
        let save = self.lock_active_save(&mut tx).await?;
        let (aircraft, _) = queries::fetch_aircraft_with_model(&mut tx, aircraft_id)
            .await?
            .filter(|(a, _)| a.save_id == self.save_id)
            .ok_or(GameError::AircraftNotFound(aircraft_id))?;
        if aircraft.status != AircraftStatus::Idle {
            return Err(GameError::AircraftNotIdle(aircraft_id));
        }

        let day = save.current_day;
        let arrival_day = day + offer.total_days;
        let contract_id = queries::insert_contract(
            &mut tx,
            self.save_id,
            aircraft_id,
            &offer.dest_ident,
            offer.payload_kg,
            offer.reward,
            offer.penalty,
            day,
            offer.deadline_day,
        )
        .await?;
        queries::insert_flight(
            &mut tx,
            self.save_id,
            contract_id,
            aircraft_id,
            &aircraft.current_airport_ident,
            &offer.dest_ident,
            day,
            arrival_day,
            offer.distance_km * offer.trips as f64,
        )
        .await?;
        queries::set_aircraft_status(&mut tx, aircraft_id, AircraftStatus::Busy).await?;
        tx.commit().await.map_err(StoreError::from)?;
        info!(contract_id, aircraft_id, eta = arrival_day, "contract accepted");
        Ok(contract_id)
    }

    /// Advance the calendar by one day. See [`day::advance_day`].
    pub async fn advance_day(&self) -> Result<DaySummary, GameError> {
        day::advance_day(&self.store, &self.cfg, self.save_id).await
    }

    /// Advance a fixed number of days, stopping on terminal status.
    pub async fn fast_forward(&self, days: i64) -> Result<FastForwardSummary, GameError> {
        fastforward::fast_forward(&self.store, &self.cfg, self.save_id, days).await
    }

    /// Advance until the first arrival, bounded by `max_days`.
    pub async fn fast_forward_until_first_return(
        &self,
        max_days: i64,
    ) -> Result<FastForwardSummary, GameError> {
        fastforward::fast_forward_until_first_return(&self.store, &self.cfg, self.save_id, max_days)
            .await
    }

    async fn found_base(
        &self,
        base_ident: &str,
        base_name: &str,
        cost: Decimal,
    ) -> Result<i64, GameError> {
        let mut tx = self.store.begin().await?;
        let save = self.lock_active_save(&mut tx).await?;
        if save.cash < cost {
            return Err(GameError::InsufficientCash {
                needed: cost,
                available: save.cash,
            });
        }
        let base_id = queries::insert_base(
            &mut tx,
            self.save_id,
            base_ident,
            base_name,
            save.current_day,
            cost,
        )
        .await?;
        queries::insert_base_upgrade(
            &mut tx,
            base_id,
            BaseTier::Small,
            save.current_day,
            Decimal::ZERO,
        )
        .await?;
        queries::set_save_cash(&mut tx, self.save_id, round_money(save.cash - cost)).await?;
        tx.commit().await.map_err(StoreError::from)?;
        Ok(base_id)
    }

    async fn grant_gift_aircraft(
        &self,
        base_id: i64,
        base_ident: &str,
        registration: &str,
    ) -> Result<(), GameError> {
        let mut tx = self.store.begin().await?;
        let save = self.lock_active_save(&mut tx).await?;
        let gift = catalog::gift_aircraft(
            self.save_id,
            save.current_day,
            base_ident,
            base_id,
            registration,
        );
        queries::insert_aircraft(&mut tx, &gift).await?;
        tx.commit().await.map_err(StoreError::from)?;
        Ok(())
    }

    async fn lock_active_save(
        &self,
        conn: &mut SqliteConnection,
    ) -> Result<GameSave, GameError> {
        let save = queries::lock_save(conn, self.save_id)
            .await?
            .ok_or(GameError::SaveNotFound(self.save_id))?;
        if save.status.is_terminal() {
            return Err(GameError::GameOver(save.status));
        }
        Ok(save)
    }

    async fn fetch_owned(
        &self,
        conn: &mut SqliteConnection,
        aircraft_id: i64,
    ) -> Result<(Aircraft, AircraftModel), GameError> {
        queries::fetch_aircraft_with_model(conn, aircraft_id)
            .await?
            .filter(|(a, _)| a.save_id == self.save_id)
            .ok_or(GameError::AircraftNotFound(aircraft_id))
    }
}

fn pricing_base(aircraft: &Aircraft, model: &AircraftModel) -> Decimal {
    if aircraft.purchase_price > Decimal::ZERO {
        aircraft.purchase_price
    } else {
        model.purchase_price
    }
}

async fn upgrade_state_or_default(
    conn: &mut SqliteConnection,
    aircraft_id: i64,
    cfg: &GameConfig,
) -> Result<UpgradeState, StoreError> {
    Ok(
        queries::latest_upgrade_state(&mut *conn, aircraft_id, ECO_UPGRADE_CODE)
            .await?
            .unwrap_or(UpgradeState {
                level: 0,
                eco_factor_per_level: cfg.eco.default_factor_per_level,
                eco_floor: cfg.eco.default_floor,
            }),
    )
}

fn offer_seed(seed_base: i64, day: i64, aircraft_id: i64) -> u64 {
    (seed_base as u64)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (day as u64).rotate_left(17)
        ^ (aircraft_id as u64).rotate_left(43)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fastforward::StopReason;
    use crate::testutil::fresh_store;
    use sim_core::SaveStatus;

    async fn bootstrap_with_cash(cash: i64) -> GameSession {
        let store = fresh_store().await;
        let params = NewGameParams {
            starting_cash: Decimal::new(cash, 0),
            rng_seed: Some(7),
            ..NewGameParams::new("Aurora Cargo", "666-AB12")
        };
        GameSession::new_game(store, GameConfig::standard(), params)
            .await
            .unwrap()
    }

    async fn bootstrap() -> GameSession {
        bootstrap_with_cash(300_000).await
    }

    #[tokio::test]
    async fn new_game_founds_base_and_grants_starter() {
        let session = bootstrap().await;

        // EFHK costs 30 % of the 300 000 opening cash.
        let save = session.save().await.unwrap();
        assert_eq!(save.current_day, 1);
        assert_eq!(save.cash, Decimal::new(210_000, 0));
        assert_eq!(save.status, SaveStatus::Active);

        let bases = session.bases().await.unwrap();
        assert_eq!(bases.len(), 1);
        assert_eq!(bases[0].base_ident, "EFHK");
        assert_eq!(bases[0].tier, BaseTier::Small);

        let fleet = session.fleet().await.unwrap();
        assert_eq!(fleet.len(), 1);
        let starter = &fleet[0];
        assert_eq!(starter.model.category, AircraftCategory::Starter);
        assert_eq!(starter.aircraft.purchase_price, Decimal::ZERO);
        assert_eq!(starter.aircraft.current_airport_ident, "EFHK");
        assert_eq!(starter.eco_level, 0);
        // DC-3: base -0.15, level 0, non-negative floor ignored.
        assert!((starter.effective_eco + 0.15).abs() < 1e-9);
    }

    #[tokio::test]
    async fn new_game_rejects_out_of_range_base_choice() {
        let store = fresh_store().await;
        let params = NewGameParams {
            base_choice: 7,
            ..NewGameParams::new("p", "666-XX99")
        };
        let err = GameSession::new_game(store, GameConfig::standard(), params)
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::InvalidSelection(7)));
    }

    #[tokio::test]
    async fn shop_hides_starter_and_gates_by_base_tier() {
        let session = bootstrap().await;
        let models = session.shop_models().await.unwrap();
        assert!(!models.is_empty());
        for m in &models {
            assert_ne!(m.category, AircraftCategory::Starter);
            assert_eq!(m.category, AircraftCategory::Small);
        }
        // A MEDIUM model is invisible and unpurchasable at a SMALL base.
        let err = session
            .purchase_aircraft("AT72F", None, "N-AA11", None)
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::ModelNotPurchasable(_)));
    }

    #[tokio::test]
    async fn purchase_debits_price_and_parks_at_home_base() {
        let session = bootstrap_with_cash(5_000_000).await;
        let before = session.save().await.unwrap().cash;

        let aircraft_id = session
            .purchase_aircraft("C208F", None, "N-CV20", Some("Work Horse"))
            .await
            .unwrap();
        let save = session.save().await.unwrap();
        assert_eq!(save.cash, before - Decimal::new(1_300_000, 0));

        let fleet = session.fleet().await.unwrap();
        assert_eq!(fleet.len(), 2);
        let bought = fleet
            .iter()
            .find(|e| e.aircraft.aircraft_id == aircraft_id)
            .unwrap();
        assert_eq!(bought.aircraft.current_airport_ident, "EFHK");
        assert_eq!(bought.aircraft.status, AircraftStatus::Idle);
        assert_eq!(bought.aircraft.purchase_price, Decimal::new(1_300_000, 0));
    }

    #[tokio::test]
    async fn purchase_with_insufficient_cash_mutates_nothing() {
        let session = bootstrap().await;
        // Raise the base tier so the model is reachable but unaffordable.
        let base_id = session.bases().await.unwrap()[0].base_id;
        session.upgrade_base(base_id).await.unwrap();

        let before = session.save().await.unwrap().cash;
        let fleet_before = session.fleet().await.unwrap().len();
        let err = session
            .purchase_aircraft("AT72F", None, "N-AT72", None)
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::InsufficientCash { .. }));
        assert!(err.is_validation());

        assert_eq!(session.save().await.unwrap().cash, before);
        assert_eq!(session.fleet().await.unwrap().len(), fleet_before);
    }

    #[tokio::test]
    async fn aircraft_upgrade_appends_history_and_debits() {
        let session = bootstrap().await;
        let aircraft_id = session.fleet().await.unwrap()[0].aircraft.aircraft_id;

        let (preview, cost) = session.preview_aircraft_upgrade(aircraft_id).await.unwrap();
        assert_eq!(preview.current_level, 0);
        assert_eq!(preview.next_level, 1);
        // STARTER curve, level 1.
        assert_eq!(cost, Decimal::new(10_000_000, 2));

        let receipt = session.upgrade_aircraft(aircraft_id).await.unwrap();
        assert_eq!(receipt.new_level, 1);
        assert_eq!(receipt.cost, cost);
        // Quoted preview and installed state agree.
        assert_eq!(receipt.eco, preview);

        let save = session.save().await.unwrap();
        assert_eq!(save.cash, Decimal::new(110_000, 0));

        let entry = &session.fleet().await.unwrap()[0];
        assert_eq!(entry.eco_level, 1);
        // Class E: -0.15 + 1 * 0.02.
        assert!((entry.effective_eco + 0.13).abs() < 1e-9);
        assert_eq!(
            session.preview_eco_multiplier(aircraft_id).await.unwrap(),
            entry.effective_eco
        );
    }

    #[tokio::test]
    async fn base_upgrades_walk_the_tiers_and_stop_at_huge() {
        let session = bootstrap().await;
        let base_id = session.bases().await.unwrap()[0].base_id;
        {
            // Top up the treasury so every transition is affordable.
            let mut conn = session.store.acquire().await.unwrap();
            queries::set_save_cash(&mut conn, session.save_id, Decimal::new(1_000_000, 0))
                .await
                .unwrap();
        }

        // Founding cost 90 000: transitions cost 50 %, 90 % and 150 %.
        let r = session.upgrade_base(base_id).await.unwrap();
        assert_eq!(r.new_tier, BaseTier::Medium);
        assert_eq!(r.cost, Decimal::new(45_000, 0));
        let r = session.upgrade_base(base_id).await.unwrap();
        assert_eq!(r.new_tier, BaseTier::Large);
        assert_eq!(r.cost, Decimal::new(81_000, 0));
        let r = session.upgrade_base(base_id).await.unwrap();
        assert_eq!(r.new_tier, BaseTier::Huge);
        assert_eq!(r.cost, Decimal::new(135_000, 0));

        let err = session.upgrade_base(base_id).await.unwrap_err();
        assert!(matches!(err, GameError::TierIsTerminal(BaseTier::Huge)));
    }

    #[tokio::test]
    async fn offers_are_previews_and_acceptance_is_atomic() {
        let session = bootstrap().await;
        let aircraft_id = session.fleet().await.unwrap()[0].aircraft.aircraft_id;

        let offers = session.generate_offers(aircraft_id).await.unwrap();
        assert!(!offers.is_empty());
        let day = session.save().await.unwrap().current_day;
        for o in &offers {
            assert!(o.deadline_day >= day + o.total_days);
        }
        // Generating offers mutates nothing.
        assert_eq!(session.save().await.unwrap().cash, Decimal::new(210_000, 0));
        assert!(session.active_contracts().await.unwrap().is_empty());

        let offer = offers[0].clone();
        let contract_id = session.accept_offer(aircraft_id, &offer).await.unwrap();
        assert!(contract_id > 0);

        let contracts = session.active_contracts().await.unwrap();
        assert_eq!(contracts.len(), 1);
        assert_eq!(contracts[0].dest_ident, offer.dest_ident);
        assert_eq!(contracts[0].arrival_day, Some(day + offer.total_days));

        let entry = &session.fleet().await.unwrap()[0];
        assert_eq!(entry.aircraft.status, AircraftStatus::Busy);

        // A busy aircraft takes no further work.
        let err = session.accept_offer(aircraft_id, &offer).await.unwrap_err();
        assert!(matches!(err, GameError::AircraftNotIdle(_)));
        let err = session.generate_offers(aircraft_id).await.unwrap_err();
        assert!(matches!(err, GameError::AircraftNotIdle(_)));
    }

    #[tokio::test]
    async fn delivery_settles_the_full_reward_on_time() {
        let session = bootstrap().await;
        let aircraft_id = session.fleet().await.unwrap()[0].aircraft.aircraft_id;
        let offers = session.generate_offers(aircraft_id).await.unwrap();
        let offer = offers[0].clone();
        session.accept_offer(aircraft_id, &offer).await.unwrap();

        let summary = session.fast_forward_until_first_return(365).await.unwrap();
        assert_eq!(summary.stop_reason, StopReason::FirstArrival);
        assert_eq!(summary.arrivals, 1);
        assert_eq!(summary.earned, offer.reward);

        let save = session.save().await.unwrap();
        assert_eq!(save.cash, Decimal::new(210_000, 0) + offer.reward);
        assert!(session.active_contracts().await.unwrap().is_empty());

        let entry = &session.fleet().await.unwrap()[0];
        assert_eq!(entry.aircraft.status, AircraftStatus::Idle);
        assert_eq!(entry.aircraft.current_airport_ident, offer.dest_ident);
    }

    #[tokio::test]
    async fn terminal_saves_refuse_economic_actions() {
        let session = bootstrap().await;
        let aircraft_id = session.fleet().await.unwrap()[0].aircraft.aircraft_id;
        let offers = session.generate_offers(aircraft_id).await.unwrap();
        {
            let mut conn = session.store.acquire().await.unwrap();
            queries::set_save_status(&mut conn, session.save_id, SaveStatus::Victory)
                .await
                .unwrap();
        }

        let err = session.accept_offer(aircraft_id, &offers[0]).await.unwrap_err();
        assert!(matches!(err, GameError::GameOver(SaveStatus::Victory)));
        let err = session.upgrade_aircraft(aircraft_id).await.unwrap_err();
        assert!(matches!(err, GameError::GameOver(_)));
        let err = session
            .purchase_aircraft("C208F", None, "N-XX00", None)
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::GameOver(_)));
    }
}
