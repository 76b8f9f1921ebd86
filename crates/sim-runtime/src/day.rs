//! Day advancement and recurring billing.
//!
//! [`advance_day`] is the transactional core of the simulation: it moves
//! the calendar, resolves arrived flights, settles their contracts and
//! credits the treasury inside one transaction. Billing is a distinct
//! decision and runs in its own transaction after the day has committed.

use crate::error::GameError;
use persistence::{queries, Store, StoreError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sim_core::config::GameConfig;
use sim_core::{round_money, ContractStatus, SaveStatus};
use tracing::{debug, info, warn};

/// Result of one day advance.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct DaySummary {
    /// The day the calendar now shows.
    pub day: i64,
    /// Flights resolved this day.
    pub arrivals: i64,
    /// Total settled into the treasury this day.
    pub earned: Decimal,
    /// Billing outcome when this day closed a billing cycle.
    pub billing: Option<BillingOutcome>,
}

/// Result of one billing cycle.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BillingOutcome {
    /// HQ fee plus per-aircraft maintenance.
    pub total_bill: Decimal,
    /// False when the bill exceeded cash and bankruptcy was declared.
    pub charged: bool,
    /// Save status after the cycle.
    pub status: SaveStatus,
}

/// Advance the calendar by one day and settle everything that arrived.
///
/// All steps commit together or none persist. On a terminal save the day
/// still counts but no settlement occurs and cash never changes.
pub async fn advance_day(
    store: &Store,
    cfg: &GameConfig,
    save_id: i64,
) -> Result<DaySummary, GameError> {
    let mut tx = store.begin().await?;

    let save = queries::lock_save(&mut tx, save_id)
        .await?
        .ok_or(GameError::SaveNotFound(save_id))?;
    let new_day = save.current_day + 1;
    queries::set_save_day(&mut tx, save_id, new_day).await?;

    let mut arrivals_count = 0i64;
    let mut total_earned = Decimal::ZERO;

    if save.status == SaveStatus::Active {
        let arrivals = queries::due_arrivals(&mut tx, save_id, new_day).await?;
        arrivals_count = arrivals.len() as i64;

        for arrival in &arrivals {
            queries::mark_flight_arrived(&mut tx, arrival.flight_id).await?;
            queries::land_aircraft(&mut tx, arrival.aircraft_id, &arrival.arr_ident).await?;

            let (status, final_reward) = if new_day <= arrival.deadline_day {
                (ContractStatus::Completed, arrival.reward)
            } else {
                let docked = (arrival.reward - arrival.penalty).max(Decimal::ZERO);
                (ContractStatus::CompletedLate, docked)
            };
            queries::complete_contract(&mut tx, arrival.contract_id, status, new_day).await?;
            total_earned += final_reward;
            debug!(
                contract_id = arrival.contract_id,
                status = %status,
                reward = %final_reward,
                "contract settled"
            );
        }

        if total_earned != Decimal::ZERO {
            let locked = queries::lock_save(&mut tx, save_id)
                .await?
                .ok_or(GameError::SaveNotFound(save_id))?;
            let new_cash = round_money(locked.cash + total_earned);
            queries::set_save_cash(&mut tx, save_id, new_cash).await?;
        }
    }

    tx.commit().await.map_err(StoreError::from)?;
    debug!(save_id, day = new_day, arrivals = arrivals_count, earned = %total_earned, "day advanced");

    // Billing is a distinct terminal decision, kept outside the day-advance
    // transaction.
    let billing = if save.status == SaveStatus::Active && new_day % cfg.billing.cycle_days == 0 {
        Some(process_billing(store, cfg, save_id).await?)
    } else {
        None
    };

    Ok(DaySummary {
        day: new_day,
        arrivals: arrivals_count,
        earned: total_earned,
        billing,
    })
}

/// Charge the recurring HQ fee and per-aircraft maintenance, or declare
/// bankruptcy without charging anything.
pub async fn process_billing(
    store: &Store,
    cfg: &GameConfig,
    save_id: i64,
) -> Result<BillingOutcome, GameError> {
    let mut tx = store.begin().await?;

    let save = queries::lock_save(&mut tx, save_id)
        .await?
        .ok_or(GameError::SaveNotFound(save_id))?;
    if save.status.is_terminal() {
        return Err(GameError::GameOver(save.status));
    }

    let (starters, non_starters) = queries::active_fleet_counts(&mut tx, save_id).await?;
    let maintenance = cfg.billing.maint_per_aircraft * Decimal::from(non_starters)
        + cfg.billing.maint_per_aircraft
            * cfg.billing.starter_maint_discount
            * Decimal::from(starters);
    let total_bill = round_money(cfg.billing.hq_monthly_fee + maintenance);

    if save.cash < total_bill {
        queries::set_save_status(&mut tx, save_id, SaveStatus::Bankrupt).await?;
        tx.commit().await.map_err(StoreError::from)?;
        warn!(save_id, bill = %total_bill, cash = %save.cash, "bills unpayable, bankruptcy declared");
        return Ok(BillingOutcome {
            total_bill,
            charged: false,
            status: SaveStatus::Bankrupt,
        });
    }

    let new_cash = round_money(save.cash - total_bill);
    queries::set_save_cash(&mut tx, save_id, new_cash).await?;
    tx.commit().await.map_err(StoreError::from)?;
    info!(save_id, bill = %total_bill, "monthly bills paid");

    Ok(BillingOutcome {
        total_bill,
        charged: true,
        status: SaveStatus::Active,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{add_flight, add_starter, create_save, fresh_store};
    use persistence::queries;

    #[tokio::test]
    async fn day_advances_without_arrivals() {
        let store = fresh_store().await;
        let cfg = GameConfig::standard();
        let save_id = create_save(&store, Decimal::new(10_000, 0), 1).await;

        let summary = advance_day(&store, &cfg, save_id).await.unwrap();
        assert_eq!(summary.day, 2);
        assert_eq!(summary.arrivals, 0);
        assert_eq!(summary.earned, Decimal::ZERO);
        assert!(summary.billing.is_none());

        let mut conn = store.acquire().await.unwrap();
        let save = queries::fetch_save(&mut conn, save_id).await.unwrap().unwrap();
        assert_eq!(save.current_day, 2);
        assert_eq!(save.cash, Decimal::new(10_000, 0));
    }

    #[tokio::test]
    async fn simultaneous_arrivals_settle_in_one_commit() {
        // Two flights land the same day; one on time (500), one late
        // (700 - 100). Cash moves by exactly 1100.
        let store = fresh_store().await;
        let cfg = GameConfig::standard();
        let save_id = create_save(&store, Decimal::new(1_000, 0), 1).await;
        let a1 = add_starter(&store, save_id, "EFHK").await;
        let a2 = add_starter(&store, save_id, "EFHK").await;
        add_flight(
            &store, save_id, a1, "EGLL", 2, 5, Decimal::new(500, 0), Decimal::new(50, 0),
        )
        .await;
        add_flight(
            &store, save_id, a2, "LFPG", 2, 1, Decimal::new(700, 0), Decimal::new(100, 0),
        )
        .await;

        let summary = advance_day(&store, &cfg, save_id).await.unwrap();
        assert_eq!(summary.arrivals, 2);
        assert_eq!(summary.earned, Decimal::new(1_100, 0));

        let mut conn = store.acquire().await.unwrap();
        let save = queries::fetch_save(&mut conn, save_id).await.unwrap().unwrap();
        assert_eq!(save.cash, Decimal::new(2_100, 0));

        // Flight resolved, aircraft released at the destination.
        let arrivals = queries::due_arrivals(&mut conn, save_id, 10).await.unwrap();
        assert!(arrivals.is_empty());
        let (aircraft, _) = queries::fetch_aircraft_with_model(&mut conn, a1)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(aircraft.status, sim_core::AircraftStatus::Idle);
        assert_eq!(aircraft.current_airport_ident, "EGLL");
    }

    #[tokio::test]
    async fn late_settlement_never_goes_negative() {
        let store = fresh_store().await;
        let cfg = GameConfig::standard();
        let save_id = create_save(&store, Decimal::ZERO, 1).await;
        let a = add_starter(&store, save_id, "EFHK").await;
        // Penalty exceeds the reward; the payout clamps to zero.
        add_flight(
            &store, save_id, a, "EGLL", 2, 1, Decimal::new(100, 0), Decimal::new(250, 0),
        )
        .await;

        let summary = advance_day(&store, &cfg, save_id).await.unwrap();
        assert_eq!(summary.arrivals, 1);
        assert_eq!(summary.earned, Decimal::ZERO);

        let mut conn = store.acquire().await.unwrap();
        let save = queries::fetch_save(&mut conn, save_id).await.unwrap().unwrap();
        assert_eq!(save.cash, Decimal::ZERO);
    }

    #[tokio::test]
    async fn billing_shortfall_declares_bankruptcy_without_debit() {
        // Bill for one starter: 25 000 HQ + 5 000 maintenance = 30 000.
        let store = fresh_store().await;
        let cfg = GameConfig::standard();
        let save_id = create_save(&store, Decimal::new(10_000, 0), 29).await;
        add_starter(&store, save_id, "EFHK").await;

        let summary = advance_day(&store, &cfg, save_id).await.unwrap();
        assert_eq!(summary.day, 30);
        let billing = summary.billing.unwrap();
        assert_eq!(billing.total_bill, Decimal::new(30_000, 0));
        assert!(!billing.charged);
        assert_eq!(billing.status, SaveStatus::Bankrupt);

        let mut conn = store.acquire().await.unwrap();
        let save = queries::fetch_save(&mut conn, save_id).await.unwrap().unwrap();
        assert_eq!(save.status, SaveStatus::Bankrupt);
        // No partial debit.
        assert_eq!(save.cash, Decimal::new(10_000, 0));
    }

    #[tokio::test]
    async fn billing_on_sufficient_cash_debits_exactly() {
        let store = fresh_store().await;
        let cfg = GameConfig::standard();
        let save_id = create_save(&store, Decimal::new(30_000, 0), 29).await;
        add_starter(&store, save_id, "EFHK").await;

        let summary = advance_day(&store, &cfg, save_id).await.unwrap();
        let billing = summary.billing.unwrap();
        assert!(billing.charged);
        assert_eq!(billing.status, SaveStatus::Active);

        let mut conn = store.acquire().await.unwrap();
        let save = queries::fetch_save(&mut conn, save_id).await.unwrap().unwrap();
        assert_eq!(save.status, SaveStatus::Active);
        assert_eq!(save.cash, Decimal::ZERO);
    }

    #[tokio::test]
    async fn failed_settlement_rolls_back_the_whole_day() {
        // A corrupt reward value surfaces mid-resolution; the day must not
        // advance and nothing may settle.
        let store = fresh_store().await;
        let cfg = GameConfig::standard();
        let save_id = create_save(&store, Decimal::new(1_000, 0), 1).await;
        let a = add_starter(&store, save_id, "EFHK").await;
        let (contract_id, _) = add_flight(
            &store, save_id, a, "EGLL", 2, 5, Decimal::new(500, 0), Decimal::ZERO,
        )
        .await;
        sqlx::query("UPDATE contracts SET reward = 'corrupt' WHERE contract_id = ?")
            .bind(contract_id)
            .execute(store.pool())
            .await
            .unwrap();

        let err = advance_day(&store, &cfg, save_id).await.unwrap_err();
        assert!(matches!(err, GameError::Persistence(_)));

        let mut conn = store.acquire().await.unwrap();
        let save = queries::fetch_save(&mut conn, save_id).await.unwrap().unwrap();
        assert_eq!(save.current_day, 1);
        assert_eq!(save.cash, Decimal::new(1_000, 0));
        assert_eq!(queries::enroute_count(&mut conn, save_id).await.unwrap(), 1);
        let (aircraft, _) = queries::fetch_aircraft_with_model(&mut conn, a)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(aircraft.status, sim_core::AircraftStatus::Busy);
    }

    #[tokio::test]
    async fn terminal_save_counts_days_but_freezes_cash() {
        let store = fresh_store().await;
        let cfg = GameConfig::standard();
        let save_id = create_save(&store, Decimal::new(5_000, 0), 1).await;
        let a = add_starter(&store, save_id, "EFHK").await;
        add_flight(
            &store, save_id, a, "EGLL", 2, 5, Decimal::new(500, 0), Decimal::ZERO,
        )
        .await;

        {
            let mut conn = store.acquire().await.unwrap();
            queries::set_save_status(&mut conn, save_id, SaveStatus::Bankrupt)
                .await
                .unwrap();
        }

        let summary = advance_day(&store, &cfg, save_id).await.unwrap();
        assert_eq!(summary.day, 2);
        assert_eq!(summary.arrivals, 0);
        assert_eq!(summary.earned, Decimal::ZERO);

        let mut conn = store.acquire().await.unwrap();
        let save = queries::fetch_save(&mut conn, save_id).await.unwrap().unwrap();
        assert_eq!(save.current_day, 2);
        assert_eq!(save.cash, Decimal::new(5_000, 0));
        // The flight stays frozen enroute.
        assert_eq!(queries::enroute_count(&mut conn, save_id).await.unwrap(), 1);
    }
}
