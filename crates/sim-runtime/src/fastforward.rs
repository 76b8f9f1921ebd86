//! Fast-forward controllers.
//!
//! Both modes drive [`crate::day::advance_day`] silently and aggregate the
//! results. Both stop immediately on a terminal status change, so the loop
//! never overshoots bankruptcy or victory.

use crate::day;
use crate::error::GameError;
use persistence::{queries, Store};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sim_core::config::GameConfig;
use sim_core::{GameSave, SaveStatus};
use tracing::info;

/// Why a fast-forward loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// The requested day count ran to completion.
    Completed,
    /// At least one flight arrived this day (until-first-return mode).
    FirstArrival,
    /// Billing declared bankruptcy.
    Bankrupt,
    /// The survival target was reached.
    Victory,
    /// The safety cap ran out before any flight returned.
    CapReached,
    /// Nothing is enroute, so there is nothing to wait for.
    NothingEnroute,
}

/// Aggregated result of a fast-forward run.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FastForwardSummary {
    /// Days actually processed (may be fewer than requested).
    pub days_advanced: i64,
    /// Flights resolved across the run.
    pub arrivals: i64,
    /// Total settled into the treasury across the run.
    pub earned: Decimal,
    /// The condition that ended the loop.
    pub stop_reason: StopReason,
    /// Calendar day after the run.
    pub final_day: i64,
    /// Save status after the run.
    pub final_status: SaveStatus,
}

async fn save_state(store: &Store, save_id: i64) -> Result<GameSave, GameError> {
    let mut conn = store.acquire().await?;
    queries::fetch_save(&mut conn, save_id)
        .await?
        .ok_or(GameError::SaveNotFound(save_id))
}

async fn declare_victory(store: &Store, save_id: i64) -> Result<(), GameError> {
    let mut conn = store.acquire().await?;
    queries::set_save_status(&mut conn, save_id, SaveStatus::Victory).await?;
    info!(save_id, "survival target reached, victory declared");
    Ok(())
}

/// Advance exactly `days` days, stopping early on bankruptcy or on
/// reaching the survival target (declaring victory if still active).
pub async fn fast_forward(
    store: &Store,
    cfg: &GameConfig,
    save_id: i64,
    days: i64,
) -> Result<FastForwardSummary, GameError> {
    let mut days_advanced = 0i64;
    let mut arrivals = 0i64;
    let mut earned = Decimal::ZERO;
    let mut stop_reason = StopReason::Completed;

    for _ in 0..days.max(0) {
        let summary = day::advance_day(store, cfg, save_id).await?;
        days_advanced += 1;
        arrivals += summary.arrivals;
        earned += summary.earned;

        let save = save_state(store, save_id).await?;
        if save.status == SaveStatus::Bankrupt {
            stop_reason = StopReason::Bankrupt;
            break;
        }
        if save.current_day >= cfg.goal.survival_target_days {
            if save.status == SaveStatus::Active {
                declare_victory(store, save_id).await?;
            }
            stop_reason = StopReason::Victory;
            break;
        }
    }

    let save = save_state(store, save_id).await?;
    Ok(FastForwardSummary {
        days_advanced,
        arrivals,
        earned,
        stop_reason,
        final_day: save.current_day,
        final_status: save.status,
    })
}

/// Advance day by day until the first day with at least one arrival, up to
/// `max_days`. Precondition: something must be enroute, otherwise the call
/// returns immediately with [`StopReason::NothingEnroute`].
pub async fn fast_forward_until_first_return(
    store: &Store,
    cfg: &GameConfig,
    save_id: i64,
    max_days: i64,
) -> Result<FastForwardSummary, GameError> {
    let enroute = {
        let mut conn = store.acquire().await?;
        queries::enroute_count(&mut conn, save_id).await?
    };
    if enroute == 0 {
        let save = save_state(store, save_id).await?;
        return Ok(FastForwardSummary {
            days_advanced: 0,
            arrivals: 0,
            earned: Decimal::ZERO,
            stop_reason: StopReason::NothingEnroute,
            final_day: save.current_day,
            final_status: save.status,
        });
    }

    let mut days_advanced = 0i64;
    let mut arrivals = 0i64;
    let mut earned = Decimal::ZERO;
    let mut stop_reason = StopReason::CapReached;

    for _ in 0..max_days.max(1) {
        let summary = day::advance_day(store, cfg, save_id).await?;
        days_advanced += 1;
        arrivals += summary.arrivals;
        earned += summary.earned;

        if summary.arrivals > 0 {
            stop_reason = StopReason::FirstArrival;
            break;
        }
        let save = save_state(store, save_id).await?;
        if save.status == SaveStatus::Bankrupt {
            stop_reason = StopReason::Bankrupt;
            break;
        }
        if save.current_day >= cfg.goal.survival_target_days {
            if save.status == SaveStatus::Active {
                declare_victory(store, save_id).await?;
            }
            stop_reason = StopReason::Victory;
            break;
        }
    }

    let save = save_state(store, save_id).await?;
    Ok(FastForwardSummary {
        days_advanced,
        arrivals,
        earned,
        stop_reason,
        final_day: save.current_day,
        final_status: save.status,
    })
}
