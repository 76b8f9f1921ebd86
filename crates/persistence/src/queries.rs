//! Query functions over an explicit `&mut SqliteConnection`.
//!
//! Callers that need atomicity run several of these inside one
//! `Store::begin()` transaction; the save row is always re-read through
//! [`lock_save`] inside that transaction before cash is touched, which on
//! SQLite's single-writer model gives `SELECT ... FOR UPDATE` semantics.

use crate::rows::{
    money_text, AircraftWithModelRow, AirportRow, BaseWithTierRow, ContractView, ContractViewRow,
    DueArrival, DueArrivalRow, ModelRow, SaveRow, SaveSummary, SaveSummaryRow, UpgradeStateRow,
};
use crate::StoreError;
use chrono::Utc;
use rust_decimal::Decimal;
use sim_core::{
    Aircraft, AircraftModel, AircraftStatus, Airport, ContractStatus, FlightStatus, GameSave,
    OwnedBase, SaveStatus, UpgradeState,
};
use sqlx::SqliteConnection;

fn now_text() -> String {
    Utc::now().to_rfc3339()
}

const AIRCRAFT_MODEL_JOIN: &str = "\
    SELECT a.aircraft_id, a.save_id, a.model_code, a.registration, a.nickname, \
           a.current_airport_ident, a.acquired_day, a.purchase_price, a.condition_percent, \
           a.status, a.hours_flown, a.sold_day, a.sale_price, a.base_id, \
           m.manufacturer AS m_manufacturer, m.model_name AS m_model_name, \
           m.purchase_price AS m_purchase_price, m.base_cargo_kg AS m_base_cargo_kg, \
           m.range_km AS m_range_km, m.cruise_speed_kts AS m_cruise_speed_kts, \
           m.category AS m_category, m.eco_fee_multiplier AS m_eco_fee_multiplier, \
           m.eco_class AS m_eco_class \
    FROM aircraft a \
    JOIN aircraft_models m ON m.model_code = a.model_code";

// ---------- game_saves ----------

/// Insert a new save starting at day 1. Returns the save id.
pub async fn insert_save(
    conn: &mut SqliteConnection,
    player_name: &str,
    cash: Decimal,
    difficulty: &str,
    rng_seed: Option<i64>,
) -> Result<i64, StoreError> {
    let now = now_text();
    let res = sqlx::query(
        "INSERT INTO game_saves \
           (player_name, current_day, cash, difficulty, status, rng_seed, created_at, updated_at) \
         VALUES (?, 1, ?, ?, 'ACTIVE', ?, ?, ?)",
    )
    .bind(player_name)
    .bind(money_text(cash))
    .bind(difficulty)
    .bind(rng_seed)
    .bind(&now)
    .bind(&now)
    .execute(&mut *conn)
    .await?;
    Ok(res.last_insert_rowid())
}

/// Fetch a save by id.
pub async fn fetch_save(
    conn: &mut SqliteConnection,
    save_id: i64,
) -> Result<Option<GameSave>, StoreError> {
    let row = sqlx::query_as::<_, SaveRow>(
        "SELECT save_id, player_name, current_day, cash, difficulty, status, rng_seed \
         FROM game_saves WHERE save_id = ?",
    )
    .bind(save_id)
    .fetch_optional(&mut *conn)
    .await?;
    row.map(SaveRow::into_domain).transpose()
}

/// Re-read the save inside the current write transaction before mutating
/// cash or status (the row-lock step of the atomicity contract).
pub async fn lock_save(
    conn: &mut SqliteConnection,
    save_id: i64,
) -> Result<Option<GameSave>, StoreError> {
    fetch_save(conn, save_id).await
}

/// Set the simulated day.
pub async fn set_save_day(
    conn: &mut SqliteConnection,
    save_id: i64,
    day: i64,
) -> Result<(), StoreError> {
    sqlx::query("UPDATE game_saves SET current_day = ?, updated_at = ? WHERE save_id = ?")
        .bind(day)
        .bind(now_text())
        .bind(save_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Persist a new cash amount, rounded to cents.
pub async fn set_save_cash(
    conn: &mut SqliteConnection,
    save_id: i64,
    cash: Decimal,
) -> Result<(), StoreError> {
    sqlx::query("UPDATE game_saves SET cash = ?, updated_at = ? WHERE save_id = ?")
        .bind(money_text(cash))
        .bind(now_text())
        .bind(save_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Persist a status transition.
pub async fn set_save_status(
    conn: &mut SqliteConnection,
    save_id: i64,
    status: SaveStatus,
) -> Result<(), StoreError> {
    sqlx::query("UPDATE game_saves SET status = ?, updated_at = ? WHERE save_id = ?")
        .bind(status.as_str())
        .bind(now_text())
        .bind(save_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Recent saves for the load menu, newest first.
pub async fn list_recent_saves(
    conn: &mut SqliteConnection,
    limit: i64,
) -> Result<Vec<SaveSummary>, StoreError> {
    let rows = sqlx::query_as::<_, SaveSummaryRow>(
        "SELECT save_id, player_name, current_day, cash, difficulty, status, updated_at \
         FROM game_saves ORDER BY updated_at DESC, save_id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(&mut *conn)
    .await?;
    rows.into_iter().map(SaveSummaryRow::into_domain).collect()
}

// ---------- aircraft_models ----------

/// Insert or replace a catalog entry.
pub async fn upsert_model(
    conn: &mut SqliteConnection,
    model: &AircraftModel,
) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT OR REPLACE INTO aircraft_models \
           (model_code, manufacturer, model_name, purchase_price, base_cargo_kg, range_km, \
            cruise_speed_kts, category, eco_fee_multiplier, eco_class) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&model.model_code)
    .bind(&model.manufacturer)
    .bind(&model.model_name)
    .bind(money_text(model.purchase_price))
    .bind(model.base_cargo_kg)
    .bind(model.range_km)
    .bind(model.cruise_speed_kts)
    .bind(model.category.as_str())
    .bind(model.eco_fee_multiplier)
    .bind(&model.eco_class)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Fetch a catalog entry by code.
pub async fn fetch_model(
    conn: &mut SqliteConnection,
    model_code: &str,
) -> Result<Option<AircraftModel>, StoreError> {
    let row = sqlx::query_as::<_, ModelRow>(
        "SELECT model_code, manufacturer, model_name, purchase_price, base_cargo_kg, range_km, \
                cruise_speed_kts, category, eco_fee_multiplier, eco_class \
         FROM aircraft_models WHERE model_code = ?",
    )
    .bind(model_code)
    .fetch_optional(&mut *conn)
    .await?;
    row.map(ModelRow::into_domain).transpose()
}

/// The whole catalog, cheapest first. Shop gating by base tier happens in
/// typed code on top of this.
pub async fn all_models(conn: &mut SqliteConnection) -> Result<Vec<AircraftModel>, StoreError> {
    let rows = sqlx::query_as::<_, ModelRow>(
        "SELECT model_code, manufacturer, model_name, purchase_price, base_cargo_kg, range_km, \
                cruise_speed_kts, category, eco_fee_multiplier, eco_class \
         FROM aircraft_models ORDER BY purchase_price ASC, model_code ASC",
    )
    .fetch_all(&mut *conn)
    .await?;
    rows.into_iter().map(ModelRow::into_domain).collect()
}

/// Number of catalog entries (used to decide whether seeding is needed).
pub async fn model_count(conn: &mut SqliteConnection) -> Result<i64, StoreError> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM aircraft_models")
        .fetch_one(&mut *conn)
        .await?;
    Ok(n)
}

// ---------- aircraft ----------

/// Insert an aircraft. Returns the aircraft id.
pub async fn insert_aircraft(
    conn: &mut SqliteConnection,
    aircraft: &Aircraft,
) -> Result<i64, StoreError> {
    let sale_price = aircraft.sale_price.map(money_text);
    let res = sqlx::query(
        "INSERT INTO aircraft \
           (save_id, model_code, registration, nickname, current_airport_ident, acquired_day, \
            purchase_price, condition_percent, status, hours_flown, sold_day, sale_price, base_id) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(aircraft.save_id)
    .bind(&aircraft.model_code)
    .bind(&aircraft.registration)
    .bind(&aircraft.nickname)
    .bind(&aircraft.current_airport_ident)
    .bind(aircraft.acquired_day)
    .bind(money_text(aircraft.purchase_price))
    .bind(aircraft.condition_percent)
    .bind(aircraft.status.as_str())
    .bind(aircraft.hours_flown)
    .bind(aircraft.sold_day)
    .bind(sale_price)
    .bind(aircraft.base_id)
    .execute(&mut *conn)
    .await?;
    Ok(res.last_insert_rowid())
}

/// Fetch an aircraft joined with its model.
pub async fn fetch_aircraft_with_model(
    conn: &mut SqliteConnection,
    aircraft_id: i64,
) -> Result<Option<(Aircraft, AircraftModel)>, StoreError> {
    let sql = format!("{AIRCRAFT_MODEL_JOIN} WHERE a.aircraft_id = ?");
    let row = sqlx::query_as::<_, AircraftWithModelRow>(&sql)
        .bind(aircraft_id)
        .fetch_optional(&mut *conn)
        .await?;
    row.map(AircraftWithModelRow::into_domain).transpose()
}

/// Active (not sold) aircraft of a save, joined with models.
pub async fn fleet(
    conn: &mut SqliteConnection,
    save_id: i64,
) -> Result<Vec<(Aircraft, AircraftModel)>, StoreError> {
    let sql = format!(
        "{AIRCRAFT_MODEL_JOIN} \
         WHERE a.save_id = ? AND (a.sold_day IS NULL OR a.sold_day = 0) \
         ORDER BY a.aircraft_id"
    );
    let rows = sqlx::query_as::<_, AircraftWithModelRow>(&sql)
        .bind(save_id)
        .fetch_all(&mut *conn)
        .await?;
    rows.into_iter()
        .map(AircraftWithModelRow::into_domain)
        .collect()
}

/// Idle, active aircraft available for a new contract.
pub async fn idle_aircraft(
    conn: &mut SqliteConnection,
    save_id: i64,
) -> Result<Vec<(Aircraft, AircraftModel)>, StoreError> {
    let sql = format!(
        "{AIRCRAFT_MODEL_JOIN} \
         WHERE a.save_id = ? AND a.status = 'IDLE' \
           AND (a.sold_day IS NULL OR a.sold_day = 0) \
         ORDER BY a.aircraft_id"
    );
    let rows = sqlx::query_as::<_, AircraftWithModelRow>(&sql)
        .bind(save_id)
        .fetch_all(&mut *conn)
        .await?;
    rows.into_iter()
        .map(AircraftWithModelRow::into_domain)
        .collect()
}

/// Mark an aircraft BUSY or IDLE.
pub async fn set_aircraft_status(
    conn: &mut SqliteConnection,
    aircraft_id: i64,
    status: AircraftStatus,
) -> Result<(), StoreError> {
    sqlx::query("UPDATE aircraft SET status = ? WHERE aircraft_id = ?")
        .bind(status.as_str())
        .bind(aircraft_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Release an aircraft at its arrival airport.
pub async fn land_aircraft(
    conn: &mut SqliteConnection,
    aircraft_id: i64,
    airport_ident: &str,
) -> Result<(), StoreError> {
    sqlx::query(
        "UPDATE aircraft SET status = 'IDLE', current_airport_ident = ? WHERE aircraft_id = ?",
    )
    .bind(airport_ident)
    .bind(aircraft_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Count active aircraft split into (starters, non-starters) for billing.
pub async fn active_fleet_counts(
    conn: &mut SqliteConnection,
    save_id: i64,
) -> Result<(i64, i64), StoreError> {
    let (total, starters): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), \
                COALESCE(SUM(CASE WHEN m.category = 'STARTER' THEN 1 ELSE 0 END), 0) \
         FROM aircraft a \
         JOIN aircraft_models m ON m.model_code = a.model_code \
         WHERE a.save_id = ? AND (a.sold_day IS NULL OR a.sold_day = 0)",
    )
    .bind(save_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok((starters, (total - starters).max(0)))
}

// ---------- aircraft_upgrades ----------

/// Latest upgrade state by recency, or `None` when no history exists.
pub async fn latest_upgrade_state(
    conn: &mut SqliteConnection,
    aircraft_id: i64,
    upgrade_code: &str,
) -> Result<Option<UpgradeState>, StoreError> {
    let row = sqlx::query_as::<_, UpgradeStateRow>(
        "SELECT level, eco_factor_per_level, eco_floor \
         FROM aircraft_upgrades \
         WHERE aircraft_id = ? AND upgrade_code = ? \
         ORDER BY aircraft_upgrade_id DESC LIMIT 1",
    )
    .bind(aircraft_id)
    .bind(upgrade_code)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(row.map(UpgradeStateRow::into_domain))
}

/// Append an upgrade history row (history is immutable, never updated).
pub async fn insert_upgrade(
    conn: &mut SqliteConnection,
    aircraft_id: i64,
    upgrade_code: &str,
    level: i64,
    installed_day: i64,
    eco_factor_per_level: f64,
    eco_floor: f64,
) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO aircraft_upgrades \
           (aircraft_id, upgrade_code, level, installed_day, eco_factor_per_level, eco_floor) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(aircraft_id)
    .bind(upgrade_code)
    .bind(level)
    .bind(installed_day)
    .bind(eco_factor_per_level)
    .bind(eco_floor)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

// ---------- contracts & flights ----------

/// Insert an accepted contract. Returns the contract id.
#[allow(clippy::too_many_arguments)]
pub async fn insert_contract(
    conn: &mut SqliteConnection,
    save_id: i64,
    aircraft_id: i64,
    dest_ident: &str,
    payload_kg: i64,
    reward: Decimal,
    penalty: Decimal,
    created_day: i64,
    deadline_day: i64,
) -> Result<i64, StoreError> {
    let res = sqlx::query(
        "INSERT INTO contracts \
           (save_id, aircraft_id, dest_ident, payload_kg, reward, penalty, \
            created_day, deadline_day, accepted_day, completed_day, status) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, NULL, 'IN_PROGRESS')",
    )
    .bind(save_id)
    .bind(aircraft_id)
    .bind(dest_ident)
    .bind(payload_kg)
    .bind(money_text(reward))
    .bind(money_text(penalty))
    .bind(created_day)
    .bind(deadline_day)
    .bind(created_day)
    .execute(&mut *conn)
    .await?;
    Ok(res.last_insert_rowid())
}

/// Settle a contract as completed (possibly late).
pub async fn complete_contract(
    conn: &mut SqliteConnection,
    contract_id: i64,
    status: ContractStatus,
    completed_day: i64,
) -> Result<(), StoreError> {
    sqlx::query("UPDATE contracts SET status = ?, completed_day = ? WHERE contract_id = ?")
        .bind(status.as_str())
        .bind(completed_day)
        .bind(contract_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// In-progress contracts joined with aircraft registration and flight ETA,
/// ordered by urgency.
pub async fn active_contracts(
    conn: &mut SqliteConnection,
    save_id: i64,
) -> Result<Vec<ContractView>, StoreError> {
    let rows = sqlx::query_as::<_, ContractViewRow>(
        "SELECT c.contract_id, c.dest_ident, c.payload_kg, c.reward, c.penalty, \
                c.deadline_day, c.status, \
                a.registration, f.arrival_day, f.status AS flight_status \
         FROM contracts c \
         LEFT JOIN aircraft a ON a.aircraft_id = c.aircraft_id \
         LEFT JOIN flights f ON f.contract_id = c.contract_id \
         WHERE c.save_id = ? AND c.status = 'IN_PROGRESS' \
         ORDER BY c.deadline_day ASC, c.contract_id ASC",
    )
    .bind(save_id)
    .fetch_all(&mut *conn)
    .await?;
    rows.into_iter().map(ContractViewRow::into_domain).collect()
}

/// Insert the flight fulfilling a contract. Returns the flight id.
#[allow(clippy::too_many_arguments)]
pub async fn insert_flight(
    conn: &mut SqliteConnection,
    save_id: i64,
    contract_id: i64,
    aircraft_id: i64,
    dep_ident: &str,
    arr_ident: &str,
    dep_day: i64,
    arrival_day: i64,
    distance_km: f64,
) -> Result<i64, StoreError> {
    let res = sqlx::query(
        "INSERT INTO flights \
           (save_id, contract_id, aircraft_id, dep_ident, arr_ident, dep_day, arrival_day, \
            status, distance_km) \
         VALUES (?, ?, ?, ?, ?, ?, ?, 'ENROUTE', ?)",
    )
    .bind(save_id)
    .bind(contract_id)
    .bind(aircraft_id)
    .bind(dep_ident)
    .bind(arr_ident)
    .bind(dep_day)
    .bind(arrival_day)
    .bind(distance_km)
    .execute(&mut *conn)
    .await?;
    Ok(res.last_insert_rowid())
}

/// Flights due on or before `day`, joined with contract settlement data.
pub async fn due_arrivals(
    conn: &mut SqliteConnection,
    save_id: i64,
    day: i64,
) -> Result<Vec<DueArrival>, StoreError> {
    let rows = sqlx::query_as::<_, DueArrivalRow>(
        "SELECT f.flight_id, f.contract_id, f.aircraft_id, f.arr_ident, f.arrival_day, \
                c.deadline_day, c.reward, c.penalty \
         FROM flights f \
         JOIN contracts c ON c.contract_id = f.contract_id \
         WHERE f.save_id = ? AND f.status = 'ENROUTE' AND f.arrival_day <= ?",
    )
    .bind(save_id)
    .bind(day)
    .fetch_all(&mut *conn)
    .await?;
    rows.into_iter().map(DueArrivalRow::into_domain).collect()
}

/// Mark a flight ARRIVED.
pub async fn mark_flight_arrived(
    conn: &mut SqliteConnection,
    flight_id: i64,
) -> Result<(), StoreError> {
    sqlx::query("UPDATE flights SET status = ? WHERE flight_id = ?")
        .bind(FlightStatus::Arrived.as_str())
        .bind(flight_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Number of flights still in the air for a save.
pub async fn enroute_count(conn: &mut SqliteConnection, save_id: i64) -> Result<i64, StoreError> {
    let n: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM flights WHERE save_id = ? AND status = 'ENROUTE'")
            .bind(save_id)
            .fetch_one(&mut *conn)
            .await?;
    Ok(n)
}

// ---------- owned_bases & base_upgrades ----------

const BASE_WITH_TIER: &str = "\
    SELECT ob.base_id, ob.save_id, ob.base_ident, ob.base_name, ob.acquired_day, \
           ob.purchase_cost, \
           (SELECT bu.upgrade_code FROM base_upgrades bu \
             WHERE bu.base_id = ob.base_id \
             ORDER BY bu.base_upgrade_id DESC LIMIT 1) AS tier \
    FROM owned_bases ob";

/// Insert an owned base. Returns the base id.
pub async fn insert_base(
    conn: &mut SqliteConnection,
    save_id: i64,
    base_ident: &str,
    base_name: &str,
    acquired_day: i64,
    purchase_cost: Decimal,
) -> Result<i64, StoreError> {
    let now = now_text();
    let res = sqlx::query(
        "INSERT INTO owned_bases \
           (save_id, base_ident, base_name, acquired_day, purchase_cost, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(save_id)
    .bind(base_ident)
    .bind(base_name)
    .bind(acquired_day)
    .bind(money_text(purchase_cost))
    .bind(&now)
    .bind(&now)
    .execute(&mut *conn)
    .await?;
    Ok(res.last_insert_rowid())
}

/// Append a tier history row for a base.
pub async fn insert_base_upgrade(
    conn: &mut SqliteConnection,
    base_id: i64,
    tier: sim_core::BaseTier,
    installed_day: i64,
    upgrade_cost: Decimal,
) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO base_upgrades (base_id, upgrade_code, installed_day, upgrade_cost) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(base_id)
    .bind(tier.as_str())
    .bind(installed_day)
    .bind(money_text(upgrade_cost))
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Fetch a base with its derived tier.
pub async fn fetch_base(
    conn: &mut SqliteConnection,
    base_id: i64,
) -> Result<Option<OwnedBase>, StoreError> {
    let sql = format!("{BASE_WITH_TIER} WHERE ob.base_id = ?");
    let row = sqlx::query_as::<_, BaseWithTierRow>(&sql)
        .bind(base_id)
        .fetch_optional(&mut *conn)
        .await?;
    row.map(BaseWithTierRow::into_domain).transpose()
}

/// All bases of a save with derived tiers, oldest first.
pub async fn bases_for_save(
    conn: &mut SqliteConnection,
    save_id: i64,
) -> Result<Vec<OwnedBase>, StoreError> {
    let sql = format!("{BASE_WITH_TIER} WHERE ob.save_id = ? ORDER BY ob.acquired_day, ob.base_id");
    let rows = sqlx::query_as::<_, BaseWithTierRow>(&sql)
        .bind(save_id)
        .fetch_all(&mut *conn)
        .await?;
    rows.into_iter().map(BaseWithTierRow::into_domain).collect()
}

/// The first base a save founded, if any.
pub async fn primary_base(
    conn: &mut SqliteConnection,
    save_id: i64,
) -> Result<Option<OwnedBase>, StoreError> {
    let mut bases = bases_for_save(conn, save_id).await?;
    Ok(if bases.is_empty() {
        None
    } else {
        Some(bases.remove(0))
    })
}

/// Look up a base by its airport ident within a save.
pub async fn base_by_ident(
    conn: &mut SqliteConnection,
    save_id: i64,
    base_ident: &str,
) -> Result<Option<OwnedBase>, StoreError> {
    let sql = format!("{BASE_WITH_TIER} WHERE ob.save_id = ? AND ob.base_ident = ?");
    let row = sqlx::query_as::<_, BaseWithTierRow>(&sql)
        .bind(save_id)
        .bind(base_ident)
        .fetch_optional(&mut *conn)
        .await?;
    row.map(BaseWithTierRow::into_domain).transpose()
}

// ---------- airports ----------

/// Insert or replace an airport.
pub async fn upsert_airport(
    conn: &mut SqliteConnection,
    airport: &Airport,
) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT OR REPLACE INTO airports (ident, name, airport_type, latitude_deg, longitude_deg) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&airport.ident)
    .bind(&airport.name)
    .bind(&airport.airport_type)
    .bind(airport.latitude_deg)
    .bind(airport.longitude_deg)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Coordinates for an airport, `None` when the airport or its geodata is
/// missing.
pub async fn airport_coords(
    conn: &mut SqliteConnection,
    ident: &str,
) -> Result<Option<(f64, f64)>, StoreError> {
    let row = sqlx::query_as::<_, AirportRow>(
        "SELECT ident, name, airport_type, latitude_deg, longitude_deg \
         FROM airports WHERE ident = ?",
    )
    .bind(ident)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(row.and_then(|r| r.into_domain().coords()))
}

/// Random sample of airports excluding one ident, restricted to the types
/// eligible as cargo destinations.
pub async fn sample_airports(
    conn: &mut SqliteConnection,
    count: i64,
    exclude_ident: &str,
) -> Result<Vec<Airport>, StoreError> {
    let rows = sqlx::query_as::<_, AirportRow>(
        "SELECT ident, name, airport_type, latitude_deg, longitude_deg \
         FROM airports \
         WHERE ident <> ? \
           AND airport_type IN ('small_airport', 'medium_airport', 'large_airport') \
         ORDER BY RANDOM() LIMIT ?",
    )
    .bind(exclude_ident)
    .bind(count)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows.into_iter().map(AirportRow::into_domain).collect())
}

/// Number of known airports (used to decide whether seeding is needed).
pub async fn airport_count(conn: &mut SqliteConnection) -> Result<i64, StoreError> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM airports")
        .fetch_one(&mut *conn)
        .await?;
    Ok(n)
}
