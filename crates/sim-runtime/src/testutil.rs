//! Shared fixtures for engine tests.

use persistence::{queries, Store};
use rust_decimal::Decimal;
use sim_core::{Aircraft, AircraftStatus};

pub(crate) async fn fresh_store() -> Store {
    let store = Store::open_memory().await.unwrap();
    store.init_schema().await.unwrap();
    store.seed_reference_data().await.unwrap();
    store
}

pub(crate) async fn create_save(store: &Store, cash: Decimal, day: i64) -> i64 {
    let mut conn = store.acquire().await.unwrap();
    let save_id = queries::insert_save(&mut conn, "Test Carrier", cash, "NORMAL", Some(7))
        .await
        .unwrap();
    if day != 1 {
        queries::set_save_day(&mut conn, save_id, day).await.unwrap();
    }
    save_id
}

pub(crate) async fn add_starter(store: &Store, save_id: i64, at_ident: &str) -> i64 {
    let mut conn = store.acquire().await.unwrap();
    let aircraft = Aircraft {
        aircraft_id: 0,
        save_id,
        model_code: sim_core::catalog::STARTER_MODEL_CODE.to_string(),
        registration: "666-TT01".to_string(),
        nickname: None,
        current_airport_ident: at_ident.to_string(),
        acquired_day: 1,
        purchase_price: Decimal::ZERO,
        condition_percent: 100,
        status: AircraftStatus::Idle,
        hours_flown: 0.0,
        sold_day: None,
        sale_price: None,
        base_id: None,
    };
    queries::insert_aircraft(&mut conn, &aircraft).await.unwrap()
}

/// Insert an IN_PROGRESS contract plus its ENROUTE flight and mark the
/// aircraft BUSY. Returns `(contract_id, flight_id)`.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn add_flight(
    store: &Store,
    save_id: i64,
    aircraft_id: i64,
    dest_ident: &str,
    arrival_day: i64,
    deadline_day: i64,
    reward: Decimal,
    penalty: Decimal,
) -> (i64, i64) {
    let mut conn = store.acquire().await.unwrap();
    let contract_id = queries::insert_contract(
        &mut conn,
        save_id,
        aircraft_id,
        dest_ident,
        1_000,
        reward,
        penalty,
        1,
        deadline_day,
    )
    .await
    .unwrap();
    let flight_id = queries::insert_flight(
        &mut conn,
        save_id,
        contract_id,
        aircraft_id,
        "EFHK",
        dest_ident,
        1,
        arrival_day,
        1_000.0,
    )
    .await
    .unwrap();
    queries::set_aircraft_status(&mut conn, aircraft_id, AircraftStatus::Busy)
        .await
        .unwrap();
    (contract_id, flight_id)
}
