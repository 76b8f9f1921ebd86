//! Store: pool lifecycle, schema DDL and reference-data seeding.

use crate::{queries, StoreError};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::str::FromStr;
use tracing::info;

/// Returns the default SQLite URL used for local saves.
pub fn default_sqlite_url() -> &'static str {
    "sqlite://./saves/main.db"
}

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS game_saves (
        save_id INTEGER PRIMARY KEY AUTOINCREMENT,
        player_name TEXT NOT NULL,
        current_day INTEGER NOT NULL DEFAULT 1,
        cash TEXT NOT NULL,
        difficulty TEXT NOT NULL DEFAULT 'NORMAL',
        status TEXT NOT NULL DEFAULT 'ACTIVE',
        rng_seed INTEGER,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS aircraft_models (
        model_code TEXT PRIMARY KEY,
        manufacturer TEXT NOT NULL,
        model_name TEXT NOT NULL,
        purchase_price TEXT NOT NULL,
        base_cargo_kg INTEGER NOT NULL,
        range_km REAL NOT NULL,
        cruise_speed_kts REAL NOT NULL,
        category TEXT NOT NULL,
        eco_fee_multiplier REAL NOT NULL,
        eco_class TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS owned_bases (
        base_id INTEGER PRIMARY KEY AUTOINCREMENT,
        save_id INTEGER NOT NULL REFERENCES game_saves(save_id),
        base_ident TEXT NOT NULL,
        base_name TEXT NOT NULL,
        acquired_day INTEGER NOT NULL,
        purchase_cost TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS base_upgrades (
        base_upgrade_id INTEGER PRIMARY KEY AUTOINCREMENT,
        base_id INTEGER NOT NULL REFERENCES owned_bases(base_id),
        upgrade_code TEXT NOT NULL,
        installed_day INTEGER NOT NULL,
        upgrade_cost TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS aircraft (
        aircraft_id INTEGER PRIMARY KEY AUTOINCREMENT,
        save_id INTEGER NOT NULL REFERENCES game_saves(save_id),
        model_code TEXT NOT NULL REFERENCES aircraft_models(model_code),
        registration TEXT NOT NULL,
        nickname TEXT,
        current_airport_ident TEXT NOT NULL,
        acquired_day INTEGER NOT NULL,
        purchase_price TEXT NOT NULL,
        condition_percent INTEGER NOT NULL DEFAULT 100,
        status TEXT NOT NULL DEFAULT 'IDLE',
        hours_flown REAL NOT NULL DEFAULT 0,
        sold_day INTEGER,
        sale_price TEXT,
        base_id INTEGER REFERENCES owned_bases(base_id)
    )",
    "CREATE TABLE IF NOT EXISTS aircraft_upgrades (
        aircraft_upgrade_id INTEGER PRIMARY KEY AUTOINCREMENT,
        aircraft_id INTEGER NOT NULL REFERENCES aircraft(aircraft_id),
        upgrade_code TEXT NOT NULL,
        level INTEGER NOT NULL,
        installed_day INTEGER NOT NULL,
        eco_factor_per_level REAL NOT NULL,
        eco_floor REAL NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_air_upg_air_code \
     ON aircraft_upgrades (aircraft_id, upgrade_code)",
    "CREATE INDEX IF NOT EXISTS idx_air_upg_day ON aircraft_upgrades (installed_day)",
    "CREATE TABLE IF NOT EXISTS contracts (
        contract_id INTEGER PRIMARY KEY AUTOINCREMENT,
        save_id INTEGER NOT NULL REFERENCES game_saves(save_id),
        aircraft_id INTEGER NOT NULL REFERENCES aircraft(aircraft_id),
        dest_ident TEXT NOT NULL,
        payload_kg INTEGER NOT NULL,
        reward TEXT NOT NULL,
        penalty TEXT NOT NULL,
        created_day INTEGER NOT NULL,
        deadline_day INTEGER NOT NULL,
        accepted_day INTEGER NOT NULL,
        completed_day INTEGER,
        status TEXT NOT NULL DEFAULT 'IN_PROGRESS'
    )",
    "CREATE TABLE IF NOT EXISTS flights (
        flight_id INTEGER PRIMARY KEY AUTOINCREMENT,
        save_id INTEGER NOT NULL REFERENCES game_saves(save_id),
        contract_id INTEGER NOT NULL REFERENCES contracts(contract_id),
        aircraft_id INTEGER NOT NULL REFERENCES aircraft(aircraft_id),
        dep_ident TEXT NOT NULL,
        arr_ident TEXT NOT NULL,
        dep_day INTEGER NOT NULL,
        arrival_day INTEGER NOT NULL,
        status TEXT NOT NULL DEFAULT 'ENROUTE',
        distance_km REAL NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_flights_enroute ON flights (save_id, status, arrival_day)",
    "CREATE TABLE IF NOT EXISTS airports (
        ident TEXT PRIMARY KEY,
        name TEXT,
        airport_type TEXT NOT NULL,
        latitude_deg REAL,
        longitude_deg REAL
    )",
];

/// Pool wrapper owning the database handle for one session.
#[derive(Clone, Debug)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (and create if missing) a database at a `sqlite://` URL.
    pub async fn open(url: &str) -> Result<Store, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(sqlx::Error::from)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Ok(Store { pool })
    }

    /// Open a private in-memory database. A single pooled connection keeps
    /// every handle on the same memory database.
    pub async fn open_memory() -> Result<Store, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(sqlx::Error::from)?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(Store { pool })
    }

    /// The underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// A pooled connection for read paths.
    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>, StoreError> {
        Ok(self.pool.acquire().await?)
    }

    /// Begin a write transaction. Dropping it without commit rolls back,
    /// which is what guarantees release on every exit path.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, StoreError> {
        Ok(self.pool.begin().await?)
    }

    /// Create all tables and indexes if they do not exist yet.
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        let mut conn = self.acquire().await?;
        for ddl in SCHEMA {
            sqlx::query(ddl).execute(&mut *conn).await?;
        }
        Ok(())
    }

    /// Seed the aircraft catalog and reference airports when absent.
    pub async fn seed_reference_data(&self) -> Result<(), StoreError> {
        let mut conn = self.acquire().await?;
        if queries::model_count(&mut conn).await? == 0 {
            for model in sim_core::catalog::default_models() {
                queries::upsert_model(&mut conn, &model).await?;
            }
            info!("seeded aircraft model catalog");
        }
        if queries::airport_count(&mut conn).await? == 0 {
            for airport in sim_core::catalog::reference_airports() {
                queries::upsert_airport(&mut conn, &airport).await?;
            }
            info!("seeded reference airports");
        }
        Ok(())
    }
}
