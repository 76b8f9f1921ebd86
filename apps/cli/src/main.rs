#![deny(warnings)]

//! Headless CLI: bootstrap or load a game, accept a contract for the first
//! idle aircraft and fast-forward, printing a KPI summary. Interactive
//! menus live elsewhere; this binary drives the engine end to end.

use anyhow::Result;
use persistence::Store;
use rand::Rng;
use rust_decimal::Decimal;
use sim_core::config::GameConfig;
use sim_runtime::{GameSession, NewGameParams, StopReason};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

struct Args {
    db: Option<String>,
    player: String,
    days: i64,
    cash: i64,
    base_choice: usize,
    seed: Option<i64>,
    load_save: Option<i64>,
}

fn parse_args() -> Args {
    let mut args = Args {
        db: None,
        player: "Aurora Cargo".to_string(),
        days: 30,
        cash: 300_000,
        base_choice: 0,
        seed: None,
        load_save: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--db" => args.db = it.next(),
            "--player" => {
                if let Some(v) = it.next() {
                    args.player = v;
                }
            }
            "--days" => args.days = it.next().and_then(|s| s.parse().ok()).unwrap_or(args.days),
            "--cash" => args.cash = it.next().and_then(|s| s.parse().ok()).unwrap_or(args.cash),
            "--base" => {
                args.base_choice = it
                    .next()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(args.base_choice)
            }
            "--seed" => args.seed = it.next().and_then(|s| s.parse().ok()),
            "--load" => args.load_save = it.next().and_then(|s| s.parse().ok()),
            _ => {}
        }
    }
    args
}

fn random_registration() -> String {
    let mut rng = rand::thread_rng();
    let letters: String = (0..2)
        .map(|_| rng.gen_range(b'A'..=b'Z') as char)
        .collect();
    let digits: String = (0..2).map(|_| rng.gen_range(b'0'..=b'9') as char).collect();
    format!("N-{letters}{digits}")
}

fn fmt_money(amount: Decimal) -> String {
    format!("{amount:.2} EUR")
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let args = parse_args();
    info!(player = %args.player, days = args.days, "starting CLI");

    let store = match &args.db {
        Some(url) => Store::open(url).await?,
        None => Store::open_memory().await?,
    };
    store.init_schema().await?;
    store.seed_reference_data().await?;

    let cfg = GameConfig::standard();
    let session = match args.load_save {
        Some(save_id) => GameSession::load(store, cfg, save_id).await?,
        None => {
            let params = NewGameParams {
                player_name: args.player.clone(),
                starting_cash: Decimal::new(args.cash, 0),
                rng_seed: args.seed,
                base_choice: args.base_choice,
                ..NewGameParams::new(&args.player, &random_registration())
            };
            GameSession::new_game(store, cfg, params).await?
        }
    };

    let save = session.save().await?;
    println!(
        "Save #{} | {} | day {} | cash {} | {}",
        save.save_id,
        save.player_name,
        save.current_day,
        fmt_money(save.cash),
        save.status
    );

    for entry in session.fleet().await? {
        // Same bounded factor the reward computation applies.
        let factor = sim_econ::reward_factor(entry.effective_eco, &session.config().economy);
        println!(
            "  {} {} ({}) @ {} | {} kg | ECO level {} ({:+.2}) x {:.2}",
            entry.model.manufacturer,
            entry.model.model_name,
            entry.aircraft.registration,
            entry.aircraft.current_airport_ident,
            entry.model.base_cargo_kg,
            entry.eco_level,
            entry.effective_eco,
            factor
        );
    }

    // Put the first idle aircraft to work, if any offers come back.
    let idle = session
        .fleet()
        .await?
        .into_iter()
        .find(|e| e.aircraft.status == sim_core::AircraftStatus::Idle);
    if let Some(entry) = idle {
        let offers = session.generate_offers(entry.aircraft.aircraft_id).await?;
        for (i, o) in offers.iter().enumerate() {
            println!(
                "  offer {} -> {} | {} kg | {:.0} km | {} trips | {} days | {} | deadline day {}",
                i + 1,
                o.dest_ident,
                o.payload_kg,
                o.distance_km,
                o.trips,
                o.total_days,
                fmt_money(o.reward),
                o.deadline_day
            );
        }
        if let Some(offer) = offers.first() {
            let contract_id = session
                .accept_offer(entry.aircraft.aircraft_id, offer)
                .await?;
            println!(
                "Accepted contract #{} to {} (ETA day {})",
                contract_id,
                offer.dest_ident,
                save.current_day + offer.total_days
            );
        }
    }

    let summary = session.fast_forward(args.days).await?;
    println!(
        "Fast-forward | days: {} | arrivals: {} | earned: {} | stop: {:?}",
        summary.days_advanced,
        summary.arrivals,
        fmt_money(summary.earned),
        summary.stop_reason
    );

    let save = session.save().await?;
    println!(
        "KPI | day: {} | cash: {} | status: {}",
        save.current_day,
        fmt_money(save.cash),
        save.status
    );
    if summary.stop_reason == StopReason::Bankrupt {
        println!("The company went bankrupt.");
    }
    if summary.stop_reason == StopReason::Victory {
        println!(
            "Survived {} days. Victory!",
            session.config().goal.survival_target_days
        );
    }

    Ok(())
}
