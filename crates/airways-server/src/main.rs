//! Airways server - always-on daemon tracking flight corridors against
//! convective weather.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use airways_server::config::Config;
use airways_server::state::AppState;
use airways_server::{fixtures, loops, persistence};

#[derive(Parser, Debug)]
#[command(name = "airways-server", about = "Corridor tracking and hazard detection daemon")]
struct Args {
    /// Run one poll and detection cycle, then exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("airways_server=debug".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env();

    tracing::info!("Starting airways server...");

    let db = persistence::init_database(&config.db_path, 5).await?;
    persistence::airports::seed_airports(db.pool(), &fixtures::seed_airports()).await?;

    let state = AppState::new(&config, db).await?;
    for route in &state.routes {
        tracing::info!(route = %route.key(), "tracking corridor");
    }

    if args.once {
        // One ordered cycle: ingest, refresh weather, then detect.
        loops::track_loop::run_track_loop(state.clone(), config.track_poll_secs, true).await;
        loops::weather_loop::run_weather_loop(state.clone(), config.detect_poll_secs, true).await;
        loops::detect_loop::run_detect_loop(state.clone(), config.detect_poll_secs, true).await;
        tracing::info!("single cycle complete");
        return Ok(());
    }

    let track = tokio::spawn(loops::track_loop::run_track_loop(
        state.clone(),
        config.track_poll_secs,
        false,
    ));
    let weather = tokio::spawn(loops::weather_loop::run_weather_loop(
        state.clone(),
        config.detect_poll_secs,
        false,
    ));
    let detect = tokio::spawn(loops::detect_loop::run_detect_loop(
        state.clone(),
        config.detect_poll_secs,
        false,
    ));

    track.await?;
    weather.await?;
    detect.await?;
    Ok(())
}
