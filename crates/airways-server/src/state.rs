//! Shared server state.

use std::sync::Arc;

use anyhow::{bail, Result};
use tokio::sync::Mutex;

use airways_core::models::Route;
use airways_core::{Analyzer, AnalyzerParams};
use airways_feeds::{ConvectionRadar, FlightStateClient};

use crate::config::Config;
use crate::persistence::{self, Database};

/// State shared by the background loops.
pub struct AppState {
    pub db: Database,
    pub analyzer: Mutex<Analyzer>,
    pub flight_states: FlightStateClient,
    pub radar: ConvectionRadar,
    /// Tracked corridors, resolved from airport reference data at startup.
    pub routes: Vec<Route>,
}

impl AppState {
    pub async fn new(config: &Config, db: Database) -> Result<Arc<Self>> {
        let mut routes = Vec::with_capacity(config.routes.len());
        for (departure, destination) in &config.routes {
            let Some(departure) = persistence::airports::get_airport(db.pool(), departure).await?
            else {
                bail!("unknown departure airport: {departure}");
            };
            let Some(destination) =
                persistence::airports::get_airport(db.pool(), destination).await?
            else {
                bail!("unknown destination airport: {destination}");
            };
            routes.push(Route::new(departure, destination));
        }

        Ok(Arc::new(Self {
            db,
            analyzer: Mutex::new(Analyzer::new(AnalyzerParams::default())),
            flight_states: FlightStateClient::new(&config.states_url),
            radar: ConvectionRadar::new(
                &config.radar_url,
                std::time::Duration::from_secs(config.radar_refresh_secs),
            ),
            routes,
        }))
    }
}
