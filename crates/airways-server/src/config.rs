//! Server configuration from environment.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub states_url: String,
    pub radar_url: String,
    pub track_poll_secs: u64,
    pub detect_poll_secs: u64,
    pub radar_refresh_secs: u64,
    /// Tracked routes as "DEP-DEST" ICAO pairs.
    pub routes: Vec<(String, String)>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            db_path: env::var("AIRWAYS_DB_PATH")
                .unwrap_or_else(|_| "data/airways.db".to_string()),
            states_url: env::var("AIRWAYS_STATES_URL")
                .unwrap_or_else(|_| airways_feeds::DEFAULT_STATES_URL.to_string()),
            radar_url: env::var("AIRWAYS_RADAR_URL")
                .unwrap_or_else(|_| "http://localhost:8090/cells".to_string()),
            track_poll_secs: env::var("AIRWAYS_TRACK_POLL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            detect_poll_secs: env::var("AIRWAYS_DETECT_POLL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
            radar_refresh_secs: env::var("AIRWAYS_RADAR_REFRESH_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(300),
            routes: env::var("AIRWAYS_ROUTES")
                .map(|raw| parse_routes(&raw))
                .unwrap_or_else(|_| vec![("SBGR".to_string(), "SBBR".to_string())]),
        }
    }
}

fn parse_routes(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|pair| {
            let (dep, dest) = pair.trim().split_once('-')?;
            if dep.is_empty() || dest.is_empty() {
                return None;
            }
            Some((dep.to_uppercase(), dest.to_uppercase()))
        })
        .collect()
}
