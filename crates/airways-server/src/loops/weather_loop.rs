//! Radar refresh loop.
//!
//! Keeps the convective-cell snapshot fresh; the detection loop observes
//! changes through the radar's changed flag.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;

use crate::state::AppState;

pub async fn run_weather_loop(state: Arc<AppState>, poll_secs: u64, once: bool) {
    let mut ticker = interval(Duration::from_secs(poll_secs));

    loop {
        ticker.tick().await;
        if let Err(err) = state.radar.refresh_if_stale().await {
            tracing::warn!("radar refresh failed: {err:#}");
        }
        if once {
            return;
        }
    }
}
