//! Position-tracking loop.
//!
//! Polls the flight-state feed for each tracked corridor's bounding box
//! and appends the resulting samples to the route's recorded history.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;

use crate::persistence::locations;
use crate::state::AppState;

pub async fn run_track_loop(state: Arc<AppState>, poll_secs: u64, once: bool) {
    let mut ticker = interval(Duration::from_secs(poll_secs));

    loop {
        ticker.tick().await;
        track_once(&state).await;
        if once {
            return;
        }
    }
}

async fn track_once(state: &AppState) {
    for route in &state.routes {
        let key = route.key();
        let bbox = route.bounding_box();

        let states = match state.flight_states.states_within(&bbox).await {
            Ok(states) => states,
            Err(err) => {
                tracing::warn!(route = %key, "flight state poll failed: {err:#}");
                continue;
            }
        };

        let mut stored = 0usize;
        for vector in &states {
            let Some(sample) = vector.to_sample() else {
                continue;
            };
            match locations::insert_sample(state.db.pool(), &key, &sample).await {
                Ok(()) => stored += 1,
                Err(err) => {
                    tracing::warn!(route = %key, flight = %sample.flight_id,
                        "failed to persist sample: {err:#}");
                }
            }
        }

        tracing::debug!(route = %key, observed = states.len(), stored, "track poll complete");
    }
}
