//! Intersection-detection loop.
//!
//! Each cycle reloads the recorded tracks per corridor, runs the analyzer
//! against the current radar cells and persists any intersections found.
//! A changed radar snapshot drops cached intersections first so results
//! never reflect stale weather.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::interval;

use airways_core::HazardCellSource;

use crate::persistence::{locations, obstacles};
use crate::state::AppState;

pub async fn run_detect_loop(state: Arc<AppState>, poll_secs: u64, once: bool) {
    let mut ticker = interval(Duration::from_secs(poll_secs));

    loop {
        ticker.tick().await;
        detect_once(&state).await;
        if once {
            return;
        }
    }
}

async fn detect_once(state: &AppState) {
    let mut analyzer = state.analyzer.lock().await;

    if state.radar.take_changed() {
        tracing::info!("radar cells changed, dropping cached intersections");
        analyzer.invalidate_intersections();
    }

    for route in &state.routes {
        let key = route.key();

        let tracks = match locations::load_tracks(state.db.pool(), &key).await {
            Ok(tracks) => tracks,
            Err(err) => {
                tracing::warn!(route = %key, "failed to load tracks: {err:#}");
                continue;
            }
        };
        if tracks.is_empty() {
            tracing::debug!(route = %key, "no recorded tracks yet");
            continue;
        }

        let cells = state.radar.cells_within(&route.bounding_box());

        let section_set = match analyzer.sections_for(route, &tracks) {
            Ok(set) => set,
            Err(err) => {
                tracing::warn!(route = %key, "section build failed: {err}");
                continue;
            }
        };
        if !section_set.truncated_flights.is_empty() {
            tracing::debug!(route = %key,
                truncated = section_set.truncated_flights.len(),
                "some tracks were cut short at the corridor end");
        }

        let lanes: usize = analyzer
            .clusterings_for(&section_set.sections)
            .iter()
            .map(|clustering| clustering.cluster_count)
            .sum();

        let intersections = match analyzer.intersections_for(route, &tracks, &cells) {
            Ok(intersections) => intersections,
            Err(err) => {
                tracing::warn!(route = %key, "intersection sweep failed: {err}");
                continue;
            }
        };

        tracing::info!(route = %key,
            sections = section_set.sections.len(),
            lanes,
            cells = cells.len(),
            intersections = intersections.len(),
            "detection cycle complete");

        if intersections.is_empty() {
            continue;
        }

        if let Err(err) =
            obstacles::insert_intersections(state.db.pool(), &intersections, Utc::now()).await
        {
            tracing::warn!(route = %key, "failed to persist intersections: {err:#}");
        }
    }
}
