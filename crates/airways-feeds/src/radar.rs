//! Convective-cell radar feed.
//!
//! Polls a weather-radar endpoint that publishes storm cells as a JSON map
//! of `id -> { "0": { Latitude, Longitude, Raio } }`, with the radius in
//! kilometres. The client keeps the latest snapshot behind a mutex and
//! raises an atomic changed flag whenever a refresh produces a different
//! cell set, so analyzers can invalidate derived intersections.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::Value;

use airways_core::models::HazardCell;
use airways_core::provider::HazardCellSource;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(300);

struct Snapshot {
    cells: Vec<HazardCell>,
    refreshed_at: Option<DateTime<Utc>>,
}

/// Client for the convective-cell radar feed.
pub struct ConvectionRadar {
    client: Client,
    url: String,
    refresh_interval: Duration,
    snapshot: Mutex<Snapshot>,
    changed: AtomicBool,
}

impl ConvectionRadar {
    pub fn new(url: impl Into<String>, refresh_interval: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            url: url.into(),
            refresh_interval,
            snapshot: Mutex::new(Snapshot {
                cells: Vec::new(),
                refreshed_at: None,
            }),
            changed: AtomicBool::new(false),
        }
    }

    /// Fetch the feed and replace the snapshot unconditionally.
    pub async fn refresh(&self) -> Result<()> {
        let payload: Value = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .context("radar request failed")?
            .json()
            .await
            .context("radar response was not valid JSON")?;

        let cells = parse_cells(&payload, Utc::now());
        if self.apply_cells(cells) {
            tracing::info!("radar cell set changed");
        }
        Ok(())
    }

    /// Fetch the feed only when the snapshot is older than the refresh
    /// interval.
    pub async fn refresh_if_stale(&self) -> Result<()> {
        let stale = {
            if let Ok(snapshot) = self.snapshot.lock() {
                match snapshot.refreshed_at {
                    Some(at) => {
                        Utc::now().signed_duration_since(at).num_seconds()
                            >= self.refresh_interval.as_secs() as i64
                    }
                    None => true,
                }
            } else {
                true
            }
        };
        if stale {
            self.refresh().await?;
        }
        Ok(())
    }

    /// Install a new cell set. Returns true and raises the changed flag
    /// when it differs from the previous set.
    fn apply_cells(&self, cells: Vec<HazardCell>) -> bool {
        if let Ok(mut snapshot) = self.snapshot.lock() {
            let changed = !same_cell_set(&snapshot.cells, &cells);
            snapshot.cells = cells;
            snapshot.refreshed_at = Some(Utc::now());
            if changed {
                self.changed.store(true, Ordering::SeqCst);
            }
            changed
        } else {
            false
        }
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot
            .lock()
            .ok()
            .and_then(|snapshot| snapshot.refreshed_at)
    }
}

impl HazardCellSource for ConvectionRadar {
    fn cells(&self) -> Vec<HazardCell> {
        if let Ok(snapshot) = self.snapshot.lock() {
            snapshot.cells.clone()
        } else {
            Vec::new()
        }
    }

    fn take_changed(&self) -> bool {
        self.changed.swap(false, Ordering::SeqCst)
    }
}

/// Two cell sets describe the same weather when they contain the same
/// positions and radii, regardless of order or observation time.
fn same_cell_set(previous: &[HazardCell], next: &[HazardCell]) -> bool {
    if previous.len() != next.len() {
        return false;
    }
    previous.iter().all(|cell| next.contains(cell))
}

fn parse_cells(payload: &Value, observed_at: DateTime<Utc>) -> Vec<HazardCell> {
    let Some(entries) = payload.as_object() else {
        return Vec::new();
    };
    let mut cells = Vec::new();
    for (id, entry) in entries {
        let Some(detail) = entry.get("0") else {
            tracing::warn!(cell = %id, "radar entry without detail record");
            continue;
        };
        let latitude = detail.get("Latitude").and_then(Value::as_f64);
        let longitude = detail.get("Longitude").and_then(Value::as_f64);
        let radius_km = detail.get("Raio").and_then(Value::as_f64);
        match (latitude, longitude, radius_km) {
            (Some(latitude), Some(longitude), Some(radius_km)) => {
                cells.push(HazardCell::new(
                    latitude,
                    longitude,
                    radius_km * 1_000.0,
                    observed_at,
                ));
            }
            _ => {
                tracing::warn!(cell = %id, "radar entry missing coordinates or radius");
            }
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> Value {
        json!({
            "1042": { "0": { "Latitude": -23.01, "Longitude": -47.42, "Raio": 50.0 } },
            "1043": { "0": { "Latitude": -22.55, "Longitude": -46.88, "Raio": 30.0 } },
            "1044": { "0": { "Latitude": -21.0 } }
        })
    }

    #[test]
    fn parses_cells_and_converts_radius_to_meters() {
        let cells = parse_cells(&payload(), Utc::now());
        assert_eq!(cells.len(), 2);
        let cell = cells
            .iter()
            .find(|cell| cell.latitude == -23.01)
            .unwrap();
        assert_eq!(cell.longitude, -47.42);
        assert_eq!(cell.radius_m, 50_000.0);
    }

    #[test]
    fn changed_flag_raised_only_on_new_cell_set() {
        let radar = ConvectionRadar::new("http://unused", DEFAULT_REFRESH_INTERVAL);
        let cells = parse_cells(&payload(), Utc::now());

        assert!(radar.apply_cells(cells.clone()));
        assert!(radar.take_changed());
        assert!(!radar.take_changed());

        // same cells again, only timestamps differ
        let again = parse_cells(&payload(), Utc::now());
        assert!(!radar.apply_cells(again));
        assert!(!radar.take_changed());

        assert!(radar.apply_cells(Vec::new()));
        assert!(radar.take_changed());
    }

    #[test]
    fn snapshot_serves_cells_through_source_trait() {
        let radar = ConvectionRadar::new("http://unused", DEFAULT_REFRESH_INTERVAL);
        radar.apply_cells(parse_cells(&payload(), Utc::now()));

        let source: &dyn HazardCellSource = &radar;
        assert_eq!(source.cells().len(), 2);
        assert!(radar.refreshed_at().is_some());
    }
}
