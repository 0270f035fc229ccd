//! Position-sample persistence.
//!
//! Samples are stored per route so the analyzer can reload the full
//! history of a corridor as flight tracks.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use airways_core::models::{FlightTrack, PositionSample, RouteKey};

/// Append one position sample observed on a route.
pub async fn insert_sample(
    pool: &SqlitePool,
    route: &RouteKey,
    sample: &PositionSample,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO position_samples (
            flight_id, departure, destination,
            latitude, longitude, altitude_m, speed_mps, timestamp
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&sample.flight_id)
    .bind(&route.departure)
    .bind(&route.destination)
    .bind(sample.latitude)
    .bind(sample.longitude)
    .bind(sample.altitude_m)
    .bind(sample.speed_mps)
    .bind(sample.timestamp.to_rfc3339())
    .execute(pool)
    .await?;
    Ok(())
}

/// Load every recorded track on a route, grouped by flight and ordered
/// by report time within each flight.
pub async fn load_tracks(pool: &SqlitePool, route: &RouteKey) -> Result<Vec<FlightTrack>> {
    let rows = sqlx::query(
        r#"
        SELECT flight_id, latitude, longitude, altitude_m, speed_mps, timestamp
        FROM position_samples
        WHERE departure = ?1 AND destination = ?2
        ORDER BY flight_id, timestamp
        "#,
    )
    .bind(&route.departure)
    .bind(&route.destination)
    .fetch_all(pool)
    .await?;

    let mut tracks: Vec<FlightTrack> = Vec::new();
    for row in rows {
        let flight_id: String = row.get("flight_id");
        let raw_timestamp: String = row.get("timestamp");
        let timestamp = DateTime::parse_from_rfc3339(&raw_timestamp)
            .context("invalid timestamp in position_samples")?
            .with_timezone(&Utc);
        let sample = PositionSample {
            flight_id: flight_id.clone(),
            latitude: row.get("latitude"),
            longitude: row.get("longitude"),
            altitude_m: row.get("altitude_m"),
            speed_mps: row.get("speed_mps"),
            timestamp,
        };
        match tracks.last_mut() {
            Some(track) if track.flight_id == flight_id => track.samples.push(sample),
            _ => tracks.push(FlightTrack::new(flight_id, vec![sample])),
        }
    }
    Ok(tracks)
}

/// Number of samples recorded on a route.
pub async fn count_samples(pool: &SqlitePool, route: &RouteKey) -> Result<i64> {
    let row = sqlx::query(
        "SELECT COUNT(*) AS n FROM position_samples WHERE departure = ?1 AND destination = ?2",
    )
    .bind(&route.departure)
    .bind(&route.destination)
    .fetch_one(pool)
    .await?;
    Ok(row.get("n"))
}
