//! Detected-intersection persistence.
//!
//! Each detection cycle writes one row per (intersection, affected flight)
//! so impact history can be queried per corridor and per flight.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use airways_core::models::{Intersection, RouteKey};

/// Persist every intersection found in one detection cycle.
pub async fn insert_intersections(
    pool: &SqlitePool,
    intersections: &[Intersection],
    detected_at: DateTime<Utc>,
) -> Result<()> {
    let mut tx = pool.begin().await?;
    for intersection in intersections {
        for flight_id in &intersection.affected_flights {
            sqlx::query(
                r#"
                INSERT INTO obstacles (
                    departure, destination,
                    cell_latitude, cell_longitude, cell_radius_m,
                    impact_ratio, flight_id, detected_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&intersection.route.departure)
            .bind(&intersection.route.destination)
            .bind(intersection.cell.latitude)
            .bind(intersection.cell.longitude)
            .bind(intersection.cell.radius_m)
            .bind(intersection.impact_ratio)
            .bind(flight_id)
            .bind(detected_at.to_rfc3339())
            .execute(&mut *tx)
            .await?;
        }
    }
    tx.commit().await?;
    Ok(())
}

/// Impact-history row for one affected flight.
#[derive(Debug, Clone)]
pub struct ObstacleRecord {
    pub cell_latitude: f64,
    pub cell_longitude: f64,
    pub cell_radius_m: f64,
    pub impact_ratio: f64,
    pub flight_id: String,
}

/// Recorded obstacle rows for a route, newest first.
pub async fn load_obstacles(pool: &SqlitePool, route: &RouteKey) -> Result<Vec<ObstacleRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT cell_latitude, cell_longitude, cell_radius_m, impact_ratio, flight_id
        FROM obstacles
        WHERE departure = ?1 AND destination = ?2
        ORDER BY detected_at DESC, id DESC
        "#,
    )
    .bind(&route.departure)
    .bind(&route.destination)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| ObstacleRecord {
            cell_latitude: row.get("cell_latitude"),
            cell_longitude: row.get("cell_longitude"),
            cell_radius_m: row.get("cell_radius_m"),
            impact_ratio: row.get("impact_ratio"),
            flight_id: row.get("flight_id"),
        })
        .collect())
}
