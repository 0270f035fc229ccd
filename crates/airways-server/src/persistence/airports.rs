//! Airport reference-data persistence.

use anyhow::Result;
use sqlx::{Row, SqlitePool};

use airways_core::models::Airport;

/// Upsert one airport.
pub async fn upsert_airport(pool: &SqlitePool, airport: &Airport) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO airports (icao_code, name, latitude, longitude, altitude_m)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(icao_code) DO UPDATE SET
            name = ?2, latitude = ?3, longitude = ?4, altitude_m = ?5
        "#,
    )
    .bind(&airport.icao_code)
    .bind(&airport.name)
    .bind(airport.latitude)
    .bind(airport.longitude)
    .bind(airport.altitude_m)
    .execute(pool)
    .await?;
    Ok(())
}

/// Look up an airport by ICAO code.
pub async fn get_airport(pool: &SqlitePool, icao_code: &str) -> Result<Option<Airport>> {
    let row = sqlx::query(
        "SELECT icao_code, name, latitude, longitude, altitude_m FROM airports WHERE icao_code = ?1",
    )
    .bind(icao_code)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| Airport {
        icao_code: row.get("icao_code"),
        name: row.get("name"),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        altitude_m: row.get("altitude_m"),
    }))
}

/// Insert seed airports that are not already present.
pub async fn seed_airports(pool: &SqlitePool, airports: &[Airport]) -> Result<()> {
    for airport in airports {
        upsert_airport(pool, airport).await?;
    }
    Ok(())
}
