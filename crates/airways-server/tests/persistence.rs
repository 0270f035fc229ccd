//! Round-trip tests for the SQLite persistence layer.

use std::collections::BTreeSet;

use chrono::{TimeZone, Utc};

use airways_core::models::{Airport, HazardCell, Intersection, PositionSample, RouteKey};
use airways_server::persistence::{airports, init_memory_database, locations, obstacles};

fn route_key() -> RouteKey {
    RouteKey {
        departure: "SBGR".to_string(),
        destination: "SBBR".to_string(),
    }
}

fn sample(flight_id: &str, latitude: f64, seconds: i64) -> PositionSample {
    PositionSample {
        flight_id: flight_id.to_string(),
        latitude,
        longitude: -46.5,
        altitude_m: 10_000.0,
        speed_mps: 230.0,
        timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
            + chrono::Duration::seconds(seconds),
    }
}

#[tokio::test]
async fn airport_round_trip() {
    let db = init_memory_database().await.unwrap();

    let airport =
        Airport::new("SBGR", "São Paulo-Guarulhos", -23.426, -46.468).with_altitude_m(750.0);
    airports::upsert_airport(db.pool(), &airport).await.unwrap();

    let loaded = airports::get_airport(db.pool(), "SBGR").await.unwrap().unwrap();
    assert_eq!(loaded, airport);
    assert_eq!(loaded.altitude_m, Some(750.0));

    assert!(airports::get_airport(db.pool(), "XXXX").await.unwrap().is_none());
}

#[tokio::test]
async fn samples_reload_as_tracks_grouped_by_flight() {
    let db = init_memory_database().await.unwrap();
    let key = route_key();

    // interleaved insert order across two flights
    for s in [
        sample("TAM3001", -23.0, 0),
        sample("GLO1412", -23.1, 5),
        sample("TAM3001", -22.8, 60),
        sample("GLO1412", -22.9, 65),
    ] {
        locations::insert_sample(db.pool(), &key, &s).await.unwrap();
    }

    assert_eq!(locations::count_samples(db.pool(), &key).await.unwrap(), 4);

    let tracks = locations::load_tracks(db.pool(), &key).await.unwrap();
    assert_eq!(tracks.len(), 2);
    for track in &tracks {
        assert_eq!(track.samples.len(), 2);
        assert!(track.samples[0].timestamp < track.samples[1].timestamp);
        assert!(track.samples.iter().all(|s| s.flight_id == track.flight_id));
    }

    let other = RouteKey {
        departure: "SBSP".to_string(),
        destination: "SBRJ".to_string(),
    };
    assert!(locations::load_tracks(db.pool(), &other).await.unwrap().is_empty());
}

#[tokio::test]
async fn intersections_round_trip_one_row_per_flight() {
    let db = init_memory_database().await.unwrap();
    let key = route_key();

    let intersection = Intersection {
        cell: HazardCell::new(-23.0, -47.4, 50_000.0, Utc::now()),
        route: key.clone(),
        impact_ratio: 0.4,
        affected_flights: BTreeSet::from([
            "AZU4021".to_string(),
            "GLO1412".to_string(),
        ]),
    };

    obstacles::insert_intersections(db.pool(), &[intersection], Utc::now())
        .await
        .unwrap();

    let records = obstacles::load_obstacles(db.pool(), &key).await.unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.impact_ratio == 0.4));
    assert!(records.iter().all(|r| r.cell_radius_m == 50_000.0));
    let flights: BTreeSet<&str> = records.iter().map(|r| r.flight_id.as_str()).collect();
    assert_eq!(flights, BTreeSet::from(["AZU4021", "GLO1412"]));
}
