//! Corridor normalization: align raw position reports to the partition grid.
//!
//! Raw reports arrive at irregular axis coordinates; every downstream stage
//! wants samples that sit exactly on grid points. The normalizer walks each
//! flight's reports in time order with a single monotonic grid cursor and
//! emits one interpolated sample per grid point crossed.

use chrono::{DateTime, Utc};

use crate::corridor::{Corridor, CorridorError, Grid};
use crate::models::{FlightTrack, PositionSample, Route};

/// A synthetic sample aligned to one grid point.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSample {
    /// Index into the route grid, in traversal order.
    pub grid_index: usize,
    pub sample: PositionSample,
}

/// Result of normalizing one flight's track.
#[derive(Debug, Clone, Default)]
pub struct NormalizedTrack {
    pub samples: Vec<GridSample>,
    /// The grid ran out before the sample stream did; the remainder of the
    /// flight was not normalized. Recoverable by design.
    pub truncated: bool,
}

/// Merged, traversal-ordered normalized stream for a whole route.
#[derive(Debug, Clone, Default)]
pub struct NormalizedRoute {
    pub samples: Vec<GridSample>,
    /// Flight ids whose tracks were truncated by grid exhaustion.
    pub truncated_flights: Vec<String>,
}

/// Normalize one flight's raw samples against a route grid.
///
/// Samples are sorted by timestamp, then consecutive pairs are swept with
/// a grid cursor: points already passed by the pair's first sample are
/// skipped, and every grid point inside the closed interval spanned by the
/// pair is emitted as an interpolated sample. Fewer than two raw samples
/// yield an empty result.
pub fn normalize_track(track: &FlightTrack, corridor: Corridor, grid: &Grid) -> NormalizedTrack {
    let mut out = NormalizedTrack::default();
    if track.samples.len() < 2 || grid.is_empty() {
        return out;
    }

    let mut ordered: Vec<&PositionSample> = track.samples.iter().collect();
    ordered.sort_by_key(|s| s.timestamp);

    let mut cursor = 0usize;
    'pairs: for pair in ordered.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        let prev_axis = corridor.sample_axis_coord(prev);
        let curr_axis = corridor.sample_axis_coord(curr);

        // Skip grid points the flight has already passed.
        loop {
            match grid.point(cursor) {
                Some(point) if corridor.is_before(point, prev_axis) => cursor += 1,
                Some(_) => break,
                None => {
                    out.truncated = true;
                    break 'pairs;
                }
            }
        }

        if prev_axis == curr_axis {
            // No axis progress; interpolation would divide by zero.
            continue;
        }

        let (lo, hi) = if prev_axis < curr_axis {
            (prev_axis, curr_axis)
        } else {
            (curr_axis, prev_axis)
        };

        while let Some(point) = grid.point(cursor) {
            if point < lo || point > hi {
                break;
            }
            out.samples.push(GridSample {
                grid_index: cursor,
                sample: interpolate(point, prev, curr, corridor),
            });
            cursor += 1;
        }
    }

    out
}

/// Normalize every track of a route and merge the results into one stream
/// sorted by grid index (corridor traversal order). The sort is stable, so
/// samples sharing a grid point keep their per-flight order.
pub fn normalize_route(
    route: &Route,
    tracks: &[FlightTrack],
    partition_interval_deg: f64,
) -> Result<NormalizedRoute, CorridorError> {
    let corridor = Corridor::for_route(route)?;
    let grid = Grid::for_route(route, corridor, partition_interval_deg)?;

    let mut out = NormalizedRoute::default();
    for track in tracks {
        let normalized = normalize_track(track, corridor, &grid);
        if normalized.truncated {
            out.truncated_flights.push(track.flight_id.clone());
        }
        out.samples.extend(normalized.samples);
    }
    out.samples.sort_by_key(|s| s.grid_index);
    Ok(out)
}

fn interpolate(
    grid_point: f64,
    prev: &PositionSample,
    curr: &PositionSample,
    corridor: Corridor,
) -> PositionSample {
    let start = corridor.sample_axis_coord(prev);
    let end = corridor.sample_axis_coord(curr);
    // Callers guarantee start != end.
    let alpha = (grid_point - start) / (end - start);

    // A sample already sitting on the grid point is reproduced bit-exactly;
    // renormalizing a normalized stream must be the identity.
    if alpha == 0.0 {
        return prev.clone();
    }
    if alpha == 1.0 {
        return curr.clone();
    }

    let cross = lerp(
        alpha,
        corridor.cross_coord(prev.latitude, prev.longitude),
        corridor.cross_coord(curr.latitude, curr.longitude),
    );
    let (latitude, longitude) = if corridor.longitude_based {
        (cross, grid_point)
    } else {
        (grid_point, cross)
    };

    PositionSample {
        flight_id: prev.flight_id.clone(),
        latitude,
        longitude,
        altitude_m: lerp(alpha, prev.altitude_m, curr.altitude_m),
        speed_mps: lerp(alpha, prev.speed_mps, curr.speed_mps),
        timestamp: lerp_timestamp(alpha, prev.timestamp, curr.timestamp),
    }
}

fn lerp(alpha: f64, start: f64, end: f64) -> f64 {
    start + alpha * (end - start)
}

fn lerp_timestamp(alpha: f64, start: DateTime<Utc>, end: DateTime<Utc>) -> DateTime<Utc> {
    let start_ms = start.timestamp_millis() as f64;
    let end_ms = end.timestamp_millis() as f64;
    let mid_ms = lerp(alpha, start_ms, end_ms).round() as i64;
    DateTime::<Utc>::from_timestamp_millis(mid_ms).unwrap_or(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Airport;
    use chrono::TimeZone;

    fn test_route() -> Route {
        // Longitude-based, ascending corridor from -47.0 to -43.0.
        Route::new(
            Airport::new("AAAA", "Departure", -23.0, -47.0),
            Airport::new("BBBB", "Destination", -22.0, -43.0),
        )
    }

    fn sample(flight_id: &str, lat: f64, lon: f64, alt: f64, speed: f64, secs: i64) -> PositionSample {
        PositionSample {
            flight_id: flight_id.to_string(),
            latitude: lat,
            longitude: lon,
            altitude_m: alt,
            speed_mps: speed,
            timestamp: Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap(),
        }
    }

    fn setup(interval: f64) -> (Route, Corridor, Grid) {
        let route = test_route();
        let corridor = Corridor::for_route(&route).unwrap();
        let grid = Grid::for_route(&route, corridor, interval).unwrap();
        (route, corridor, grid)
    }

    #[test]
    fn all_outputs_land_on_grid_points() {
        let (_, corridor, grid) = setup(0.5);
        let track = FlightTrack::new(
            "TAM3001",
            vec![
                sample("TAM3001", -23.0, -46.8, 9_000.0, 210.0, 0),
                sample("TAM3001", -22.8, -45.9, 10_000.0, 230.0, 120),
                sample("TAM3001", -22.5, -44.7, 11_000.0, 240.0, 300),
            ],
        );

        let normalized = normalize_track(&track, corridor, &grid);
        assert!(!normalized.samples.is_empty());
        assert!(!normalized.truncated);
        for gs in &normalized.samples {
            let point = grid.point(gs.grid_index).unwrap();
            assert_eq!(corridor.sample_axis_coord(&gs.sample), point);
        }
    }

    #[test]
    fn emits_every_grid_point_between_sparse_samples() {
        let (_, corridor, grid) = setup(0.5);
        // One pair spanning four grid points.
        let track = FlightTrack::new(
            "GLO1412",
            vec![
                sample("GLO1412", -23.0, -46.9, 9_000.0, 200.0, 0),
                sample("GLO1412", -22.4, -44.9, 11_000.0, 250.0, 600),
            ],
        );

        let normalized = normalize_track(&track, corridor, &grid);
        let points: Vec<f64> = normalized
            .samples
            .iter()
            .map(|gs| grid.point(gs.grid_index).unwrap())
            .collect();
        assert_eq!(points, vec![-46.5, -46.0, -45.5, -45.0]);
    }

    #[test]
    fn interpolated_cross_axis_stays_within_bracketing_values() {
        let (_, corridor, grid) = setup(0.5);
        let raw = vec![
            sample("AZU4521", -23.0, -46.9, 9_000.0, 200.0, 0),
            sample("AZU4521", -22.4, -44.9, 11_000.0, 250.0, 600),
        ];
        let track = FlightTrack::new("AZU4521", raw.clone());

        let normalized = normalize_track(&track, corridor, &grid);
        let (lo, hi) = (raw[1].latitude.min(raw[0].latitude), raw[1].latitude.max(raw[0].latitude));
        for gs in &normalized.samples {
            assert!(gs.sample.latitude >= lo && gs.sample.latitude <= hi);
            assert!(gs.sample.altitude_m >= 9_000.0 && gs.sample.altitude_m <= 11_000.0);
            assert!(gs.sample.timestamp >= raw[0].timestamp);
            assert!(gs.sample.timestamp <= raw[1].timestamp);
        }
    }

    #[test]
    fn renormalizing_normalized_stream_is_identity() {
        let (_, corridor, grid) = setup(0.5);
        let track = FlightTrack::new(
            "TAM3001",
            vec![
                sample("TAM3001", -23.0, -46.8, 9_000.0, 210.0, 0),
                sample("TAM3001", -22.8, -45.9, 10_000.0, 230.0, 120),
                sample("TAM3001", -22.5, -44.7, 11_000.0, 300.0, 300),
            ],
        );

        let first = normalize_track(&track, corridor, &grid);
        let again = FlightTrack::new(
            "TAM3001",
            first.samples.iter().map(|gs| gs.sample.clone()).collect(),
        );
        let second = normalize_track(&again, corridor, &grid);
        assert_eq!(first.samples, second.samples);
    }

    #[test]
    fn fewer_than_two_samples_yield_empty_output() {
        let (_, corridor, grid) = setup(0.5);
        let track = FlightTrack::new("ONE", vec![sample("ONE", -23.0, -46.8, 9_000.0, 210.0, 0)]);
        let normalized = normalize_track(&track, corridor, &grid);
        assert!(normalized.samples.is_empty());
        assert!(!normalized.truncated);
    }

    #[test]
    fn grid_exhaustion_truncates_without_error() {
        let (_, corridor, grid) = setup(0.5);
        // Track entirely past the destination end of the grid.
        let track = FlightTrack::new(
            "PAST",
            vec![
                sample("PAST", -22.0, -42.0, 9_000.0, 210.0, 0),
                sample("PAST", -21.9, -41.0, 9_000.0, 210.0, 60),
            ],
        );
        let normalized = normalize_track(&track, corridor, &grid);
        assert!(normalized.samples.is_empty());
        assert!(normalized.truncated);
    }

    #[test]
    fn route_stream_is_sorted_by_grid_index() {
        let route = test_route();
        let tracks = vec![
            FlightTrack::new(
                "AAA111",
                vec![
                    sample("AAA111", -23.0, -46.9, 9_000.0, 200.0, 0),
                    sample("AAA111", -22.4, -44.9, 11_000.0, 250.0, 600),
                ],
            ),
            FlightTrack::new(
                "BBB222",
                vec![
                    sample("BBB222", -23.0, -46.7, 9_500.0, 205.0, 0),
                    sample("BBB222", -22.4, -44.2, 11_000.0, 250.0, 600),
                ],
            ),
        ];

        let normalized = normalize_route(&route, &tracks, 0.5).unwrap();
        assert!(normalized.truncated_flights.is_empty());
        for pair in normalized.samples.windows(2) {
            assert!(pair[0].grid_index <= pair[1].grid_index);
        }
    }
}
