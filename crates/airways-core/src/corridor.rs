//! Corridor axis selection and the partition grid.
//!
//! A corridor is parameterized by whichever of longitude/latitude varies
//! more between the two endpoint airports. All downstream stages (the
//! normalizer, section builder and hazard sweep) order themselves along
//! this axis.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{PositionSample, Route};

/// Default spacing of the partition grid, in degrees.
pub const DEFAULT_PARTITION_INTERVAL_DEG: f64 = 0.25;

/// Grid coordinates are rounded to this many decimals so the generation
/// loop terminates and interpolated samples land on exact values.
const GRID_DECIMALS: i32 = 3;

/// Smallest usable partition interval. Anything finer collapses under
/// grid rounding and the generation loop would never advance.
pub const MIN_PARTITION_INTERVAL_DEG: f64 = 0.001;

#[derive(Debug, Error)]
pub enum CorridorError {
    /// Departure and destination coincide; no axis can be determined.
    #[error("degenerate route: departure and destination share the same coordinates")]
    DegenerateRoute,
    #[error("partition interval must be at least 0.001 degrees, got {0}")]
    InvalidPartitionInterval(f64),
}

/// Axis descriptor for one route, derived once per departure/destination pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corridor {
    /// Longitude varies at least as much as latitude between the endpoints.
    pub longitude_based: bool,
    /// Departure's axis coordinate is below the destination's.
    pub ascending: bool,
}

impl Corridor {
    pub fn for_route(route: &Route) -> Result<Self, CorridorError> {
        let lon_span = (route.destination.longitude - route.departure.longitude).abs();
        let lat_span = (route.destination.latitude - route.departure.latitude).abs();
        let longitude_based = lon_span >= lat_span;

        let (dep, dest) = if longitude_based {
            (route.departure.longitude, route.destination.longitude)
        } else {
            (route.departure.latitude, route.destination.latitude)
        };
        if dep == dest {
            // Both spans are zero whenever the axis span is.
            return Err(CorridorError::DegenerateRoute);
        }

        Ok(Self {
            longitude_based,
            ascending: dep < dest,
        })
    }

    /// The corridor-relevant coordinate of a point.
    pub fn axis_coord(&self, latitude: f64, longitude: f64) -> f64 {
        if self.longitude_based {
            longitude
        } else {
            latitude
        }
    }

    pub fn sample_axis_coord(&self, sample: &PositionSample) -> f64 {
        self.axis_coord(sample.latitude, sample.longitude)
    }

    /// The coordinate orthogonal to the corridor axis.
    pub fn cross_coord(&self, latitude: f64, longitude: f64) -> f64 {
        if self.longitude_based {
            latitude
        } else {
            longitude
        }
    }

    /// Whether `a` lies strictly before `b` in traversal direction.
    pub fn is_before(&self, a: f64, b: f64) -> bool {
        if self.ascending {
            a < b
        } else {
            a > b
        }
    }
}

/// Ordered axis coordinates spanning a route, spaced by a fixed partition
/// interval and listed in corridor traversal direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    points: Vec<f64>,
}

impl Grid {
    /// Build the grid for a route.
    ///
    /// Points cover [min, max] of the endpoint axis coordinates and are
    /// rounded to a fixed precision; the sequence is reversed when the
    /// corridor is descending so index order is always traversal order.
    pub fn for_route(
        route: &Route,
        corridor: Corridor,
        partition_interval_deg: f64,
    ) -> Result<Self, CorridorError> {
        if partition_interval_deg < MIN_PARTITION_INTERVAL_DEG {
            return Err(CorridorError::InvalidPartitionInterval(
                partition_interval_deg,
            ));
        }

        let dep = corridor.axis_coord(route.departure.latitude, route.departure.longitude);
        let dest = corridor.axis_coord(route.destination.latitude, route.destination.longitude);
        let (start, end) = if dep < dest { (dep, dest) } else { (dest, dep) };

        let mut points = Vec::new();
        let mut current = round_grid(start);
        while current <= end {
            points.push(current);
            current = round_grid(current + partition_interval_deg);
        }
        if !corridor.ascending {
            points.reverse();
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, index: usize) -> Option<f64> {
        self.points.get(index).copied()
    }
}

fn round_grid(value: f64) -> f64 {
    let factor = 10f64.powi(GRID_DECIMALS);
    (value * factor).round() / factor
}
