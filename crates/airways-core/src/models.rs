//! Core data models for the airways corridor pipeline.

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference data for one airport.
///
/// Identity is the ICAO code; coordinates are decimal degrees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airport {
    pub icao_code: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Field elevation, if known
    pub altitude_m: Option<f64>,
}

impl Airport {
    pub fn new(
        icao_code: impl Into<String>,
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            icao_code: icao_code.into(),
            name: name.into(),
            latitude,
            longitude,
            altitude_m: None,
        }
    }

    pub fn with_altitude_m(mut self, altitude_m: f64) -> Self {
        self.altitude_m = Some(altitude_m);
        self
    }
}

impl PartialEq for Airport {
    fn eq(&self, other: &Self) -> bool {
        self.icao_code == other.icao_code
    }
}

impl Eq for Airport {}

impl Hash for Airport {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.icao_code.hash(state);
    }
}

/// A departure → destination corridor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub departure: Airport,
    pub destination: Airport,
}

impl Route {
    pub fn new(departure: Airport, destination: Airport) -> Self {
        Self {
            departure,
            destination,
        }
    }

    pub fn key(&self) -> RouteKey {
        RouteKey {
            departure: self.departure.icao_code.clone(),
            destination: self.destination.icao_code.clone(),
        }
    }

    /// Bounding box spanned by the two endpoint airports.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            min_latitude: self.departure.latitude.min(self.destination.latitude),
            max_latitude: self.departure.latitude.max(self.destination.latitude),
            min_longitude: self.departure.longitude.min(self.destination.longitude),
            max_longitude: self.departure.longitude.max(self.destination.longitude),
        }
    }
}

/// Cache/map key for a route: the pair of ICAO codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RouteKey {
    pub departure: String,
    pub destination: String,
}

impl std::fmt::Display for RouteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}->{}", self.departure, self.destination)
    }
}

/// Geographic bounding box in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&latitude)
            && (self.min_longitude..=self.max_longitude).contains(&longitude)
    }
}

/// One aircraft position report.
///
/// Produced either by raw ingestion or by grid interpolation; immutable
/// once normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub flight_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_m: f64,
    pub speed_mps: f64,
    pub timestamp: DateTime<Utc>,
}

/// All raw samples recorded for one flight along a route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightTrack {
    pub flight_id: String,
    pub samples: Vec<PositionSample>,
}

impl FlightTrack {
    pub fn new(flight_id: impl Into<String>, samples: Vec<PositionSample>) -> Self {
        Self {
            flight_id: flight_id.into(),
            samples,
        }
    }
}

/// Snapshot of a circular convective weather hazard.
///
/// Two observations of the same physical cell compare equal: identity is
/// (latitude, longitude, radius), never the observation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardCell {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: f64,
    pub observed_at: DateTime<Utc>,
}

impl HazardCell {
    pub fn new(latitude: f64, longitude: f64, radius_m: f64, observed_at: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            radius_m,
            observed_at,
        }
    }
}

impl PartialEq for HazardCell {
    fn eq(&self, other: &Self) -> bool {
        self.latitude == other.latitude
            && self.longitude == other.longitude
            && self.radius_m == other.radius_m
    }
}

impl Eq for HazardCell {}

impl Hash for HazardCell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.latitude.to_bits().hash(state);
        self.longitude.to_bits().hash(state);
        self.radius_m.to_bits().hash(state);
    }
}

/// A hazard cell intersecting the flown corridor of one route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    pub cell: HazardCell,
    pub route: RouteKey,
    /// Fraction of distinct flights in the matched section flying inside
    /// the cell radius; always in (0, 1].
    pub impact_ratio: f64,
    pub affected_flights: BTreeSet<String>,
}
