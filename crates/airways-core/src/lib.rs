//! Corridor normalization, lane clustering and convective-hazard
//! intersection detection for departure→destination airways.

pub mod analyzer;
pub mod cluster;
pub mod corridor;
pub mod models;
pub mod normalizer;
pub mod provider;
pub mod section;
pub mod spatial;
pub mod sweep;

pub use analyzer::{Analyzer, AnalyzerParams, SectionSet};
pub use cluster::{
    cluster_section, ClusterParams, Clustering, DistanceMetric, Lane, NOISE_LABEL,
};
pub use corridor::{
    Corridor, CorridorError, Grid, DEFAULT_PARTITION_INTERVAL_DEG, MIN_PARTITION_INTERVAL_DEG,
};
pub use models::{
    Airport, BoundingBox, FlightTrack, HazardCell, Intersection, PositionSample, Route, RouteKey,
};
pub use normalizer::{normalize_route, normalize_track, GridSample, NormalizedRoute, NormalizedTrack};
pub use provider::HazardCellSource;
pub use section::{build_sections, Section, DEFAULT_MIN_ENTRIES_PER_SECTION};
pub use spatial::haversine_distance;
pub use sweep::{sort_cells_along_corridor, sweep_route};
