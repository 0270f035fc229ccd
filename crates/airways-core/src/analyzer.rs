//! Route analyzer: runs the full pipeline with explicit memoization.
//!
//! Normalization and section building are expensive per route, so results
//! are cached behind an explicit object instead of module-level state.
//! The intersection cache additionally has an invalidation hook the owner
//! drives from the hazard provider's has-changed signal.

use std::collections::HashMap;
use std::sync::Arc;

use crate::cluster::{cluster_section, ClusterParams, Clustering};
use crate::corridor::{Corridor, CorridorError, DEFAULT_PARTITION_INTERVAL_DEG};
use crate::models::{FlightTrack, HazardCell, Intersection, Route, RouteKey};
use crate::normalizer::normalize_route;
use crate::section::{build_sections, Section, DEFAULT_MIN_ENTRIES_PER_SECTION};
use crate::sweep::{sort_cells_along_corridor, sweep_route};

/// Parameters of one analyzer instance.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerParams {
    pub partition_interval_deg: f64,
    pub min_entries_per_section: usize,
    pub cluster: ClusterParams,
}

impl Default for AnalyzerParams {
    fn default() -> Self {
        Self {
            partition_interval_deg: DEFAULT_PARTITION_INTERVAL_DEG,
            min_entries_per_section: DEFAULT_MIN_ENTRIES_PER_SECTION,
            cluster: ClusterParams::default(),
        }
    }
}

/// Sections computed for one route, plus the flights the normalizer had to
/// truncate (grid exhausted before the track ended).
#[derive(Debug, Clone)]
pub struct SectionSet {
    pub corridor: Corridor,
    pub sections: Vec<Section>,
    pub truncated_flights: Vec<String>,
}

/// Pipeline front-end owning the per-route caches.
#[derive(Debug, Default)]
pub struct Analyzer {
    params: AnalyzerParams,
    section_cache: HashMap<(RouteKey, usize), Arc<SectionSet>>,
    intersection_cache: HashMap<RouteKey, Arc<Vec<Intersection>>>,
}

impl Analyzer {
    pub fn new(params: AnalyzerParams) -> Self {
        Self {
            params,
            section_cache: HashMap::new(),
            intersection_cache: HashMap::new(),
        }
    }

    pub fn params(&self) -> &AnalyzerParams {
        &self.params
    }

    /// Sections for a route, computed once per (route, threshold) key.
    pub fn sections_for(
        &mut self,
        route: &Route,
        tracks: &[FlightTrack],
    ) -> Result<Arc<SectionSet>, CorridorError> {
        let key = (route.key(), self.params.min_entries_per_section);
        if let Some(cached) = self.section_cache.get(&key) {
            return Ok(Arc::clone(cached));
        }

        let corridor = Corridor::for_route(route)?;
        let grid = crate::corridor::Grid::for_route(route, corridor, self.params.partition_interval_deg)?;
        let normalized = normalize_route(route, tracks, self.params.partition_interval_deg)?;
        let sections = build_sections(
            &normalized.samples,
            corridor,
            &grid,
            self.params.min_entries_per_section,
        );

        let set = Arc::new(SectionSet {
            corridor,
            sections,
            truncated_flights: normalized.truncated_flights,
        });
        self.section_cache.insert(key, Arc::clone(&set));
        Ok(set)
    }

    /// Lane clusterings for a section set, in section order. Not cached;
    /// lanes are a diagnostic view recomputed on demand.
    pub fn clusterings_for(&self, sections: &[Section]) -> Vec<Clustering> {
        sections
            .iter()
            .map(|section| cluster_section(section, &self.params.cluster))
            .collect()
    }

    /// Merged intersections for a route against a bbox-filtered cell set,
    /// computed once per route key until invalidated.
    pub fn intersections_for(
        &mut self,
        route: &Route,
        tracks: &[FlightTrack],
        cells: &[HazardCell],
    ) -> Result<Arc<Vec<Intersection>>, CorridorError> {
        let key = route.key();
        if let Some(cached) = self.intersection_cache.get(&key) {
            return Ok(Arc::clone(cached));
        }

        let section_set = self.sections_for(route, tracks)?;
        let mut ordered_cells = cells.to_vec();
        sort_cells_along_corridor(&mut ordered_cells, section_set.corridor);

        let intersections = Arc::new(sweep_route(
            &key,
            section_set.corridor,
            &section_set.sections,
            &ordered_cells,
        ));
        self.intersection_cache.insert(key, Arc::clone(&intersections));
        Ok(intersections)
    }

    /// Drop every cached intersection result. Called whenever the hazard
    /// provider reports a changed cell set; sections survive because they
    /// do not depend on weather.
    pub fn invalidate_intersections(&mut self) {
        self.intersection_cache.clear();
    }

    /// Drop all cached state, sections included.
    pub fn clear(&mut self) {
        self.section_cache.clear();
        self.intersection_cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::DistanceMetric;
    use crate::models::{Airport, PositionSample};
    use chrono::{TimeZone, Utc};

    fn route() -> Route {
        Route::new(
            Airport::new("AAAA", "Departure", -23.0, -47.0),
            Airport::new("BBBB", "Destination", -23.0, -43.0),
        )
    }

    fn tracks(flight_count: usize) -> Vec<FlightTrack> {
        (0..flight_count)
            .map(|i| {
                let flight_id = format!("FL{i:03}");
                let samples = vec![
                    PositionSample {
                        flight_id: flight_id.clone(),
                        latitude: -23.0,
                        longitude: -46.9,
                        altitude_m: 10_000.0,
                        speed_mps: 220.0,
                        timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
                    },
                    PositionSample {
                        flight_id: flight_id.clone(),
                        latitude: -23.0,
                        longitude: -44.9,
                        altitude_m: 10_000.0,
                        speed_mps: 220.0,
                        timestamp: Utc.timestamp_opt(1_700_000_600, 0).unwrap(),
                    },
                ];
                FlightTrack::new(flight_id, samples)
            })
            .collect()
    }

    fn analyzer() -> Analyzer {
        Analyzer::new(AnalyzerParams {
            partition_interval_deg: 0.5,
            min_entries_per_section: 3,
            cluster: ClusterParams {
                min_samples: 3,
                max_distance_between_samples_m: 2_000.0,
                metric: DistanceMetric::GreatCircle2d,
            },
        })
    }

    #[test]
    fn pipeline_produces_sections_and_intersections() {
        let mut analyzer = analyzer();
        let route = route();
        let tracks = tracks(4);

        let sections = analyzer.sections_for(&route, &tracks).unwrap();
        assert!(!sections.sections.is_empty());
        assert!(sections.truncated_flights.is_empty());
        for section in &sections.sections {
            assert_eq!(section.len(), 4);
        }

        let clusterings = analyzer.clusterings_for(&sections.sections);
        assert_eq!(clusterings.len(), sections.sections.len());
        assert!(clusterings.iter().all(|c| c.cluster_count == 1));

        let cells = vec![HazardCell::new(
            -23.0,
            -46.0,
            25_000.0,
            Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        )];
        let intersections = analyzer.intersections_for(&route, &tracks, &cells).unwrap();
        assert_eq!(intersections.len(), 1);
        assert!((intersections[0].impact_ratio - 1.0).abs() < 1e-12);
    }

    #[test]
    fn section_results_are_memoized() {
        let mut analyzer = analyzer();
        let route = route();
        let tracks = tracks(4);

        let first = analyzer.sections_for(&route, &tracks).unwrap();
        // Different tracks, same key: the cache answers.
        let second = analyzer.sections_for(&route, &[]).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn invalidation_drops_intersections_but_keeps_sections() {
        let mut analyzer = analyzer();
        let route = route();
        let tracks = tracks(4);
        let cells = vec![HazardCell::new(
            -23.0,
            -46.0,
            25_000.0,
            Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        )];

        let sections_before = analyzer.sections_for(&route, &tracks).unwrap();
        let first = analyzer.intersections_for(&route, &tracks, &cells).unwrap();
        analyzer.invalidate_intersections();

        let second = analyzer.intersections_for(&route, &tracks, &cells).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);

        let sections_after = analyzer.sections_for(&route, &tracks).unwrap();
        assert!(Arc::ptr_eq(&sections_before, &sections_after));
    }

    #[test]
    fn degenerate_route_propagates() {
        let mut analyzer = analyzer();
        let bad = Route::new(
            Airport::new("AAAA", "Departure", -23.0, -47.0),
            Airport::new("AAAA", "Departure", -23.0, -47.0),
        );
        assert!(analyzer.sections_for(&bad, &[]).is_err());
    }
}
