//! Cross-sections of a corridor: groups of normalized samples sharing one
//! grid point.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::corridor::{Corridor, Grid};
use crate::normalizer::GridSample;
use crate::models::PositionSample;

/// Minimum samples a run must contain before it becomes a Section.
pub const DEFAULT_MIN_ENTRIES_PER_SECTION: usize = 10;

/// All samples normalized to one grid coordinate of a route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub grid_index: usize,
    pub axis_coord: f64,
    pub longitude_based: bool,
    pub samples: Vec<PositionSample>,
}

impl Section {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Distinct flights represented in this section.
    pub fn flight_ids(&self) -> BTreeSet<&str> {
        self.samples.iter().map(|s| s.flight_id.as_str()).collect()
    }
}

/// Partition a grid-index-sorted sample stream into Sections.
///
/// Consecutive samples with the same grid index form a run; a run becomes
/// a Section only when it has at least `min_entries_per_section` samples.
/// Undersized runs are discarded outright; merging them into a neighbour
/// would bias cluster density downward.
pub fn build_sections(
    samples: &[GridSample],
    corridor: Corridor,
    grid: &Grid,
    min_entries_per_section: usize,
) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut run: Vec<PositionSample> = Vec::new();
    let mut run_index: Option<usize> = None;

    let mut flush = |run: &mut Vec<PositionSample>, index: Option<usize>, out: &mut Vec<Section>| {
        let Some(grid_index) = index else {
            return;
        };
        if run.len() >= min_entries_per_section {
            let Some(axis_coord) = grid.point(grid_index) else {
                return;
            };
            out.push(Section {
                grid_index,
                axis_coord,
                longitude_based: corridor.longitude_based,
                samples: std::mem::take(run),
            });
        } else {
            run.clear();
        }
    };

    for gs in samples {
        if run_index != Some(gs.grid_index) {
            flush(&mut run, run_index, &mut sections);
            run_index = Some(gs.grid_index);
        }
        run.push(gs.sample.clone());
    }
    flush(&mut run, run_index, &mut sections);

    sections
}
