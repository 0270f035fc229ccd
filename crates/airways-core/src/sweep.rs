//! Hazard intersection sweep: match corridor Sections against convective
//! cells and measure how much of the flown traffic each cell touches.
//!
//! Both inputs are sorted along the corridor axis, so a single two-pointer
//! pass finds every (Section, cell) pair worth testing.

use std::collections::BTreeSet;

use crate::corridor::Corridor;
use crate::models::{HazardCell, Intersection, RouteKey};
use crate::section::Section;
use crate::spatial;

/// Sort cells by their corridor-axis coordinate, in traversal order.
///
/// The hazard provider only filters by bounding box; the ordering the
/// sweep relies on is owned here.
pub fn sort_cells_along_corridor(cells: &mut [HazardCell], corridor: Corridor) {
    cells.sort_by(|a, b| {
        let ka = corridor.axis_coord(a.latitude, a.longitude);
        let kb = corridor.axis_coord(b.latitude, b.longitude);
        if corridor.ascending {
            ka.total_cmp(&kb)
        } else {
            kb.total_cmp(&ka)
        }
    });
}

/// Sweep a route's Sections against its nearby hazard cells.
///
/// Advance policy: after a recorded hit the *Section* cursor advances and
/// the same cell is re-tested against the next Section; the cell cursor
/// moves only once the current Section is strictly past the cell. On a
/// miss, whichever cursor lags along the traversal direction advances.
/// Duplicate hits on one cell are merged into a single Intersection.
pub fn sweep_route(
    route: &RouteKey,
    corridor: Corridor,
    sections: &[Section],
    cells: &[HazardCell],
) -> Vec<Intersection> {
    let mut raw = Vec::new();
    let mut si = 0usize;
    let mut ci = 0usize;

    while si < sections.len() && ci < cells.len() {
        let section = &sections[si];
        let cell = &cells[ci];

        if section_cell_distance(section, cell) < cell.radius_m {
            if let Some((impact_ratio, affected_flights)) = measure_impact(section, cell) {
                raw.push(Intersection {
                    cell: cell.clone(),
                    route: route.clone(),
                    impact_ratio,
                    affected_flights,
                });
            }
            si += 1;
        } else {
            let cell_axis = corridor.axis_coord(cell.latitude, cell.longitude);
            if corridor.is_before(section.axis_coord, cell_axis) {
                si += 1;
            } else {
                ci += 1;
            }
        }
    }

    merge_by_cell(raw)
}

/// Minimum great-circle distance from a Section's samples to a cell center.
pub fn section_cell_distance(section: &Section, cell: &HazardCell) -> f64 {
    section
        .samples
        .iter()
        .map(|sample| {
            spatial::haversine_distance(
                sample.latitude,
                sample.longitude,
                cell.latitude,
                cell.longitude,
            )
        })
        .fold(f64::INFINITY, f64::min)
}

/// Impact of a cell on one Section: the fraction of distinct flights with
/// a sample inside the cell radius.
///
/// Returns `None` when the Section has no flights (guards the division) or
/// when no flight is actually inside the radius; a candidate with a zero
/// numerator is never recorded.
fn measure_impact(section: &Section, cell: &HazardCell) -> Option<(f64, BTreeSet<String>)> {
    let mut all_flights: BTreeSet<&str> = BTreeSet::new();
    let mut affected: BTreeSet<String> = BTreeSet::new();

    for sample in &section.samples {
        all_flights.insert(sample.flight_id.as_str());
        let distance = spatial::haversine_distance(
            sample.latitude,
            sample.longitude,
            cell.latitude,
            cell.longitude,
        );
        if distance < cell.radius_m {
            affected.insert(sample.flight_id.clone());
        }
    }

    if all_flights.is_empty() || affected.is_empty() {
        return None;
    }
    let ratio = affected.len() as f64 / all_flights.len() as f64;
    Some((ratio, affected))
}

/// Collapse duplicate hits on the same physical cell into one Intersection:
/// affected-flight sets union, impact ratio is the worst section's ratio.
fn merge_by_cell(raw: Vec<Intersection>) -> Vec<Intersection> {
    let mut merged: Vec<Intersection> = Vec::new();
    for intersection in raw {
        match merged.iter_mut().find(|m| m.cell == intersection.cell) {
            Some(existing) => {
                existing.impact_ratio = existing.impact_ratio.max(intersection.impact_ratio);
                existing.affected_flights.extend(intersection.affected_flights);
            }
            None => merged.push(intersection),
        }
    }
    merged
}
