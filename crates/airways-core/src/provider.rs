//! Interfaces to the external collaborators the core reads.
//!
//! Route reference data and raw trajectories are handed to the pipeline as
//! plain values; the hazard-cell provider is the one piece of mutable
//! shared state, so it gets a trait with an explicit change signal.

use crate::models::{BoundingBox, HazardCell};

/// Read-only view of the currently known convective cells.
///
/// Implementations refresh themselves on their own schedule (typically a
/// TTL-driven poll); consumers observe updates through [`take_changed`]
/// and must invalidate any intersection caches when it reports true.
///
/// [`take_changed`]: HazardCellSource::take_changed
pub trait HazardCellSource {
    /// All currently known cells.
    fn cells(&self) -> Vec<HazardCell>;

    /// Cells whose center lies inside the bounding box.
    fn cells_within(&self, bbox: &BoundingBox) -> Vec<HazardCell> {
        self.cells()
            .into_iter()
            .filter(|cell| bbox.contains(cell.latitude, cell.longitude))
            .collect()
    }

    /// Atomically read and reset the has-changed flag. Returns true when
    /// the cell set changed since the last call; the reset must be atomic
    /// with the read so an update is never lost between observation and
    /// cache invalidation.
    fn take_changed(&self) -> bool;
}
