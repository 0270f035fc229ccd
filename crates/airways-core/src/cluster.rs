//! Density-based lane clustering within a Section.
//!
//! A Lane is a habitual flight path: a dense group of samples within one
//! cross-section of the corridor. Clustering follows DBSCAN semantics with
//! a closed set of distance metrics; points that cannot be reached through
//! dense neighborhoods are labeled noise and never become part of a Lane.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::models::PositionSample;
use crate::section::Section;
use crate::spatial;

/// Reserved label for samples not reachable from any dense region.
pub const NOISE_LABEL: i32 = -1;

const UNCLASSIFIED: i32 = -2;

/// Distance metric used by the density criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Great-circle distance on (lat, lon), ignoring altitude.
    GreatCircle2d,
    /// Euclidean distance on (lat, lon, altitude) in the Cartesian frame.
    Cartesian3d,
}

impl DistanceMetric {
    pub fn distance(&self, a: &PositionSample, b: &PositionSample) -> f64 {
        match self {
            DistanceMetric::GreatCircle2d => {
                spatial::haversine_distance(a.latitude, a.longitude, b.latitude, b.longitude)
            }
            DistanceMetric::Cartesian3d => spatial::cartesian_distance(
                (a.latitude, a.longitude, a.altitude_m),
                (b.latitude, b.longitude, b.altitude_m),
            ),
        }
    }
}

/// Parameters of one clustering pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterParams {
    /// Minimum neighborhood size (self included) for a point to seed a
    /// dense region.
    pub min_samples: usize,
    /// Neighborhood radius in meters.
    pub max_distance_between_samples_m: f64,
    pub metric: DistanceMetric,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            min_samples: 5,
            max_distance_between_samples_m: 5_000.0,
            metric: DistanceMetric::Cartesian3d,
        }
    }
}

/// Label assignment for one Section's samples.
///
/// `labels[i]` is the cluster id of `section.samples[i]`, or [`NOISE_LABEL`].
/// Label numbering follows discovery order, so the assignment is
/// deterministic for a fixed input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    pub labels: Vec<i32>,
    pub cluster_count: usize,
}

impl Clustering {
    /// Lanes as non-owning views over the Section's samples, in label order.
    pub fn lanes<'a>(&self, section: &'a Section) -> Vec<Lane<'a>> {
        let mut lanes: Vec<Lane<'a>> = (0..self.cluster_count)
            .map(|label| Lane {
                label: label as i32,
                members: Vec::new(),
            })
            .collect();
        for (sample, &label) in section.samples.iter().zip(&self.labels) {
            if label != NOISE_LABEL {
                lanes[label as usize].members.push(sample);
            }
        }
        lanes
    }

    /// Samples rejected as noise.
    pub fn noise<'a>(&self, section: &'a Section) -> Vec<&'a PositionSample> {
        section
            .samples
            .iter()
            .zip(&self.labels)
            .filter(|(_, &label)| label == NOISE_LABEL)
            .map(|(sample, _)| sample)
            .collect()
    }
}

/// A density cluster of samples within one Section.
#[derive(Debug, Clone)]
pub struct Lane<'a> {
    pub label: i32,
    pub members: Vec<&'a PositionSample>,
}

impl Lane<'_> {
    /// Mean member position: averaged in Cartesian space, converted back
    /// to (lat, lon, altitude).
    pub fn centroid(&self) -> Option<(f64, f64, f64)> {
        if self.members.is_empty() {
            return None;
        }
        let count = self.members.len() as f64;
        let (mut sx, mut sy, mut sz) = (0.0, 0.0, 0.0);
        for member in &self.members {
            let (x, y, z) =
                spatial::to_cartesian(member.latitude, member.longitude, member.altitude_m);
            sx += x;
            sy += y;
            sz += z;
        }
        Some(spatial::to_spherical(sx / count, sy / count, sz / count))
    }
}

/// Partition a Section's samples into density clusters.
///
/// Clustering an empty Section is a no-op, not an error.
pub fn cluster_section(section: &Section, params: &ClusterParams) -> Clustering {
    let samples = &section.samples;
    let mut labels = vec![UNCLASSIFIED; samples.len()];
    let mut cluster_count = 0usize;

    for i in 0..samples.len() {
        if labels[i] != UNCLASSIFIED {
            continue;
        }
        let neighbors = region_query(samples, i, params);
        if neighbors.len() < params.min_samples {
            labels[i] = NOISE_LABEL;
            continue;
        }

        let cluster_id = cluster_count as i32;
        cluster_count += 1;
        labels[i] = cluster_id;

        let mut queue: VecDeque<usize> = neighbors.into();
        while let Some(j) = queue.pop_front() {
            if labels[j] == NOISE_LABEL {
                // Border point: density-reachable but not a core point.
                labels[j] = cluster_id;
            }
            if labels[j] != UNCLASSIFIED {
                continue;
            }
            labels[j] = cluster_id;
            let reachable = region_query(samples, j, params);
            if reachable.len() >= params.min_samples {
                queue.extend(reachable);
            }
        }
    }

    Clustering {
        labels,
        cluster_count,
    }
}

fn region_query(samples: &[PositionSample], center: usize, params: &ClusterParams) -> Vec<usize> {
    let origin = &samples[center];
    samples
        .iter()
        .enumerate()
        .filter(|(_, candidate)| {
            params.metric.distance(origin, candidate) <= params.max_distance_between_samples_m
        })
        .map(|(index, _)| index)
        .collect()
}
