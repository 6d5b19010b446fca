//! Dangling track ends that stop short of nearby track
//!
//! A dangling end is the first or last node of a `railway = rail` way that no
//! other way touches and that no buffer stop accounts for. Each dangling end
//! probes a narrow triangle ahead of itself; another dangling end inside that
//! triangle whose track runs the same direction means the two were meant to
//! join. Ends are examined in way document order, start before end, so output
//! order is reproducible.

use std::f64::consts::PI;

use geo::{Coord, Point, Triangle};
use hashbrown::HashMap;
use log::debug;
use rstar::{AABB, RTree, primitives::GeomWithData};

use crate::{
    findings::{Finding, FindingKind},
    geometry,
    model::{NodeId, RailWay, RailwayData, SignalDirection},
};

/// Probe reach along the track heading, in kilometers
const PROBE_FORWARD_KM: f64 = 0.1;
/// Probe half-width at full reach, in kilometers
const PROBE_SIDE_KM: f64 = 0.05;

/// Candidate headings diverging by an angle inside this open band do not
/// count as a missed join
const ALIGN_MIN: f64 = PI / 6.0;
const ALIGN_MAX: f64 = 11.0 * PI / 6.0;

/// A way endpoint no other way touches
struct DanglingEnd {
    node: NodeId,
    /// Way node next to the endpoint, fixing the track heading
    adjacent: NodeId,
    /// Index of the owning way in [`RailwayData::ways`]
    way: usize,
}

/// Finds dangling ends that point at other dangling ends without meeting them
pub fn detect_disconnected_ends(data: &RailwayData) -> Vec<Finding> {
    let ends = collect_dangling_ends(data);
    if ends.is_empty() {
        return Vec::new();
    }

    let index = RTree::bulk_load(
        ends.iter()
            .enumerate()
            .filter_map(|(i, end)| {
                let node = data.nodes.get(&end.node)?;
                Some(GeomWithData::new([node.geometry.x(), node.geometry.y()], i))
            })
            .collect(),
    );

    let mut findings = Vec::new();
    for end in &ends {
        let Some(end_node) = data.nodes.get(&end.node) else {
            continue;
        };
        let Some(adjacent) = data.nodes.get(&end.adjacent) else {
            continue;
        };

        let span_km = geometry::distance_km(adjacent.geometry, end_node.geometry);
        if span_km == 0.0 {
            debug!(
                "Skipping dangling end {}: zero-length final segment",
                end.node
            );
            continue;
        }
        let heading = geometry::vector(adjacent.geometry, end_node.geometry);
        let probe = probe_triangle(end_node.geometry, heading, span_km);
        let envelope = triangle_envelope(&probe);

        let missed_join = index.locate_in_envelope(&envelope).any(|entry| {
            let candidate = &ends[entry.data];
            if ways_share_node(&data.ways[end.way], &data.ways[candidate.way]) {
                return false;
            }
            let Some(candidate_node) = data.nodes.get(&candidate.node) else {
                return false;
            };
            if !geometry::point_in_triangle(candidate_node.geometry, &probe) {
                return false;
            }
            let Some(candidate_adjacent) = data.nodes.get(&candidate.adjacent) else {
                return false;
            };
            let toward = geometry::vector(candidate_node.geometry, candidate_adjacent.geometry);
            if geometry::magnitude(toward) == 0.0 {
                debug!(
                    "Skipping candidate end {}: zero-length final segment",
                    candidate.node
                );
                return false;
            }
            let divergence = geometry::angle_between(heading, toward);
            !(divergence > ALIGN_MIN && divergence < ALIGN_MAX)
        });

        if missed_join {
            findings.push(Finding::for_node(FindingKind::DisconnectedTrack, end_node));
        }
    }
    findings
}

/// Counts every appearance of a node across every way, including repeats
/// within one way
fn node_usage(data: &RailwayData) -> HashMap<NodeId, usize> {
    let mut usage = HashMap::new();
    for way in &data.ways {
        for node in &way.nodes {
            *usage.entry(*node).or_insert(0) += 1;
        }
    }
    usage
}

/// Collects endpoints of rail ways that appear nowhere else in the data
///
/// A buffer stop anywhere on the way accounts for the end it faces: a
/// `forward` stop covers the way's last node, a `backward` stop its first,
/// and a stop without a direction covers both. Usage counts span all ways,
/// so an endpoint another way merely passes through is already connected.
fn collect_dangling_ends(data: &RailwayData) -> Vec<DanglingEnd> {
    let usage = node_usage(data);
    let mut ends = Vec::new();

    for (way_index, way) in data.ways.iter().enumerate() {
        if !way.is_rail() || way.nodes.len() < 2 {
            continue;
        }

        let stops: Vec<_> = way
            .nodes
            .iter()
            .filter_map(|id| data.nodes.get(id))
            .filter(|node| node.is_buffer_stop())
            .collect();
        let undirected = stops.iter().any(|stop| stop.direction.is_none());
        let stopped_backward = undirected
            || stops
                .iter()
                .any(|stop| stop.direction == Some(SignalDirection::Backward));
        let stopped_forward = undirected
            || stops
                .iter()
                .any(|stop| stop.direction == Some(SignalDirection::Forward));

        let start = way.nodes[0];
        if !stopped_backward && usage.get(&start).copied().unwrap_or(0) == 1 {
            ends.push(DanglingEnd {
                node: start,
                adjacent: way.nodes[1],
                way: way_index,
            });
        }

        let end = way.nodes[way.nodes.len() - 1];
        if !stopped_forward && usage.get(&end).copied().unwrap_or(0) == 1 {
            ends.push(DanglingEnd {
                node: end,
                adjacent: way.nodes[way.nodes.len() - 2],
                way: way_index,
            });
        }
    }
    ends
}

fn ways_share_node(a: &RailWay, b: &RailWay) -> bool {
    a.nodes.iter().any(|node| b.nodes.contains(node))
}

/// Triangle from the end node along the heading: tip at the end, widening to
/// the probe half-width at full reach
fn probe_triangle(tip: Point<f64>, heading: Coord<f64>, span_km: f64) -> Triangle<f64> {
    let forward = heading * (PROBE_FORWARD_KM / span_km);
    let side = geometry::perpendicular(heading) * (PROBE_SIDE_KM / span_km);
    Triangle::new(tip.0, tip.0 + forward + side, tip.0 + forward - side)
}

fn triangle_envelope(triangle: &Triangle<f64>) -> AABB<[f64; 2]> {
    let corners = triangle.to_array();
    let min_x = corners.iter().map(|c| c.x).fold(f64::INFINITY, f64::min);
    let max_x = corners.iter().map(|c| c.x).fold(f64::NEG_INFINITY, f64::max);
    let min_y = corners.iter().map(|c| c.y).fold(f64::INFINITY, f64::min);
    let max_y = corners.iter().map(|c| c.y).fold(f64::NEG_INFINITY, f64::max);
    AABB::from_corners([min_x, min_y], [max_x, max_y])
}
