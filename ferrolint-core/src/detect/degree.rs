//! Per-node degree and bearing classification
//!
//! Bearing differences are compared as plain absolute values, without
//! normalizing for the 0/360 wraparound. Every band used here is symmetric
//! under `d -> 360 - d`, so the raw difference classifies exactly like the
//! circular one and the seam needs no special casing.

use itertools::Itertools;
use rayon::prelude::*;

use crate::{
    findings::{Finding, FindingKind},
    geometry,
    model::{NodeId, RailNetwork, RailNode},
};

/// Tag value that legitimizes a four-way vertex
const CROSSING: &str = "railway_crossing";
/// Tag value that legitimizes a node with more than four edges
const TURNTABLE: &str = "turntable";

/// Bearing pairs with an absolute difference strictly inside this band form
/// a straight through-route
const OPPOSITE_MIN: f64 = 175.0;
const OPPOSITE_MAX: f64 = 185.0;

/// Two-leg angles inside [150, 210] or within 10 degrees of 0/360 are
/// normal track geometry
const STRAIGHT_MIN: f64 = 150.0;
const STRAIGHT_MAX: f64 = 210.0;
const FOLDED_MAX: f64 = 10.0;
const FOLDED_MIN: f64 = 350.0;

/// Classifies every node by degree and neighbor bearings
///
/// Nodes are scanned in ascending id order, so the output list order is
/// reproducible across runs.
pub fn detect_degree_anomalies(network: &RailNetwork) -> Vec<Finding> {
    let mut ids: Vec<NodeId> = network.nodes().map(|node| node.id).collect();
    ids.sort_unstable();

    ids.par_iter()
        .filter_map(|&id| classify_node(network, id))
        .collect()
}

fn classify_node(network: &RailNetwork, id: NodeId) -> Option<Finding> {
    let node = network.node(id)?;
    let neighbors = network.neighbors(id);
    match neighbors.len() {
        2 => classify_two_legs(network, node, neighbors),
        4 if !node.has_railway(CROSSING) => classify_four_legs(network, node, neighbors),
        n if n > 4 && !node.has_railway(TURNTABLE) => Some(Finding::for_node(
            FindingKind::MoreThanFourEdges { edge_count: n },
            node,
        )),
        _ => None,
    }
}

/// Degree 2: flag angles outside the near-straight and near-folded bands
fn classify_two_legs(
    network: &RailNetwork,
    node: &RailNode,
    neighbors: &[NodeId],
) -> Option<Finding> {
    let bearings = neighbor_bearings(network, node, neighbors);
    let &[a, b] = bearings.as_slice() else {
        return None;
    };
    let angle = (b - a).abs();
    if is_expected_angle(angle) {
        return None;
    }
    Some(Finding::for_node(
        FindingKind::SuspiciousAngle {
            angle: round_tenth(angle),
        },
        node,
    ))
}

/// Degree 4 without a crossing tag: flag unless some pair of legs runs
/// straight through the node
fn classify_four_legs(
    network: &RailNetwork,
    node: &RailNode,
    neighbors: &[NodeId],
) -> Option<Finding> {
    let bearings = neighbor_bearings(network, node, neighbors);
    if bearings.len() != 4 {
        return None;
    }
    let has_through_route = bearings
        .iter()
        .tuple_combinations()
        .any(|(a, b)| is_opposite(*a, *b));
    if has_through_route {
        None
    } else {
        Some(Finding::for_node(FindingKind::FourVerticesNoCrossing, node))
    }
}

/// Bearings from a node to its neighbors, in edge-insertion order
///
/// Neighbors without a loaded node record are skipped, shrinking the result.
fn neighbor_bearings(network: &RailNetwork, node: &RailNode, neighbors: &[NodeId]) -> Vec<f64> {
    neighbors
        .iter()
        .filter_map(|&id| network.node(id))
        .map(|neighbor| geometry::bearing(node.geometry, neighbor.geometry))
        .collect()
}

/// Whether two bearings run in opposite directions
fn is_opposite(a: f64, b: f64) -> bool {
    let diff = (a - b).abs();
    diff > OPPOSITE_MIN && diff < OPPOSITE_MAX
}

/// Whether a two-leg angle is normal geometry and gets suppressed
fn is_expected_angle(angle: f64) -> bool {
    (STRAIGHT_MIN..=STRAIGHT_MAX).contains(&angle) || angle <= FOLDED_MAX || angle >= FOLDED_MIN
}

/// Rounds to one decimal place for reporting
fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
