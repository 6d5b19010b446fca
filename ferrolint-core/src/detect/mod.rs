//! Anomaly detectors over a parsed railway extract

mod degree;
mod disconnected;

pub use degree::detect_degree_anomalies;
pub use disconnected::detect_disconnected_ends;

use log::info;

use crate::{
    findings::Findings,
    model::{RailNetwork, RailwayData},
};

/// Runs every detector over the extract and groups the results by kind
///
/// Detectors are deterministic, so repeated runs over the same extract
/// produce identical findings in identical order.
pub fn analyze(data: &RailwayData) -> Findings {
    let network = RailNetwork::build(data.nodes.clone(), &data.ways);
    info!(
        "Analyzing network with {} nodes and {} edges",
        network.node_count(),
        network.edge_count()
    );

    let mut findings = Findings::default();
    for finding in detect_degree_anomalies(&network) {
        findings.push(finding);
    }
    for finding in detect_disconnected_ends(data) {
        findings.push(finding);
    }

    info!(
        "Found {} suspicious angles, {} plain four-way vertices, {} crowded nodes, {} disconnected tracks",
        findings.suspicious_angle.len(),
        findings.four_vertices_no_crossing.len(),
        findings.more_than_four_edges.len(),
        findings.disconnected_tracks.len()
    );
    findings
}
