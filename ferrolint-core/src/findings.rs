//! Anomaly findings and their JSON schema
//!
//! The serialized document groups findings into four per-kind lists; entry
//! and list names follow the schema consumed by the existing report and map
//! tooling (camelCase fields, kebab-case kind tags).

use serde::Serialize;

use crate::Error;
use crate::model::{NodeId, RailNode};

/// Kind tag and payload of a finding
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum FindingKind {
    /// Four track legs meet without a crossing tag or a straight through-route
    FourVerticesNoCrossing,
    /// Two track legs meet at an angle outside the expected bands
    SuspiciousAngle { angle: f64 },
    /// More than four track legs meet without a turntable tag
    MoreThanFourEdges { edge_count: usize },
    /// Dangling way end continued by another dangling end across a data gap
    DisconnectedTrack,
}

/// One reported anomaly, anchored at a node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    #[serde(flatten)]
    pub kind: FindingKind,
    pub node_id: NodeId,
    pub lat: f64,
    pub lon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

impl Finding {
    /// Builds a finding anchored at a node, carrying its provenance through
    pub fn for_node(kind: FindingKind, node: &RailNode) -> Self {
        Self {
            kind,
            node_id: node.id,
            lat: node.geometry.y(),
            lon: node.geometry.x(),
            user: node.user.clone(),
            version: node.version,
        }
    }
}

/// Findings collected per kind, in detector execution order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Findings {
    pub four_vertices_no_crossing: Vec<Finding>,
    pub suspicious_angle: Vec<Finding>,
    pub more_than_four_edges: Vec<Finding>,
    pub disconnected_tracks: Vec<Finding>,
}

impl Findings {
    /// Routes a finding into the list for its kind
    pub fn push(&mut self, finding: Finding) {
        match finding.kind {
            FindingKind::FourVerticesNoCrossing => self.four_vertices_no_crossing.push(finding),
            FindingKind::SuspiciousAngle { .. } => self.suspicious_angle.push(finding),
            FindingKind::MoreThanFourEdges { .. } => self.more_than_four_edges.push(finding),
            FindingKind::DisconnectedTrack => self.disconnected_tracks.push(finding),
        }
    }

    pub fn len(&self) -> usize {
        self.four_vertices_no_crossing.len()
            + self.suspicious_angle.len()
            + self.more_than_four_edges.len()
            + self.disconnected_tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All findings across the four lists, in list order
    pub fn iter(&self) -> impl Iterator<Item = &Finding> {
        self.four_vertices_no_crossing
            .iter()
            .chain(&self.suspicious_angle)
            .chain(&self.more_than_four_edges)
            .chain(&self.disconnected_tracks)
    }

    /// Pretty-printed JSON document with the four per-kind lists
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_json_string(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
