//! Undirected railway graph built from way segments

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use itertools::Itertools;
use log::debug;

use super::elements::{NodeId, RailNode, RailWay, WayId};

/// Undirected graph over track segments with deduplicated edges
///
/// Edges are keyed by the sorted node-id pair, so a segment covered by
/// several ways is a single edge whose way id is the last writer. Neighbor
/// lists keep edge-insertion order, which is the enumeration order the
/// degree detector relies on.
#[derive(Debug, Default)]
pub struct RailNetwork {
    nodes: HashMap<NodeId, RailNode>,
    adjacency: HashMap<NodeId, Vec<NodeId>>,
    edges: HashMap<(NodeId, NodeId), WayId>,
}

impl RailNetwork {
    /// Builds the network from consecutive node pairs of every way
    ///
    /// References to nodes missing from the node map are kept in the
    /// adjacency structure; detectors skip them when coordinates are needed.
    pub fn build(nodes: HashMap<NodeId, RailNode>, ways: &[RailWay]) -> Self {
        let mut network = Self {
            nodes,
            adjacency: HashMap::new(),
            edges: HashMap::new(),
        };
        for way in ways {
            for (&a, &b) in way.nodes.iter().tuple_windows() {
                network.insert_segment(a, b, way.id);
            }
        }
        network
    }

    fn insert_segment(&mut self, a: NodeId, b: NodeId, way: WayId) {
        if a == b {
            debug!("Way {way} repeats node {a} in consecutive positions, segment skipped");
            return;
        }
        match self.edges.entry(edge_key(a, b)) {
            Entry::Occupied(mut entry) => {
                // Shared segment: the last way to cover it owns the edge
                entry.insert(way);
            }
            Entry::Vacant(entry) => {
                entry.insert(way);
                self.adjacency.entry(a).or_default().push(b);
                self.adjacency.entry(b).or_default().push(a);
            }
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&RailNode> {
        self.nodes.get(&id)
    }

    /// Iterator over all loaded nodes, in no particular order
    pub fn nodes(&self) -> impl Iterator<Item = &RailNode> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of distinct edges incident to the node
    pub fn degree(&self, id: NodeId) -> usize {
        self.neighbors(id).len()
    }

    /// Neighbor ids in edge-insertion order; empty for unknown ids
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        self.adjacency.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Id of the way owning the edge between two adjacent nodes
    pub fn edge_way(&self, a: NodeId, b: NodeId) -> Option<WayId> {
        self.edges.get(&edge_key(a, b)).copied()
    }
}

/// Canonical key for an undirected edge
fn edge_key(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use geo::Point;

    use super::*;

    fn node(id: NodeId, lon: f64, lat: f64) -> RailNode {
        RailNode {
            id,
            geometry: Point::new(lon, lat),
            railway: Vec::new(),
            direction: None,
            user: None,
            version: None,
        }
    }

    fn node_map(ids: &[NodeId]) -> HashMap<NodeId, RailNode> {
        ids.iter()
            .map(|&id| (id, node(id, id as f64 * 0.001, 0.0)))
            .collect()
    }

    fn way(id: WayId, nodes: &[NodeId]) -> RailWay {
        RailWay {
            id,
            nodes: nodes.to_vec(),
            railway: vec!["rail".to_string()],
        }
    }

    #[test]
    fn builds_edges_from_consecutive_pairs() {
        let network = RailNetwork::build(node_map(&[1, 2, 3]), &[way(10, &[1, 2, 3])]);
        assert_eq!(network.edge_count(), 2);
        assert_eq!(network.degree(1), 1);
        assert_eq!(network.degree(2), 2);
        assert_eq!(network.degree(3), 1);
        assert_eq!(network.edge_way(1, 2), Some(10));
        assert_eq!(network.edge_way(2, 1), Some(10));
        assert_eq!(network.edge_way(1, 3), None);
    }

    #[test]
    fn shared_segment_is_deduplicated_with_last_way_winning() {
        let ways = [way(10, &[1, 2]), way(20, &[2, 1])];
        let network = RailNetwork::build(node_map(&[1, 2]), &ways);
        assert_eq!(network.edge_count(), 1);
        assert_eq!(network.degree(1), 1);
        assert_eq!(network.degree(2), 1);
        assert_eq!(network.edge_way(1, 2), Some(20));
    }

    #[test]
    fn neighbors_keep_edge_insertion_order() {
        let ways = [way(10, &[5, 2]), way(11, &[5, 9]), way(12, &[1, 5])];
        let network = RailNetwork::build(node_map(&[1, 2, 5, 9]), &ways);
        assert_eq!(network.neighbors(5), &[2, 9, 1]);
    }

    #[test]
    fn consecutive_duplicate_node_is_skipped() {
        let network = RailNetwork::build(node_map(&[1, 2]), &[way(10, &[1, 1, 2])]);
        assert_eq!(network.edge_count(), 1);
        assert_eq!(network.degree(1), 1);
        assert_eq!(network.neighbors(1), &[2]);
    }

    #[test]
    fn unknown_id_has_no_neighbors() {
        let network = RailNetwork::build(node_map(&[1, 2]), &[way(10, &[1, 2])]);
        assert!(network.neighbors(99).is_empty());
        assert_eq!(network.degree(99), 0);
        assert!(network.node(99).is_none());
    }

    #[test]
    fn closed_loop_counts_each_edge_once() {
        let network = RailNetwork::build(node_map(&[1, 2, 3]), &[way(10, &[1, 2, 3, 1])]);
        assert_eq!(network.edge_count(), 3);
        assert_eq!(network.degree(1), 2);
        assert_eq!(network.neighbors(1), &[2, 3]);
    }
}
