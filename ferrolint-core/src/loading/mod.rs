//! Loading railway extracts from map data sources (OSM XML, Overpass JSON)
//! into the analysis model.
//!
//! Both adapters normalize tags the same way (the `railway` value set and
//! the buffer-stop direction) and run the same fatal-input validation, so
//! equivalent extracts produce identical [`RailwayData`](crate::RailwayData)
//! regardless of source format.

mod osm_xml;
mod overpass;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use log::{debug, warn};

use crate::{
    Error,
    model::{NodeId, RailWay, RailwayData, SignalDirection, WayId},
};

pub use osm_xml::read_osm_xml;
pub use overpass::read_overpass_json;

/// Checks the fatal-input rules before analysis: every way needs at least
/// two node references and every reference must resolve to a loaded node.
///
/// # Errors
///
/// Returns the first violation with the offending way and node ids.
pub fn validate(data: &RailwayData) -> Result<(), Error> {
    for way in &data.ways {
        if way.nodes.len() < 2 {
            return Err(Error::ShortWay {
                way: way.id,
                len: way.nodes.len(),
            });
        }
        for &node in &way.nodes {
            if !data.nodes.contains_key(&node) {
                return Err(Error::UnknownNode { way: way.id, node });
            }
        }
    }
    Ok(())
}

/// Maps a `railway:signal:direction` value onto the model
///
/// Empty values count as untagged (the stop terminates both way ends);
/// unrecognized values are kept as [`SignalDirection::Other`], which
/// terminates neither end.
pub(crate) fn parse_direction(value: &str, node: NodeId) -> Option<SignalDirection> {
    match value {
        "forward" => Some(SignalDirection::Forward),
        "backward" => Some(SignalDirection::Backward),
        "" => None,
        other => {
            warn!("Node {node} has unrecognized railway:signal:direction '{other}'");
            Some(SignalDirection::Other)
        }
    }
}

/// Collapses duplicate way ids: the later record wins, the earlier document
/// position is kept
pub(crate) fn dedup_ways(parsed: Vec<RailWay>) -> Vec<RailWay> {
    let mut index: HashMap<WayId, usize> = HashMap::with_capacity(parsed.len());
    let mut ways: Vec<RailWay> = Vec::with_capacity(parsed.len());
    for way in parsed {
        match index.entry(way.id) {
            Entry::Occupied(entry) => {
                debug!("Duplicate way {} in input, keeping the later record", way.id);
                ways[*entry.get()] = way;
            }
            Entry::Vacant(entry) => {
                entry.insert(ways.len());
                ways.push(way);
            }
        }
    }
    ways
}

#[cfg(test)]
mod tests {
    use geo::Point;

    use super::*;
    use crate::model::RailNode;

    fn node(id: NodeId) -> RailNode {
        RailNode {
            id,
            geometry: Point::new(0.0, 0.0),
            railway: Vec::new(),
            direction: None,
            user: None,
            version: None,
        }
    }

    fn way(id: WayId, nodes: &[NodeId]) -> RailWay {
        RailWay {
            id,
            nodes: nodes.to_vec(),
            railway: Vec::new(),
        }
    }

    #[test]
    fn validate_accepts_resolvable_ways() {
        let data = RailwayData {
            nodes: [(1, node(1)), (2, node(2))].into_iter().collect(),
            ways: vec![way(10, &[1, 2])],
        };
        assert!(validate(&data).is_ok());
    }

    #[test]
    fn validate_rejects_unknown_node_reference() {
        let data = RailwayData {
            nodes: [(1, node(1))].into_iter().collect(),
            ways: vec![way(10, &[1, 99])],
        };
        match validate(&data) {
            Err(Error::UnknownNode { way, node }) => {
                assert_eq!(way, 10);
                assert_eq!(node, 99);
            }
            other => panic!("expected UnknownNode, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_short_way() {
        let data = RailwayData {
            nodes: [(1, node(1))].into_iter().collect(),
            ways: vec![way(10, &[1])],
        };
        match validate(&data) {
            Err(Error::ShortWay { way, len }) => {
                assert_eq!(way, 10);
                assert_eq!(len, 1);
            }
            other => panic!("expected ShortWay, got {other:?}"),
        }
    }

    #[test]
    fn direction_values_map_onto_the_model() {
        assert_eq!(parse_direction("forward", 1), Some(SignalDirection::Forward));
        assert_eq!(
            parse_direction("backward", 1),
            Some(SignalDirection::Backward)
        );
        assert_eq!(parse_direction("", 1), None);
        assert_eq!(parse_direction("none", 1), Some(SignalDirection::Other));
    }

    #[test]
    fn duplicate_ways_keep_position_and_take_later_content() {
        let deduped = dedup_ways(vec![way(10, &[1, 2]), way(11, &[3, 4]), way(10, &[5, 6])]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].id, 10);
        assert_eq!(deduped[0].nodes, vec![5, 6]);
        assert_eq!(deduped[1].id, 11);
    }
}
