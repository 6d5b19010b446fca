//! Overpass API JSON export parsing
//!
//! Reads the `{"elements": [...]}` document produced by Overpass queries.
//! Relations and other element types are skipped.

use std::collections::BTreeMap;
use std::io::Read;

use geo::Point;
use hashbrown::HashMap;
use log::info;
use serde::Deserialize;

use super::{dedup_ways, parse_direction, validate};
use crate::{
    Error,
    model::{NodeId, RailNode, RailWay, RailwayData, WayId},
};

#[derive(Debug, Deserialize)]
struct RawOverpass {
    #[serde(default)]
    elements: Vec<RawElement>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RawElement {
    Node(RawNode),
    Way(RawWay),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    id: NodeId,
    lat: f64,
    lon: f64,
    #[serde(default)]
    tags: BTreeMap<String, String>,
    user: Option<String>,
    version: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawWay {
    id: WayId,
    #[serde(default)]
    nodes: Vec<NodeId>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

/// Reads an Overpass JSON export into the analysis model
///
/// # Errors
///
/// Returns an error when the document cannot be parsed or fails the
/// fatal-input validation (short way, unknown node reference).
pub fn read_overpass_json<R: Read>(reader: R) -> Result<RailwayData, Error> {
    let raw: RawOverpass = serde_json::from_reader(reader)?;
    let data = convert(raw);
    validate(&data)?;
    info!(
        "Loaded {} nodes and {} ways from Overpass JSON",
        data.nodes.len(),
        data.ways.len()
    );
    Ok(data)
}

fn convert(raw: RawOverpass) -> RailwayData {
    let mut nodes: HashMap<NodeId, RailNode> = HashMap::new();
    let mut ways: Vec<RailWay> = Vec::new();

    for element in raw.elements {
        match element {
            RawElement::Node(node) => {
                let direction = node
                    .tags
                    .get("railway:signal:direction")
                    .and_then(|value| parse_direction(value, node.id));
                nodes.insert(
                    node.id,
                    RailNode {
                        id: node.id,
                        geometry: Point::new(node.lon, node.lat),
                        railway: railway_values(&node.tags),
                        direction,
                        user: node.user,
                        version: node.version,
                    },
                );
            }
            RawElement::Way(way) => ways.push(RailWay {
                id: way.id,
                nodes: way.nodes,
                railway: railway_values(&way.tags),
            }),
            RawElement::Other => {}
        }
    }

    RailwayData {
        nodes,
        ways: dedup_ways(ways),
    }
}

/// Collects the values of the `railway` tag
fn railway_values(tags: &BTreeMap<String, String>) -> Vec<String> {
    tags.get("railway").map(|value| vec![value.clone()]).unwrap_or_default()
}
