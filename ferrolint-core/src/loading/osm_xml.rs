//! OSM XML extract parsing
//!
//! Reads a plain `.osm` export (`<node>` elements with `<tag>` children,
//! `<way>` elements with `<nd>` references) into [`RailwayData`]. Only the
//! `railway` tag family is retained; every other element and tag in the
//! document is ignored.

use std::io::BufRead;

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
struct RawOsm {
    #[serde(default, rename = "node")]
    nodes: Vec<RawNode>,
    #[serde(default, rename = "way")]
    ways: Vec<RawWay>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(rename = "@id")]
    id: NodeId,
    #[serde(rename = "@lat")]
    lat: f64,
    #[serde(rename = "@lon")]
    lon: f64,
    #[serde(rename = "@user")]
    user: Option<String>,
    #[serde(rename = "@version")]
    version: Option<u32>,
    #[serde(default, rename = "tag")]
    tags: Vec<RawTag>,
}

#[derive(Debug, Deserialize)]
struct RawWay {
    #[serde(rename = "@id")]
    id: WayId,
    #[serde(default, rename = "nd")]
    nodes: Vec<RawNodeRef>,
    #[serde(default, rename = "tag")]
    tags: Vec<RawTag>,
}

#[derive(Debug, Deserialize)]
struct RawNodeRef {
    #[serde(rename = "@ref")]
    node: NodeId,
}

#[derive(Debug, Deserialize)]
struct RawTag {
    #[serde(rename = "@k")]
    key: String,
    #[serde(rename = "@v")]
    value: String,
}

/// Reads an OSM XML extract into the analysis model
///
/// # Errors
///
/// Returns an error when the document cannot be parsed or fails the
/// fatal-input validation (short way, unknown node reference).
pub fn read_osm_xml<R: BufRead>(reader: R) -> Result<RailwayData, Error> {
    let raw: RawOsm = quick_xml::de::from_reader(reader)?;
    let data = convert(raw);
    validate(&data)?;
    info!(
        "Loaded {} nodes and {} ways from OSM XML",
        data.nodes.len(),
        data.ways.len()
    );
    Ok(data)
}

fn convert(raw: RawOsm) -> RailwayData {
    let mut nodes: HashMap<NodeId, RailNode> = HashMap::with_capacity(raw.nodes.len());
    for node in raw.nodes {
        let direction = node
            .tags
            .iter()
            .find(|tag| tag.key == "railway:signal:direction")
            .and_then(|tag| parse_direction(&tag.value, node.id));
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

    let ways = raw
        .ways
        .into_iter()
        .map(|way| RailWay {
            id: way.id,
            nodes: way.nodes.iter().map(|nd| nd.node).collect(),
            railway: railway_values(&way.tags),
        })
        .collect();

    RailwayData {
        nodes,
        ways: dedup_ways(ways),
    }
}

/// Collects the values of the `railway` tag
fn railway_values(tags: &[RawTag]) -> Vec<String> {
    tags.iter()
        .filter(|tag| tag.key == "railway")
        .map(|tag| tag.value.clone())
        .collect()
}
