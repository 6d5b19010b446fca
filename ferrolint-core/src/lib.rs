//! Topology and geometry checks for OSM railway networks
//!
//! ferrolint-core parses a railway extract (OSM XML or an Overpass JSON
//! export), builds an undirected track network and runs heuristic detectors
//! over it: suspicious bend angles, four-way vertices without a crossing
//! tag, nodes with more edges than a plain junction can have, and track ends
//! that stop just short of other track. Results are grouped into
//! [`Findings`] and can be rendered as a findings JSON document, an Osmose
//! analyser report or a GeoJSON `FeatureCollection`.

pub mod detect;
pub mod error;
pub mod findings;
pub mod geometry;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod report;

pub use detect::analyze;
pub use error::Error;
pub use findings::{Finding, FindingKind, Findings};
pub use loading::{read_osm_xml, read_overpass_json};
pub use model::{NodeId, RailNetwork, RailNode, RailWay, RailwayData, SignalDirection, WayId};
