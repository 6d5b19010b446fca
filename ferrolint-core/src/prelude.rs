// Re-export key components
pub use crate::detect::{analyze, detect_degree_anomalies, detect_disconnected_ends};
pub use crate::findings::{Finding, FindingKind, Findings};
pub use crate::loading::{read_osm_xml, read_overpass_json};
pub use crate::report::{findings_to_geojson, findings_to_geojson_string, osmose_report};

// Core types for the railway network
pub use crate::Error;
pub use crate::model::{NodeId, WayId};
pub use crate::model::{RailNetwork, RailNode, RailWay, RailwayData, SignalDirection};
