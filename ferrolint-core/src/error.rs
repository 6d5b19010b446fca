use thiserror::Error;

use crate::model::{NodeId, WayId};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Way {way} references unknown node {node}")]
    UnknownNode { way: WayId, node: NodeId },
    #[error("Way {way} has {len} node reference(s), at least 2 are required")]
    ShortWay { way: WayId, len: usize },
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("OSM XML error: {0}")]
    XmlError(#[from] quick_xml::DeError),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Report error: {0}")]
    ReportError(String),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
}
