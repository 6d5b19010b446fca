//! Railway network elements - nodes and ways as loaded from a map extract

use geo::Point;
use hashbrown::HashMap;

/// OSM identifier of a node
pub type NodeId = i64;
/// OSM identifier of a way
pub type WayId = i64;

/// Orientation of a buffer stop along its way, from `railway:signal:direction`
///
/// A stop without the tag terminates both ends of the way; a stop tagged with
/// an unrecognized value terminates neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalDirection {
    /// Facing along the way, terminating the last node
    Forward,
    /// Facing against the way, terminating the first node
    Backward,
    /// Tagged with a value this tool does not interpret
    Other,
}

/// Railway network node
#[derive(Debug, Clone)]
pub struct RailNode {
    /// OSM ID of the node
    pub id: NodeId,
    /// Node coordinates (x = longitude, y = latitude)
    pub geometry: Point<f64>,
    /// Values of the node's `railway` tag
    pub railway: Vec<String>,
    /// Buffer stop orientation, when tagged
    pub direction: Option<SignalDirection>,
    /// Editor username, carried through for reporting
    pub user: Option<String>,
    /// Edit version, carried through for reporting
    pub version: Option<u32>,
}

impl RailNode {
    /// Whether the node carries the given `railway` tag value
    pub fn has_railway(&self, value: &str) -> bool {
        self.railway.iter().any(|v| v == value)
    }

    pub fn is_buffer_stop(&self) -> bool {
        self.has_railway("buffer_stop")
    }
}

/// Railway way: an ordered node sequence where consecutive pairs are
/// physically connected track segments
#[derive(Debug, Clone)]
pub struct RailWay {
    /// OSM ID of the way
    pub id: WayId,
    /// Ordered node references
    pub nodes: Vec<NodeId>,
    /// Values of the way's `railway` tag
    pub railway: Vec<String>,
}

impl RailWay {
    /// Whether the way is tagged `railway = rail`
    pub fn is_rail(&self) -> bool {
        self.railway.iter().any(|v| v == "rail")
    }
}

/// A parsed railway extract, fully materialized before analysis
#[derive(Debug, Clone, Default)]
pub struct RailwayData {
    pub nodes: HashMap<NodeId, RailNode>,
    pub ways: Vec<RailWay>,
}
