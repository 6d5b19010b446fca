//! Data model for railway network analysis
//!
//! Contains the loaded map elements and the undirected graph derived from
//! them.

pub mod elements;
pub mod network;

// Re-export of basic types for convenience
pub use elements::{NodeId, RailNode, RailWay, RailwayData, SignalDirection, WayId};
pub use network::RailNetwork;
