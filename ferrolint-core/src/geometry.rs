//! Geometric primitives for track analysis
//!
//! Bearings and distances are great-circle (haversine) measures. Direction
//! and containment tests work on plain lon/lat deltas instead, a planar
//! approximation that is only ever applied over spans of a few hundred
//! meters.

use geo::{Bearing, Contains, Coord, Distance, Haversine, Point, Triangle};

/// Initial great-circle bearing from `from` to `to`, in degrees `[0, 360)`
/// clockwise from north
pub fn bearing(from: Point<f64>, to: Point<f64>) -> f64 {
    Haversine.bearing(from, to)
}

/// Great-circle distance between two points, in kilometers
pub fn distance_km(a: Point<f64>, b: Point<f64>) -> f64 {
    Haversine.distance(a, b) / 1000.0
}

/// Planar delta from `a` to `b` in degree space
pub fn vector(a: Point<f64>, b: Point<f64>) -> Coord<f64> {
    Coord {
        x: b.x() - a.x(),
        y: b.y() - a.y(),
    }
}

/// The vector rotated 90 degrees counter-clockwise
pub fn perpendicular(v: Coord<f64>) -> Coord<f64> {
    Coord { x: -v.y, y: v.x }
}

pub fn magnitude(v: Coord<f64>) -> f64 {
    v.x.hypot(v.y)
}

/// Unsigned angle between two vectors, in radians `[0, π]`
///
/// Callers must ensure neither vector has zero length.
pub fn angle_between(v1: Coord<f64>, v2: Coord<f64>) -> f64 {
    let dot = v1.x * v2.x + v1.y * v2.y;
    let magnitudes = magnitude(v1) * magnitude(v2);
    (dot / magnitudes).clamp(-1.0, 1.0).acos()
}

/// Containment test against a triangular probe area
///
/// Points exactly on the triangle boundary count as outside.
pub fn point_in_triangle(point: Point<f64>, triangle: &Triangle<f64>) -> bool {
    triangle.contains(&point)
}
