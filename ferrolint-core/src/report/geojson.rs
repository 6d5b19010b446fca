//! GeoJSON export of findings for web map display
//!
//! One point feature per finding. The `icon` property names sprites in the
//! Mapbox Streets style, which is what the map frontend keys on.

use geo::Point;
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use crate::{
    error::Error,
    findings::{Finding, FindingKind, Findings},
};

/// Converts findings to a `FeatureCollection` of point features
///
/// Features follow the [`Findings::iter`] order, grouped by kind.
pub fn findings_to_geojson(findings: &Findings) -> Result<FeatureCollection, Error> {
    let features = findings
        .iter()
        .map(finding_feature)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

pub fn findings_to_geojson_string(findings: &Findings) -> Result<String, Error> {
    serde_json::to_string(&findings_to_geojson(findings)?)
        .map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn finding_feature(finding: &Finding) -> Result<Feature, Error> {
    let location = Point::new(finding.lon, finding.lat);
    let geometry = Geometry::new(GeoJsonValue::from(&location));

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "nodeId": finding.node_id,
            "description": describe(&finding.kind),
            "icon": icon(&finding.kind),
        }
    });

    Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn describe(kind: &FindingKind) -> String {
    match kind {
        FindingKind::FourVerticesNoCrossing => "four vertices, no crossing".to_string(),
        FindingKind::SuspiciousAngle { angle } => format!("suspicious angle: {angle}"),
        FindingKind::MoreThanFourEdges { edge_count } => {
            format!("more than four edges: {edge_count}")
        }
        FindingKind::DisconnectedTrack => "disconnected track".to_string(),
    }
}

fn icon(kind: &FindingKind) -> &'static str {
    match kind {
        FindingKind::FourVerticesNoCrossing | FindingKind::DisconnectedTrack => "rocket",
        FindingKind::SuspiciousAngle { .. } => "picnic-site",
        FindingKind::MoreThanFourEdges { .. } => "windmill",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_findings() -> Findings {
        let mut findings = Findings::default();
        findings.push(Finding {
            kind: FindingKind::SuspiciousAngle { angle: 92.5 },
            node_id: 10,
            lat: 52.5,
            lon: 13.4,
            user: None,
            version: None,
        });
        findings.push(Finding {
            kind: FindingKind::MoreThanFourEdges { edge_count: 6 },
            node_id: 11,
            lat: 48.1,
            lon: 11.6,
            user: None,
            version: None,
        });
        findings
    }

    #[test]
    fn one_feature_per_finding() {
        let collection = findings_to_geojson(&sample_findings()).expect("geojson");
        assert_eq!(collection.features.len(), 2);
    }

    #[test]
    fn features_carry_point_coordinates_as_lon_lat() {
        let collection = findings_to_geojson(&sample_findings()).expect("geojson");
        let geometry = collection.features[0].geometry.as_ref().expect("geometry");
        match &geometry.value {
            GeoJsonValue::Point(coordinates) => {
                assert_eq!(coordinates, &vec![13.4, 52.5]);
            }
            other => panic!("expected a point, got {other:?}"),
        }
    }

    #[test]
    fn properties_describe_the_finding() {
        let collection = findings_to_geojson(&sample_findings()).expect("geojson");
        let angle = &collection.features[0];
        assert_eq!(
            angle.property("description").and_then(|v| v.as_str()),
            Some("suspicious angle: 92.5")
        );
        assert_eq!(
            angle.property("icon").and_then(|v| v.as_str()),
            Some("picnic-site")
        );
        assert_eq!(angle.property("nodeId").and_then(|v| v.as_i64()), Some(10));

        let edges = &collection.features[1];
        assert_eq!(
            edges.property("description").and_then(|v| v.as_str()),
            Some("more than four edges: 6")
        );
        assert_eq!(
            edges.property("icon").and_then(|v| v.as_str()),
            Some("windmill")
        );
    }

    #[test]
    fn string_form_is_a_feature_collection() {
        let text = findings_to_geojson_string(&Findings::default()).expect("geojson");
        assert!(text.contains(r#""type":"FeatureCollection""#));
    }
}
