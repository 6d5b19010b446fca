//! Osmose analyser report output
//!
//! Serializes findings into the XML document the Osmose QA frontend ingests:
//! an `analysers` root with one `analyser` holding `class` declarations and
//! one `error` element per finding. All four classes live under item 9011 at
//! level 2.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::{
    error::Error,
    findings::{Finding, FindingKind, Findings},
    model::NodeId,
};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

const ITEM: u32 = 9011;
const LEVEL: u32 = 2;
const SUBCLASS: u32 = 1;

const CLASS_SUSPICIOUS_ANGLE: u32 = 12345;
const CLASS_FOUR_VERTICES: u32 = 12346;
const CLASS_MANY_EDGES: u32 = 12347;
const CLASS_DISCONNECTED: u32 = 12348;

#[derive(Debug, Serialize)]
#[serde(rename = "analysers")]
struct Report {
    #[serde(rename = "@timestamp")]
    timestamp: String,
    analyser: Analyser,
}

#[derive(Debug, Serialize)]
struct Analyser {
    #[serde(rename = "@timestamp")]
    timestamp: String,
    class: Vec<ClassDecl>,
    error: Vec<ErrorEntry>,
}

#[derive(Debug, Serialize)]
struct ClassDecl {
    #[serde(rename = "@id")]
    id: u32,
    #[serde(rename = "@level")]
    level: u32,
    #[serde(rename = "@item")]
    item: u32,
    classtext: ClassText,
}

#[derive(Debug, Serialize)]
struct ClassText {
    #[serde(rename = "@lang")]
    lang: &'static str,
    #[serde(rename = "@title")]
    title: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorEntry {
    #[serde(rename = "@class")]
    class: u32,
    #[serde(rename = "@subclass")]
    subclass: u32,
    location: Location,
    node: NodeRef,
    text: Text,
}

#[derive(Debug, Serialize)]
struct Location {
    #[serde(rename = "@lat")]
    lat: f64,
    #[serde(rename = "@lon")]
    lon: f64,
}

#[derive(Debug, Serialize)]
struct NodeRef {
    #[serde(rename = "@lat")]
    lat: f64,
    #[serde(rename = "@lon")]
    lon: f64,
    #[serde(rename = "@id")]
    id: NodeId,
    #[serde(rename = "@user", skip_serializing_if = "Option::is_none")]
    user: Option<String>,
    #[serde(rename = "@version", skip_serializing_if = "Option::is_none")]
    version: Option<u32>,
}

#[derive(Debug, Serialize)]
struct Text {
    #[serde(rename = "@lang")]
    lang: &'static str,
    #[serde(rename = "@value")]
    value: String,
}

/// Renders findings as an Osmose analyser XML document
///
/// Errors are listed grouped by kind, four-vertex findings first, then
/// angles, crowded nodes and disconnected tracks, preserving detector order
/// within each group.
pub fn osmose_report(findings: &Findings, generated_at: DateTime<Utc>) -> Result<String, Error> {
    let timestamp = generated_at.to_rfc3339_opts(SecondsFormat::Secs, true);
    let report = Report {
        timestamp: timestamp.clone(),
        analyser: Analyser {
            timestamp,
            class: class_declarations(),
            error: findings.iter().map(error_entry).collect(),
        },
    };
    let body =
        quick_xml::se::to_string(&report).map_err(|e| Error::ReportError(e.to_string()))?;
    Ok(format!("{XML_DECLARATION}\n{body}"))
}

fn class_declarations() -> Vec<ClassDecl> {
    [
        (CLASS_SUSPICIOUS_ANGLE, "way angles"),
        (CLASS_FOUR_VERTICES, "4 vertices and no crossing"),
        (CLASS_MANY_EDGES, "too many edges"),
        (CLASS_DISCONNECTED, "disconnected track"),
    ]
    .into_iter()
    .map(|(id, title)| ClassDecl {
        id,
        level: LEVEL,
        item: ITEM,
        classtext: ClassText { lang: "en", title },
    })
    .collect()
}

fn error_entry(finding: &Finding) -> ErrorEntry {
    ErrorEntry {
        class: class_id(&finding.kind),
        subclass: SUBCLASS,
        location: Location {
            lat: finding.lat,
            lon: finding.lon,
        },
        node: NodeRef {
            lat: finding.lat,
            lon: finding.lon,
            id: finding.node_id,
            user: finding.user.clone(),
            version: finding.version,
        },
        text: Text {
            lang: "en",
            value: describe(&finding.kind),
        },
    }
}

fn class_id(kind: &FindingKind) -> u32 {
    match kind {
        FindingKind::SuspiciousAngle { .. } => CLASS_SUSPICIOUS_ANGLE,
        FindingKind::FourVerticesNoCrossing => CLASS_FOUR_VERTICES,
        FindingKind::MoreThanFourEdges { .. } => CLASS_MANY_EDGES,
        FindingKind::DisconnectedTrack => CLASS_DISCONNECTED,
    }
}

fn describe(kind: &FindingKind) -> String {
    match kind {
        FindingKind::FourVerticesNoCrossing => "4 vertices and no crossing".to_string(),
        FindingKind::SuspiciousAngle { angle } => {
            format!("suspicious angle on way: {angle}")
        }
        FindingKind::MoreThanFourEdges { edge_count } => {
            format!("more than four edges on node: {edge_count}")
        }
        FindingKind::DisconnectedTrack => "disconnected track".to_string(),
    }
}
