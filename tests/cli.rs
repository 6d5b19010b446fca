use assert_cmd::Command;
use predicates::str::{contains, is_empty};

fn cmd() -> Command {
    Command::cargo_bin("ferrolint").unwrap()
}

const EXTRACT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="test">
  <node id="10" lat="0.0" lon="0.0"/>
  <node id="11" lat="0.001" lon="0.0"/>
  <node id="12" lat="0.0" lon="0.001"/>
  <way id="200">
    <nd ref="11"/>
    <nd ref="10"/>
    <nd ref="12"/>
    <tag k="railway" v="rail"/>
  </way>
</osm>
"#;

const BROKEN_EXTRACT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="test">
  <node id="10" lat="0.0" lon="0.0"/>
  <way id="300">
    <nd ref="10"/>
    <nd ref="99"/>
    <tag k="railway" v="rail"/>
  </way>
</osm>
"#;

const EXPORT: &str = r#"{
  "elements": [
    {"type": "node", "id": 1, "lat": 0.0, "lon": 0.0},
    {"type": "node", "id": 2, "lat": 0.0, "lon": 0.001},
    {"type": "way", "id": 100, "nodes": [1, 2], "tags": {"railway": "rail"}}
  ]
}
"#;

#[test]
fn analyzes_stdin_xml_to_stdout_json() {
    cmd()
        .arg("-")
        .write_stdin(EXTRACT)
        .assert()
        .success()
        .stdout(contains("suspiciousAngle"))
        .stdout(contains(r#""type": "suspicious-angle""#))
        .stdout(contains(r#""nodeId": 10"#));
}

#[test]
fn reads_overpass_json_with_explicit_format() {
    cmd()
        .args(["-", "--format", "json"])
        .write_stdin(EXPORT)
        .assert()
        .success()
        .stdout(contains("fourVerticesNoCrossing"));
}

#[test]
fn writes_all_requested_documents() {
    let dir = tempfile::TempDir::new().unwrap();
    let findings_path = dir.path().join("findings.json");
    let osmose_path = dir.path().join("report.xml");
    let geojson_path = dir.path().join("findings.geojson");

    cmd()
        .arg("-")
        .arg("--output")
        .arg(&findings_path)
        .arg("--osmose")
        .arg(&osmose_path)
        .arg("--geojson")
        .arg(&geojson_path)
        .write_stdin(EXTRACT)
        .assert()
        .success()
        .stdout(is_empty());

    let findings = std::fs::read_to_string(&findings_path).unwrap();
    assert!(findings.contains(r#""type": "suspicious-angle""#));

    let osmose = std::fs::read_to_string(&osmose_path).unwrap();
    assert!(osmose.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
    assert!(osmose.contains(r#"<error class="12345" subclass="1">"#));

    let geojson = std::fs::read_to_string(&geojson_path).unwrap();
    assert!(geojson.contains(r#""type":"FeatureCollection""#));
    assert!(geojson.contains(r#""icon":"picnic-site""#));
}

#[test]
fn unresolved_node_reference_fails_without_output() {
    let dir = tempfile::TempDir::new().unwrap();
    let findings_path = dir.path().join("findings.json");

    cmd()
        .arg("-")
        .arg("--output")
        .arg(&findings_path)
        .write_stdin(BROKEN_EXTRACT)
        .assert()
        .failure()
        .stderr(contains("Way 300"));

    assert!(!findings_path.exists());
}

#[test]
fn missing_input_file_fails_with_its_path() {
    cmd()
        .arg("no-such-extract.osm")
        .assert()
        .failure()
        .stderr(contains("no-such-extract.osm"));
}
