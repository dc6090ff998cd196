// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pipegraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use super::{diagram_file_schema, load_diagram, DiagramFile, StoreError};
use crate::model::{builtin_pipeline, DiagramConfigError, Rgb};
use crate::test_support::TempDir;

const TWO_ANCHORS: &str = r##"{
  "anchors": [
    { "id": "A", "label": "Loader", "text_color": "white", "background_color": "#1f4e79", "top": 40, "left": 5 },
    { "id": "B", "label": "Detector", "text_color": "#000", "background_color": "#ffcc00", "top": 40, "left": 70 }
  ],
  "connectors": [ { "source": "A", "target": "B" } ]
}"##;

#[fixture]
fn tmp() -> TempDir {
    TempDir::new("diagram-file")
}

#[rstest]
fn loads_a_valid_diagram_file(tmp: TempDir) {
    let path = tmp.write("diagram.json", TWO_ANCHORS);
    let diagram = load_diagram(&path).expect("load diagram");

    assert_eq!(diagram.anchors().len(), 2);
    let b = diagram.anchors().get("B").unwrap();
    assert_eq!(b.label(), "Detector");
    assert_eq!(b.text_color(), Rgb::BLACK);
    assert_eq!(b.background_color(), Rgb::new(0xff, 0xcc, 0x00));
    assert_eq!(b.left_percent(), 70.0);
    assert_eq!(diagram.connectors().as_slice()[0].to_string(), "A -> B");
}

#[rstest]
fn unknown_connector_endpoint_is_a_config_error(tmp: TempDir) {
    let path = tmp.write("diagram.json", &TWO_ANCHORS.replace(r#""source": "A""#, r#""source": "Z""#));
    let err = load_diagram(&path).unwrap_err();
    match err {
        StoreError::Config {
            source: DiagramConfigError::UnknownAnchor { missing, .. },
            ..
        } => assert_eq!(missing.as_str(), "Z"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[rstest]
#[case::duplicate_id(r#""id": "B""#, r#""id": "A""#)]
#[case::bad_colour(r##""#ffcc00""##, r#""yellowish""#)]
#[case::offset_out_of_range(r#""top": 40, "left": 70"#, r#""top": 140, "left": 70"#)]
#[case::blank_id(r#""id": "B""#, r#""id": " ""#)]
fn invalid_records_are_rejected(tmp: TempDir, #[case] from: &str, #[case] to: &str) {
    let path = tmp.write("diagram.json", &TWO_ANCHORS.replace(from, to));
    let err = load_diagram(&path).unwrap_err();
    assert!(matches!(err, StoreError::Config { .. }), "{err}");
}

#[rstest]
fn malformed_json_is_a_json_error(tmp: TempDir) {
    let path = tmp.write("diagram.json", "{ \"anchors\": [");
    assert!(matches!(load_diagram(&path).unwrap_err(), StoreError::Json { .. }));
}

#[rstest]
fn unknown_fields_are_rejected(tmp: TempDir) {
    let path = tmp.write("diagram.json", r#"{ "anchors": [], "edges": [] }"#);
    assert!(matches!(load_diagram(&path).unwrap_err(), StoreError::Json { .. }));
}

#[rstest]
fn missing_file_is_an_io_error(tmp: TempDir) {
    let err = load_diagram(tmp.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
    assert!(err.to_string().starts_with("io error at"));
}

#[rstest]
fn builtin_pipeline_survives_a_file_round_trip(tmp: TempDir) {
    let builtin = builtin_pipeline().unwrap();
    let text = serde_json::to_string_pretty(&DiagramFile::from_diagram(&builtin)).unwrap();
    let path = tmp.write("builtin.json", &text);

    assert_eq!(load_diagram(&path).unwrap(), builtin);
}

#[test]
fn schema_names_every_record_field() {
    let schema = diagram_file_schema();
    for field in ["anchors", "connectors", "text_color", "background_color", "top", "left"] {
        assert!(schema.contains(&format!("\"{field}\"")), "schema lacks {field}");
    }
}
