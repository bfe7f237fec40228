// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Integration tests for apidoc-json loading and exporting.

use apidoc_json::exporter::{self, JsonStyle};
use apidoc_json::{loader, parser};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read_json(path: &Path) -> Value {
    let text = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()));
    serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {e}", path.display()))
}

/// Exports the fixture tree and compares it with the expected output.
#[test]
fn exports_fixture_tree() {
    let tree = loader::load_file(&fixture("apidoc.json")).unwrap();
    let exported = exporter::export(&tree);

    let actual: Value = serde_json::to_value(&exported).unwrap();
    let expected = read_json(&fixture("apidoc.expected.json"));

    assert_eq!(actual, expected);
}

/// Tests that class keys come out in the order they were read.
#[test]
fn output_keeps_class_order() {
    let tree = loader::load_file(&fixture("apidoc.json")).unwrap();
    let json = exporter::export(&tree).to_json(JsonStyle::Compact).unwrap();

    let positions: Vec<_> = [
        "\"Titanium.Proxy\":",
        "\"Titanium.Event\":",
        "\"Titanium.UI.Button\":",
        "\"Titanium.UI\":",
    ]
    .iter()
    .map(|key| json.find(key).unwrap_or_else(|| panic!("{key} missing")))
    .collect();

    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
}

/// Tests that the shared event properties are resolved across files.
#[test]
fn event_class_from_another_file_is_merged() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("a_button.json"),
        r#"{
            "Titanium.UI.Button": {
                "name": "Titanium.UI.Button",
                "events": [{ "name": "click", "properties": [{ "name": "x" }] }]
            }
        }"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("b_event.json"),
        r#"{
            "Titanium.Event": {
                "name": "Titanium.Event",
                "properties": [{ "name": "source", "type": "Object" }]
            }
        }"#,
    )
    .unwrap();

    let files = loader::collect_input_files(&[dir.path().to_path_buf()]);
    let tree = loader::load_tree(&files).unwrap();
    let output = serde_json::to_value(exporter::export(&tree)).unwrap();

    let names: Vec<_> = output["Titanium.UI.Button"]["events"][0]["properties"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["x", "source"]);
}

/// Tests that exporting leaves the parsed tree unchanged and is repeatable.
#[test]
fn export_does_not_mutate_input() {
    let tree = loader::load_file(&fixture("apidoc.json")).unwrap();
    let snapshot = tree.clone();

    let first = exporter::export(&tree);
    let second = exporter::export(&tree);

    assert_eq!(tree, snapshot);
    assert_eq!(first, second);
}

/// Tests that malformed classes degrade instead of failing.
#[test]
fn malformed_classes_are_exported_best_effort() {
    let tree = parser::parse_tree(
        r#"{
            "Broken": "not an object",
            "NoName": { "methods": [{ "returns": "String" }] }
        }"#,
    )
    .unwrap();

    let output = serde_json::to_value(exporter::export(&tree)).unwrap();

    assert_eq!(
        output["Broken"],
        serde_json::json!({
            "summary": "",
            "extends": "Object",
            "platforms": [],
            "type": "object"
        })
    );
    // A non-object return descriptor has no readable fields.
    assert_eq!(
        output["NoName"]["methods"][0],
        serde_json::json!({ "summary": "", "platforms": [], "returns": {} })
    );
}

/// Tests that pretty output parses back to the compact output.
#[test]
fn pretty_output_matches_compact() {
    let tree = loader::load_file(&fixture("apidoc.json")).unwrap();
    let exported = exporter::export(&tree);

    let pretty: Value =
        serde_json::from_str(&exported.to_json(JsonStyle::Pretty).unwrap()).unwrap();
    let compact: Value =
        serde_json::from_str(&exported.to_json(JsonStyle::Compact).unwrap()).unwrap();

    assert_eq!(pretty, compact);
}
