//! Integration tests for the host JSON command protocol.
//!
//! Tests the full command pipeline: JSON string -> parse -> execute -> response.

use base64::Engine;
use isovox_editor_lib::command::{execute_json, execute_json_batch};
use isovox_editor_lib::harness::EditorHarness;

#[test]
fn test_command_clear() {
    let mut h = EditorHarness::new();
    h.place_ground(3, 3).unwrap();
    h.place_ground(4, 4).unwrap();

    let resp = execute_json(&mut h, r#"{"command": "clear"}"#).unwrap();
    assert!(resp.success);
    assert_eq!(h.voxel_count(), 0);
}

#[test]
fn test_command_set_color_then_inspect() {
    let mut h = EditorHarness::new();
    h.place_ground(2, 2).unwrap();

    let resp =
        execute_json(&mut h, r##"{"command": "set_color", "color": "#112233"}"##).unwrap();
    assert!(resp.success);

    let resp = execute_json(&mut h, r#"{"command": "inspect"}"#).unwrap();
    let data = resp.data.unwrap();
    assert_eq!(data["voxel_count"], 1);
    assert_eq!(data["voxels"][0]["color"], "#112233");
    assert_eq!(data["voxels"][0]["x"], 2);
}

#[test]
fn test_command_set_color_named() {
    let mut h = EditorHarness::new();
    let resp = execute_json(&mut h, r#"{"command": "set_color", "color": "snow"}"#).unwrap();
    assert!(resp.success);
    assert_eq!(h.editor.store().color().to_rgb8(), [0xff, 0xfa, 0xfa]);
}

#[test]
fn test_command_toggle_arctic_roundtrip() {
    let mut h = EditorHarness::new();
    h.place_ground(1, 1).unwrap();

    let resp = execute_json(&mut h, r#"{"command": "toggle_arctic_mode"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["arctic"], true);
    assert!(h.is_arctic());

    let resp = execute_json(&mut h, r#"{"command": "toggle_arctic_mode"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["arctic"], false);
    assert!(!h.is_arctic());
}

#[test]
fn test_command_export_mesh_counts() {
    let mut h = EditorHarness::new();
    h.place_ground(3, 3).unwrap();
    h.place(3, 3, 1).unwrap();

    let resp = execute_json(&mut h, r#"{"command": "export_mesh"}"#).unwrap();
    let data = resp.data.unwrap();
    assert_eq!(data["voxels"], 2);
    let obj = data["obj"].as_str().unwrap();
    assert_eq!(obj.lines().filter(|l| l.starts_with("v ")).count(), 16);
    assert_eq!(obj.lines().filter(|l| l.starts_with("f ")).count(), 24);
}

#[test]
fn test_command_export_mesh_ignores_arctic_mode() {
    let mut h = EditorHarness::new();
    h.place_ground(3, 3).unwrap();
    h.toggle_arctic();

    // export always uses per-voxel geometry, never the merged surface
    let resp = execute_json(&mut h, r#"{"command": "export_mesh"}"#).unwrap();
    let obj_data = resp.data.unwrap();
    let obj = obj_data["obj"].as_str().unwrap();
    assert_eq!(obj.lines().filter(|l| l.starts_with("v ")).count(), 8);
    assert_eq!(obj.lines().filter(|l| l.starts_with("f ")).count(), 12);
}

#[test]
fn test_command_export_image_is_valid_png() {
    let mut h = EditorHarness::new();
    let resp = execute_json(&mut h, r#"{"command": "export_image"}"#).unwrap();
    assert!(resp.success);
    let data = resp.data.unwrap();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(data["png_base64"].as_str().unwrap())
        .unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!(decoded.width(), data["width"].as_u64().unwrap() as u32);
}

#[test]
fn test_command_invalid_color_reports_error() {
    let mut h = EditorHarness::new();
    let resp = execute_json(&mut h, r##"{"command": "set_color", "color": "#zzzzzz"}"##).unwrap();
    assert!(!resp.success);
    assert!(resp.error.is_some());
}

#[test]
fn test_command_unknown_is_parse_error() {
    let mut h = EditorHarness::new();
    assert!(execute_json(&mut h, r#"{"command": "explode"}"#).is_err());
}

#[test]
fn test_command_batch_workflow() {
    let mut h = EditorHarness::new();
    h.place_ground(1, 1).unwrap();
    h.place_ground(2, 2).unwrap();

    let json = r#"[
        {"command": "set_color", "color": "white"},
        {"command": "toggle_arctic_mode"},
        {"command": "export_mesh"},
        {"command": "inspect"}
    ]"#;
    let responses = execute_json_batch(&mut h, json).unwrap();
    assert_eq!(responses.len(), 4);
    for resp in &responses {
        assert!(resp.success, "Failed: {:?}", resp.error);
    }

    let inspect = responses[3].data.as_ref().unwrap();
    assert_eq!(inspect["mode"], "arctic");
    assert_eq!(inspect["voxel_count"], 2);
}
