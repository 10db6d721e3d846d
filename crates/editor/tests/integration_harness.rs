//! Integration tests for EditorHarness.
//!
//! Tests the headless harness API: placement, stacking, removal, arctic
//! mode, and the pointer picking path.

use isovox_editor_lib::fixtures::{ray_down_at, ray_down_cell};
use isovox_editor_lib::harness::EditorHarness;
use isovox_editor_lib::store::PlaceError;
use shared::GridConfig;

#[test]
fn test_harness_place_and_count() {
    let mut h = EditorHarness::new();
    h.place_ground(3, 3).unwrap();
    h.place_ground(4, 4).unwrap();

    assert_eq!(h.voxel_count(), 2);
    assert!(h.is_occupied(3, 3, 0));
    assert!(h.is_occupied(4, 4, 0));
}

#[test]
fn test_placement_idempotent_under_occupancy() {
    let mut h = EditorHarness::new();
    h.place_ground(3, 3).unwrap();

    let err = h.place_ground(3, 3).unwrap_err();
    assert!(matches!(err, PlaceError::Occupied(_)));
    assert_eq!(h.voxel_count(), 1);
}

#[test]
fn test_stacking_invariant_over_height_sequences() {
    let mut h = EditorHarness::new();

    // contiguous stacks succeed for any height
    for level in 0..6 {
        h.place(2, 2, level).unwrap();
    }
    assert_eq!(h.voxel_count(), 6);

    // any gap is rejected, for every level above the stack top
    for level in 7..10 {
        assert!(matches!(
            h.place(2, 2, level),
            Err(PlaceError::Unsupported(_))
        ));
    }
    assert_eq!(h.voxel_count(), 6);
}

#[test]
fn test_removal_is_idempotent() {
    let mut h = EditorHarness::new();
    h.place_ground(5, 5).unwrap();
    assert_eq!(h.voxel_count(), 1);

    assert!(h.remove(5, 5, 0));
    assert_eq!(h.voxel_count(), 0);
    assert!(!h.is_occupied(5, 5, 0));

    // removing again is a no-op
    assert!(!h.remove(5, 5, 0));
    assert_eq!(h.voxel_count(), 0);
}

#[test]
fn test_out_of_bounds_placement_rejected() {
    let mut h = EditorHarness::with_grid(GridConfig {
        size: 6,
        spacing: 1.0,
    });
    // interior cells are 0..size-1
    assert!(h.place_ground(4, 4).is_ok());
    assert!(matches!(
        h.place_ground(5, 5),
        Err(PlaceError::OutOfBounds(_))
    ));
    assert!(matches!(
        h.place_ground(-1, 0),
        Err(PlaceError::OutOfBounds(_))
    ));
}

#[test]
fn test_arctic_roundtrip_restores_voxels() {
    let mut h = EditorHarness::new();
    h.set_color("#aa3355").unwrap();
    for (x, z) in [(1, 1), (2, 2), (3, 3), (4, 4), (5, 5)] {
        h.place_ground(x, z).unwrap();
    }
    let before = h.records();

    assert!(h.toggle_arctic());
    // unified surface has the sum of the individual vertex counts
    assert_eq!(h.unified_vertex_count(), 5 * 8);
    assert!(h.editor.store().iter().all(|v| !v.visible));

    assert!(!h.toggle_arctic());
    assert_eq!(h.unified_vertex_count(), 0);
    assert!(h.editor.store().iter().all(|v| v.visible));
    // same cells, same colors
    assert_eq!(h.records(), before);
}

#[test]
fn test_arctic_mode_empty_store_still_toggles() {
    let mut h = EditorHarness::new();
    assert!(h.toggle_arctic());
    assert!(h.is_arctic());
    assert_eq!(h.unified_vertex_count(), 0);
    assert!(!h.toggle_arctic());
}

#[test]
fn test_clear_resets_everything() {
    let mut h = EditorHarness::new();
    h.place_ground(1, 1).unwrap();
    h.place(1, 1, 1).unwrap();
    h.toggle_arctic();

    h.clear();
    assert_eq!(h.voxel_count(), 0);
    assert!(!h.is_arctic());
}

#[test]
fn test_pointer_path_places_and_stacks() {
    let mut h = EditorHarness::new();
    let ray = ray_down_cell(h.editor.grid(), 3, 3);
    assert!(h.place_by_ray(&ray));
    assert!(h.is_occupied(3, 3, 0));

    // the same ray now strikes the placed cell and stacks on top of it
    let ray = ray_down_cell(h.editor.grid(), 3, 3);
    assert!(h.place_by_ray(&ray));
    assert!(h.is_occupied(3, 3, 1));
    assert_eq!(h.voxel_count(), 2);
}

#[test]
fn test_pointer_path_outside_lattice_is_silent() {
    let mut h = EditorHarness::new();
    let half = h.editor.grid().half_extent();
    let ray = ray_down_at(half + 5.0, half + 5.0);
    assert!(!h.place_by_ray(&ray));
    assert_eq!(h.voxel_count(), 0);
}

#[test]
fn test_pointer_removal_ignores_ground() {
    let mut h = EditorHarness::new();
    // nothing placed: removal ray hits only ground, which is not removable
    let ray = ray_down_cell(h.editor.grid(), 3, 3);
    assert!(!h.remove_by_ray(&ray));

    h.place_ground(3, 3).unwrap();
    let ray = ray_down_cell(h.editor.grid(), 3, 3);
    assert!(h.remove_by_ray(&ray));
    assert_eq!(h.voxel_count(), 0);
}

#[test]
fn test_grid_rebuild_clears_voxels() {
    let mut h = EditorHarness::new();
    h.place_ground(3, 3).unwrap();
    h.editor.rebuild_grid(GridConfig {
        size: 12,
        spacing: 1.0,
    });
    assert_eq!(h.voxel_count(), 0);
    assert_eq!(h.editor.grid().size(), 12);
    // new interior accepts placements up to index 10
    h.place_ground(10, 10).unwrap();
    assert_eq!(h.voxel_count(), 1);
}

#[test]
fn test_color_applies_to_future_and_existing() {
    let mut h = EditorHarness::new();
    h.place_ground(1, 1).unwrap();
    h.set_color("orange").unwrap();
    h.place_ground(2, 2).unwrap();

    let records = h.records();
    assert_eq!(records.len(), 2);
    // both the repainted and the new voxel carry the new color
    assert!(records
        .iter()
        .all(|r| r.color.to_rgb8() == [0xff, 0xa5, 0x00]));
}
