//! The editor context: one object owning the grid, the voxel store, the
//! presentation mode, and the camera, mutated only from the host's event
//! thread. Replaces the scene-graph globals the original leaned on.

use glam::Vec3;
use shared::{Color, GridConfig};

use crate::export;
use crate::grid::Grid;
use crate::store::{PlaceError, VoxelKey, VoxelStore};
use crate::viewport::camera::ArcBallCamera;
use crate::viewport::mesh::{self, MeshData, CELL_HEIGHT};
use crate::viewport::picking::{self, PlacementTarget, Ray};

/// Two-state presentation flag. `Arctic` replaces individual cells with
/// one merged surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentationMode {
    #[default]
    Normal,
    Arctic,
}

pub struct Editor {
    grid: Grid,
    store: VoxelStore,
    mode: PresentationMode,
    pub camera: ArcBallCamera,
    preview: Option<PlacementTarget>,
    unified: Option<MeshData>,
    /// Bumped on every mutation; renderers resync when it changes.
    version: u64,
    /// Bumped only when the lattice itself is rebuilt.
    grid_version: u64,
}

impl Editor {
    pub fn new(config: GridConfig) -> Self {
        Self {
            grid: Grid::new(config),
            store: VoxelStore::new(),
            mode: PresentationMode::Normal,
            camera: ArcBallCamera::new(),
            preview: None,
            unified: None,
            version: 0,
            grid_version: 0,
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn store(&self) -> &VoxelStore {
        &self.store
    }

    pub fn mode(&self) -> PresentationMode {
        self.mode
    }

    pub fn is_arctic(&self) -> bool {
        self.mode == PresentationMode::Arctic
    }

    pub fn preview(&self) -> Option<&PlacementTarget> {
        self.preview.as_ref()
    }

    /// The merged arctic surface, present only while in arctic mode with a
    /// non-empty store.
    pub fn unified_mesh(&self) -> Option<&MeshData> {
        self.unified.as_ref()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn grid_version(&self) -> u64 {
        self.grid_version
    }

    // ── Grid lifecycle ────────────────────────────────────────

    /// Rebuild the lattice. Every placed cell references anchor points
    /// that no longer exist afterwards, so the store is cleared too.
    pub fn rebuild_grid(&mut self, config: GridConfig) {
        tracing::info!(size = config.size, spacing = config.spacing, "rebuilding grid");
        self.grid = Grid::new(config);
        self.store.clear();
        self.mode = PresentationMode::Normal;
        self.unified = None;
        self.preview = None;
        self.grid_version += 1;
        self.version += 1;
    }

    // ── Pointer path ──────────────────────────────────────────

    /// Recompute the preview target from the current pointer ray. Hidden
    /// while arctic mode is active.
    pub fn update_preview(&mut self, ray: &Ray) {
        self.preview = if self.is_arctic() {
            None
        } else {
            picking::pick_target(ray, &self.grid, &self.store)
        };
    }

    pub fn clear_preview(&mut self) {
        self.preview = None;
    }

    /// Primary pointer action: place a cell at the ray's target, if any.
    /// Failures stay silent; continuous pointer input must not surface
    /// errors.
    pub fn place_at(&mut self, ray: &Ray) -> bool {
        let Some(target) = picking::pick_target(ray, &self.grid, &self.store) else {
            return false;
        };
        match self.commit_place(&target) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("placement refused: {e}");
                false
            }
        }
    }

    /// Secondary pointer action: remove the struck cell, ignoring ground.
    pub fn remove_at(&mut self, ray: &Ray) -> bool {
        let Some(hit) = picking::pick_voxel(ray, &self.store) else {
            return false;
        };
        self.remove_key(hit.key)
    }

    // ── Direct mutation (command surface, tests) ──────────────

    /// Place at an explicit cell and level, bypassing ray casting.
    pub fn place_direct(&mut self, x: i32, z: i32, level: i32) -> Result<(), PlaceError> {
        let key = VoxelKey::new(x, z, level);
        if !self.grid.cell_in_bounds(x, z) || level < 0 {
            return Err(PlaceError::OutOfBounds(key));
        }
        let (i, j) = (x as usize, z as usize);
        let target = PlacementTarget {
            key,
            position: self.grid.cell_center(i, j) + Vec3::Y * (level as f32 * CELL_HEIGHT),
            corners: self.grid.cell_corners(i, j),
        };
        self.commit_place(&target)
    }

    pub fn remove_key(&mut self, key: VoxelKey) -> bool {
        if !self.store.remove(key) {
            return false;
        }
        if self.is_arctic() {
            self.rebuild_unified();
        }
        self.version += 1;
        true
    }

    fn commit_place(&mut self, target: &PlacementTarget) -> Result<(), PlaceError> {
        self.store.place(target)?;
        if self.is_arctic() {
            // the merged surface replaces individual cells for now
            self.store.set_visible(target.key, false);
            self.rebuild_unified();
        }
        self.preview = None;
        self.version += 1;
        Ok(())
    }

    // ── Commands ──────────────────────────────────────────────

    pub fn clear(&mut self) {
        self.store.clear();
        if self.is_arctic() {
            // nothing left to unify
            self.mode = PresentationMode::Normal;
            self.unified = None;
        }
        self.preview = None;
        self.version += 1;
    }

    pub fn set_color(&mut self, color: Color) {
        self.store.set_color(color);
        if self.is_arctic() {
            self.rebuild_unified();
        }
        self.version += 1;
    }

    /// Flip the presentation mode; returns the new state.
    pub fn toggle_arctic(&mut self) -> bool {
        match self.mode {
            PresentationMode::Normal => {
                self.mode = PresentationMode::Arctic;
                self.rebuild_unified();
                self.store.set_all_visible(false);
                self.preview = None;
            }
            PresentationMode::Arctic => {
                self.mode = PresentationMode::Normal;
                self.unified = None;
                self.store.set_all_visible(true);
            }
        }
        self.version += 1;
        self.is_arctic()
    }

    fn rebuild_unified(&mut self) {
        self.unified = if self.store.is_empty() {
            None
        } else {
            Some(mesh::merge_translated(
                self.store.iter().map(|v| (&v.mesh, v.world_position)),
            ))
        };
    }

    // ── Export ────────────────────────────────────────────────

    pub fn export_obj(&self) -> String {
        export::write_obj(&self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::ray_down_cell;

    fn editor() -> Editor {
        Editor::new(GridConfig::default())
    }

    #[test]
    fn test_place_and_remove_via_rays() {
        let mut ed = editor();
        let ray = ray_down_cell(ed.grid(), 3, 3);
        assert!(ed.place_at(&ray));
        assert_eq!(ed.store().len(), 1);

        let ray = ray_down_cell(ed.grid(), 3, 3);
        assert!(ed.remove_at(&ray));
        assert!(ed.store().is_empty());
    }

    #[test]
    fn test_repeated_placement_stacks() {
        let mut ed = editor();
        for expected_level in 0..4 {
            let ray = ray_down_cell(ed.grid(), 5, 5);
            assert!(ed.place_at(&ray));
            assert!(ed
                .store()
                .contains(VoxelKey::new(5, 5, expected_level)));
        }
        assert_eq!(ed.store().len(), 4);
    }

    #[test]
    fn test_place_direct_validates_bounds() {
        let mut ed = editor();
        assert!(matches!(
            ed.place_direct(40, 2, 0),
            Err(PlaceError::OutOfBounds(_))
        ));
        assert!(matches!(
            ed.place_direct(-1, 0, 0),
            Err(PlaceError::OutOfBounds(_))
        ));
        assert!(ed.place_direct(8, 8, 0).is_ok());
    }

    #[test]
    fn test_skipping_a_level_is_rejected() {
        let mut ed = editor();
        ed.place_direct(5, 5, 0).unwrap();
        ed.place_direct(5, 5, 1).unwrap();
        assert!(matches!(
            ed.place_direct(5, 5, 3),
            Err(PlaceError::Unsupported(_))
        ));
        ed.place_direct(5, 5, 2).unwrap();
        ed.place_direct(5, 5, 3).unwrap();
        assert_eq!(ed.store().len(), 4);
    }

    #[test]
    fn test_preview_follows_ray_and_hides_in_arctic() {
        let mut ed = editor();
        let ray = ray_down_cell(ed.grid(), 2, 2);
        ed.update_preview(&ray);
        assert_eq!(ed.preview().unwrap().key, VoxelKey::new(2, 2, 0));

        ed.place_direct(0, 0, 0).unwrap();
        ed.toggle_arctic();
        let ray = ray_down_cell(ed.grid(), 2, 2);
        ed.update_preview(&ray);
        assert!(ed.preview().is_none());
    }

    #[test]
    fn test_arctic_toggle_roundtrip() {
        let mut ed = editor();
        for (i, j) in [(1, 1), (2, 2), (3, 3), (4, 4), (5, 5)] {
            ed.place_direct(i, j, 0).unwrap();
        }

        assert!(ed.toggle_arctic());
        let unified = ed.unified_mesh().unwrap();
        assert_eq!(unified.vertex_count(), 5 * 8);
        assert!(ed.store().iter().all(|v| !v.visible));

        assert!(!ed.toggle_arctic());
        assert!(ed.unified_mesh().is_none());
        assert!(ed.store().iter().all(|v| v.visible));
        assert_eq!(ed.store().len(), 5);
    }

    #[test]
    fn test_arctic_on_empty_store_still_flips() {
        let mut ed = editor();
        assert!(ed.toggle_arctic());
        assert!(ed.unified_mesh().is_none());
        assert!(!ed.toggle_arctic());
    }

    #[test]
    fn test_placement_in_arctic_mode_stays_hidden_and_remerges() {
        let mut ed = editor();
        ed.place_direct(1, 1, 0).unwrap();
        ed.toggle_arctic();
        assert_eq!(ed.unified_mesh().unwrap().vertex_count(), 8);

        ed.place_direct(2, 2, 0).unwrap();
        let v = ed.store().get(VoxelKey::new(2, 2, 0)).unwrap();
        assert!(!v.visible);
        assert_eq!(ed.unified_mesh().unwrap().vertex_count(), 16);
    }

    #[test]
    fn test_clear_exits_arctic() {
        let mut ed = editor();
        ed.place_direct(1, 1, 0).unwrap();
        ed.toggle_arctic();
        ed.clear();
        assert!(!ed.is_arctic());
        assert!(ed.store().is_empty());
        assert!(ed.unified_mesh().is_none());
    }

    #[test]
    fn test_rebuild_grid_resets_everything() {
        let mut ed = editor();
        ed.place_direct(3, 3, 0).unwrap();
        let v0 = ed.grid_version();
        ed.rebuild_grid(GridConfig {
            size: 6,
            spacing: 1.0,
        });
        assert!(ed.store().is_empty());
        assert_eq!(ed.grid().size(), 6);
        assert_eq!(ed.grid_version(), v0 + 1);
    }

    #[test]
    fn test_version_bumps_on_mutation() {
        let mut ed = editor();
        let v0 = ed.version();
        ed.place_direct(1, 1, 0).unwrap();
        let v1 = ed.version();
        assert!(v1 > v0);
        ed.set_color("red".parse().unwrap());
        assert!(ed.version() > v1);
    }
}
