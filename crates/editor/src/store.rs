//! The authoritative collection of placed voxels.
//!
//! Keys are structured `(x, z, level)` triples rather than the stringly
//! keys a scene graph would tempt; occupancy, however, is still decided by
//! a tolerance distance test against stored world positions, which absorbs
//! float drift from repeated placement math.

use std::collections::HashMap;

use glam::Vec3;
use shared::{Color, VoxelRecord};
use thiserror::Error;

use crate::viewport::mesh::{self, MeshData, CELL_HEIGHT};
use crate::viewport::picking::PlacementTarget;

/// Two positions closer than this are considered the same slot.
pub const OCCUPANCY_TOLERANCE: f32 = 0.1;

/// Why a placement was refused. Pointer-driven callers swallow these
/// (the editor stays silent on a blocked click); the harness surfaces them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaceError {
    #[error("slot {0:?} is already occupied")]
    Occupied(VoxelKey),
    #[error("cell {0:?} is outside the lattice interior")]
    OutOfBounds(VoxelKey),
    #[error("no supporting cell below {0:?}")]
    Unsupported(VoxelKey),
}

/// Discrete position of a placed cell: grid cell `(x, z)` plus the
/// half-unit vertical level (`height = level * 0.5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoxelKey {
    pub x: i32,
    pub z: i32,
    pub level: i32,
}

impl VoxelKey {
    pub fn new(x: i32, z: i32, level: i32) -> Self {
        Self { x, z, level }
    }

    pub fn height(&self) -> f32 {
        self.level as f32 * CELL_HEIGHT
    }

    /// The slot directly above this one.
    pub fn above(&self) -> Self {
        Self {
            level: self.level + 1,
            ..*self
        }
    }

    /// The slot directly below, or `None` at ground level.
    pub fn below(&self) -> Option<Self> {
        (self.level > 0).then(|| Self {
            level: self.level - 1,
            ..*self
        })
    }
}

/// A placed unit cell.
#[derive(Debug)]
pub struct Voxel {
    pub key: VoxelKey,
    /// Cell-center base position in world space (y = key height).
    pub world_position: Vec3,
    /// The bounding cell's anchor positions in the ground plane.
    pub corners: [Vec3; 4],
    pub color: Color,
    /// Box geometry local to `world_position`: 8 vertices, 12 triangles.
    pub mesh: MeshData,
    /// False while arctic mode hides individual cells.
    pub visible: bool,
}

/// Key-to-voxel mapping for the whole session. Owns every voxel's
/// lifetime; iteration follows insertion order.
pub struct VoxelStore {
    voxels: HashMap<VoxelKey, Voxel>,
    order: Vec<VoxelKey>,
    color: Color,
}

impl VoxelStore {
    pub fn new() -> Self {
        Self {
            voxels: HashMap::new(),
            order: Vec::new(),
            color: Color::from_rgb8(0x46, 0x82, 0xb4),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The color applied to future placements.
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn contains(&self, key: VoxelKey) -> bool {
        self.voxels.contains_key(&key)
    }

    pub fn get(&self, key: VoxelKey) -> Option<&Voxel> {
        self.voxels.get(&key)
    }

    /// Voxels in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Voxel> {
        self.order.iter().filter_map(|k| self.voxels.get(k))
    }

    pub fn keys(&self) -> impl Iterator<Item = VoxelKey> + '_ {
        self.order.iter().copied()
    }

    /// Distance-based occupancy test (see module docs).
    pub fn occupied_near(&self, position: Vec3) -> bool {
        self.voxels
            .values()
            .any(|v| v.world_position.distance(position) < OCCUPANCY_TOLERANCE)
    }

    /// Whether `key` rests on the ground or on an existing cell.
    pub fn supported(&self, key: VoxelKey) -> bool {
        match key.below() {
            None => true,
            Some(below) => self.voxels.contains_key(&below),
        }
    }

    /// Commit a placement. Occupancy and support are re-validated here:
    /// state may have changed since the target was picked.
    pub fn place(&mut self, target: &PlacementTarget) -> Result<&Voxel, PlaceError> {
        if self.occupied_near(target.position) || self.voxels.contains_key(&target.key) {
            return Err(PlaceError::Occupied(target.key));
        }
        if !self.supported(target.key) {
            return Err(PlaceError::Unsupported(target.key));
        }

        let mesh = mesh::voxel_box(&target.corners, target.position, self.color.to_array());
        let voxel = Voxel {
            key: target.key,
            world_position: target.position,
            corners: target.corners,
            color: self.color,
            mesh,
            visible: true,
        };
        self.order.push(target.key);
        Ok(self.voxels.entry(target.key).or_insert(voxel))
    }

    /// Remove a cell. Absent keys are a silent no-op.
    pub fn remove(&mut self, key: VoxelKey) -> bool {
        if self.voxels.remove(&key).is_none() {
            return false;
        }
        self.order.retain(|k| *k != key);
        true
    }

    pub fn clear(&mut self) {
        self.voxels.clear();
        self.order.clear();
    }

    /// Set the color for future placements and repaint every stored cell.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        let rgb = color.to_array();
        for voxel in self.voxels.values_mut() {
            voxel.color = color;
            voxel.mesh.repaint(rgb);
        }
    }

    pub fn set_all_visible(&mut self, visible: bool) {
        for voxel in self.voxels.values_mut() {
            voxel.visible = visible;
        }
    }

    pub fn set_visible(&mut self, key: VoxelKey, visible: bool) {
        if let Some(voxel) = self.voxels.get_mut(&key) {
            voxel.visible = visible;
        }
    }

    /// Wire-form records in insertion order (for the inspect command).
    pub fn records(&self) -> Vec<VoxelRecord> {
        self.iter()
            .map(|v| VoxelRecord {
                x: v.key.x,
                z: v.key.z,
                level: v.key.level,
                color: v.color,
            })
            .collect()
    }
}

impl Default for VoxelStore {
    fn default() -> Self {
        Self::new()
    }
}
