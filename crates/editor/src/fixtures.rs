//! Factory functions for test data: rays, placement targets, frames.

use glam::Vec3;

use crate::export::FrameCapture;
use crate::grid::Grid;
use crate::store::VoxelKey;
use crate::viewport::mesh::CELL_HEIGHT;
use crate::viewport::picking::{PlacementTarget, Ray};

/// A straight-down ray entering well above the scene at `(x, z)`.
pub fn ray_down_at(x: f32, z: f32) -> Ray {
    Ray {
        origin: Vec3::new(x, 20.0, z),
        direction: Vec3::NEG_Y,
    }
}

/// A straight-down ray through the center of cell `(i, j)`.
pub fn ray_down_cell(grid: &Grid, i: usize, j: usize) -> Ray {
    let c = grid.cell_center(i, j);
    ray_down_at(c.x, c.z)
}

/// A placement target for cell `(i, j)` at the given vertical level,
/// bypassing ray casting. The cell must lie inside the lattice interior.
pub fn target_at(grid: &Grid, i: usize, j: usize, level: i32) -> PlacementTarget {
    let center = grid.cell_center(i, j);
    PlacementTarget {
        key: VoxelKey::new(i as i32, j as i32, level),
        position: center + Vec3::Y * (level as f32 * CELL_HEIGHT),
        corners: grid.cell_corners(i, j),
    }
}

/// A solid-color RGBA frame, stand-in for a render-target readback.
pub fn solid_frame(width: u32, height: u32, rgb: [u8; 3]) -> FrameCapture {
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
        rgba.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 0xff]);
    }
    FrameCapture {
        width,
        height,
        rgba,
    }
}
