//! Ground lattice of anchor points and connecting wire lines.
//!
//! The grid is immutable once built; changing the size or spacing means
//! rebuilding it wholesale (which also invalidates everything keyed to it).

use glam::Vec3;
use shared::GridConfig;

/// An anchor point of the ground lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub i: usize,
    pub j: usize,
    pub position: Vec3,
}

/// The fixed ground lattice: `size x size` anchor points centered at the
/// origin, plus every axis-adjacent edge between them.
pub struct Grid {
    size: usize,
    spacing: f32,
    points: Vec<GridPoint>,
    /// Point-index pairs, one per wire line.
    edges: Vec<(usize, usize)>,
}

impl Grid {
    pub fn new(config: GridConfig) -> Self {
        let GridConfig { size, spacing } = config;
        debug_assert!(size >= 2, "grid needs at least 2 points per side");
        debug_assert!(spacing > 0.0, "grid spacing must be positive");

        let half = (size - 1) as f32 * spacing / 2.0;

        let mut points = Vec::with_capacity(size * size);
        for i in 0..size {
            for j in 0..size {
                points.push(GridPoint {
                    i,
                    j,
                    // y stays 0 so every anchor lies in the ground plane
                    position: Vec3::new(
                        i as f32 * spacing - half,
                        0.0,
                        j as f32 * spacing - half,
                    ),
                });
            }
        }

        // (size-1)*size edges along each axis
        let mut edges = Vec::with_capacity(2 * (size - 1) * size);
        for i in 0..size {
            for j in 0..size - 1 {
                edges.push((i * size + j, i * size + j + 1));
            }
        }
        for i in 0..size - 1 {
            for j in 0..size {
                edges.push((i * size + j, (i + 1) * size + j));
            }
        }

        Self {
            size,
            spacing,
            points,
            edges,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    pub fn config(&self) -> GridConfig {
        GridConfig {
            size: self.size,
            spacing: self.spacing,
        }
    }

    /// Distance from the lattice center to the outermost points.
    pub fn half_extent(&self) -> f32 {
        (self.size - 1) as f32 * self.spacing / 2.0
    }

    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn point(&self, i: usize, j: usize) -> &GridPoint {
        &self.points[i * self.size + j]
    }

    /// Whether `(i, j)` indexes a cell in the lattice interior.
    pub fn cell_in_bounds(&self, i: i32, j: i32) -> bool {
        i >= 0 && j >= 0 && (i as usize) < self.size - 1 && (j as usize) < self.size - 1
    }

    /// The four anchor points bounding cell `(i, j)`:
    /// `(i,j), (i,j+1), (i+1,j), (i+1,j+1)`.
    pub fn cell_corners(&self, i: usize, j: usize) -> [Vec3; 4] {
        [
            self.point(i, j).position,
            self.point(i, j + 1).position,
            self.point(i + 1, j).position,
            self.point(i + 1, j + 1).position,
        ]
    }

    /// Center of cell `(i, j)` in the ground plane.
    pub fn cell_center(&self, i: usize, j: usize) -> Vec3 {
        let [p1, p2, p3, p4] = self.cell_corners(i, j);
        (p1 + p2 + p3 + p4) / 4.0
    }

    /// Map a world-space ground position to the cell containing it.
    ///
    /// Nearest-cell rounding with the lattice's half-extent offset; `None`
    /// when the position falls outside the lattice interior.
    pub fn cell_at(&self, x: f32, z: f32) -> Option<(usize, usize)> {
        let half = self.half_extent();
        let ci = ((x + half) / self.spacing).floor() as i32;
        let cj = ((z + half) / self.spacing).floor() as i32;
        if self.cell_in_bounds(ci, cj) {
            Some((ci as usize, cj as usize))
        } else {
            None
        }
    }
}
