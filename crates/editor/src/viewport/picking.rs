//! Ray casting: pointer rays against placed cells and the ground plane,
//! and the placement-target resolution built on top of them.

use glam::Vec3;

use crate::grid::Grid;
use crate::store::{VoxelKey, VoxelStore};
use crate::viewport::mesh::CELL_HEIGHT;

/// A ray in world space
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// A validated, currently-unoccupied position where a cell may be created.
#[derive(Debug, Clone, Copy)]
pub struct PlacementTarget {
    pub key: VoxelKey,
    /// Cell-center base position in world space (y = key height).
    pub position: Vec3,
    /// The bounding cell's anchor positions in the ground plane.
    pub corners: [Vec3; 4],
}

/// Möller-Trumbore ray-triangle intersection algorithm.
/// Returns the distance along the ray if hit, or None if no intersection.
pub fn ray_triangle_intersect(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    // Outside triangle (u)
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    // Outside triangle (v)
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    // Intersection is behind ray origin
    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}

/// Intersection with the ground plane `y = 0`, if the ray reaches it.
pub fn ray_ground_plane(ray: &Ray) -> Option<Vec3> {
    if ray.direction.y.abs() < 1e-7 {
        return None;
    }
    let t = -ray.origin.y / ray.direction.y;
    (t > 0.0).then(|| ray.origin + ray.direction * t)
}

/// A struck cell and the distance to the hit.
#[derive(Debug, Clone, Copy)]
pub struct VoxelHit {
    pub key: VoxelKey,
    pub distance: f32,
}

/// Nearest visible cell intersected by the ray, testing each cell's 12
/// triangles with vertices offset by its world position.
pub fn pick_voxel(ray: &Ray, store: &VoxelStore) -> Option<VoxelHit> {
    let mut best: Option<VoxelHit> = None;

    for voxel in store.iter() {
        if !voxel.visible {
            continue;
        }
        let mesh = &voxel.mesh;
        for tri in mesh.indices.chunks_exact(3) {
            let v0 = mesh.position(tri[0] as usize) + voxel.world_position;
            let v1 = mesh.position(tri[1] as usize) + voxel.world_position;
            let v2 = mesh.position(tri[2] as usize) + voxel.world_position;

            if let Some(dist) = ray_triangle_intersect(ray, v0, v1, v2) {
                if best.as_ref().is_none_or(|b| dist < b.distance) {
                    best = Some(VoxelHit {
                        key: voxel.key,
                        distance: dist,
                    });
                }
            }
        }
    }

    best
}

/// Resolve the pointer ray to a free placement target.
///
/// Cells take priority over the ground: a ray that strikes a cell either
/// yields the slot above it or nothing at all (a blocked stack never falls
/// through to ground placement). Ground hits map to a lattice cell and are
/// discarded outside the interior.
pub fn pick_target(ray: &Ray, grid: &Grid, store: &VoxelStore) -> Option<PlacementTarget> {
    if let Some(hit) = pick_voxel(ray, store) {
        let struck = store.get(hit.key)?;
        let position = struck.world_position + Vec3::Y * CELL_HEIGHT;
        if store.occupied_near(position) {
            return None;
        }
        return Some(PlacementTarget {
            key: hit.key.above(),
            position,
            corners: struck.corners,
        });
    }

    let point = ray_ground_plane(ray)?;
    let (ci, cj) = grid.cell_at(point.x, point.z)?;
    let position = grid.cell_center(ci, cj);
    if store.occupied_near(position) {
        return None;
    }
    Some(PlacementTarget {
        key: VoxelKey::new(ci as i32, cj as i32, 0),
        position,
        corners: grid.cell_corners(ci, cj),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{ray_down_cell, target_at};
    use shared::GridConfig;

    fn grid() -> Grid {
        Grid::new(GridConfig::default())
    }

    #[test]
    fn test_ray_triangle_hit_and_miss() {
        let ray = Ray {
            origin: Vec3::new(0.2, 1.0, 0.2),
            direction: Vec3::NEG_Y,
        };
        let hit = ray_triangle_intersect(
            &ray,
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        );
        assert!((hit.unwrap() - 1.0).abs() < 1e-5);

        let miss = ray_triangle_intersect(
            &ray,
            Vec3::new(2.0, 0.0, 2.0),
            Vec3::new(3.0, 0.0, 2.0),
            Vec3::new(2.0, 0.0, 3.0),
        );
        assert!(miss.is_none());
    }

    #[test]
    fn test_ground_plane_intersection() {
        let ray = Ray {
            origin: Vec3::new(1.0, 5.0, -2.0),
            direction: Vec3::NEG_Y,
        };
        let p = ray_ground_plane(&ray).unwrap();
        assert!((p - Vec3::new(1.0, 0.0, -2.0)).length() < 1e-5);

        let parallel = Ray {
            origin: Vec3::new(0.0, 1.0, 0.0),
            direction: Vec3::X,
        };
        assert!(ray_ground_plane(&parallel).is_none());
    }

    #[test]
    fn test_empty_grid_picks_ground_cell() {
        let g = grid();
        let store = VoxelStore::new();
        let ray = ray_down_cell(&g, 3, 3);
        let target = pick_target(&ray, &g, &store).unwrap();
        assert_eq!(target.key, VoxelKey::new(3, 3, 0));
        assert_eq!(target.position.y, 0.0);
    }

    #[test]
    fn test_ray_outside_lattice_yields_nothing() {
        let g = grid();
        let store = VoxelStore::new();
        let half = g.half_extent();
        let ray = Ray {
            origin: Vec3::new(half + 3.0, 10.0, 0.0),
            direction: Vec3::NEG_Y,
        };
        assert!(pick_target(&ray, &g, &store).is_none());
    }

    #[test]
    fn test_struck_voxel_offers_slot_above() {
        let g = grid();
        let mut store = VoxelStore::new();
        store.place(&target_at(&g, 3, 3, 0)).unwrap();

        let ray = ray_down_cell(&g, 3, 3);
        let target = pick_target(&ray, &g, &store).unwrap();
        assert_eq!(target.key, VoxelKey::new(3, 3, 1));
        assert!((target.position.y - CELL_HEIGHT).abs() < 1e-6);
    }

    #[test]
    fn test_blocked_stack_does_not_fall_through() {
        let g = grid();
        let mut store = VoxelStore::new();
        store.place(&target_at(&g, 3, 3, 0)).unwrap();
        store.place(&target_at(&g, 3, 3, 1)).unwrap();
        // hide the upper cell: the ray now strikes the lower one, whose
        // slot above is occupied -> no target, not a ground placement
        store.set_visible(VoxelKey::new(3, 3, 1), false);

        let ray = ray_down_cell(&g, 3, 3);
        assert!(pick_target(&ray, &g, &store).is_none());
    }

    #[test]
    fn test_hidden_voxels_are_not_pickable() {
        let g = grid();
        let mut store = VoxelStore::new();
        store.place(&target_at(&g, 4, 4, 0)).unwrap();
        store.set_all_visible(false);
        let ray = ray_down_cell(&g, 4, 4);
        assert!(pick_voxel(&ray, &store).is_none());
    }

    #[test]
    fn test_nearest_voxel_wins() {
        let g = grid();
        let mut store = VoxelStore::new();
        store.place(&target_at(&g, 2, 2, 0)).unwrap();
        store.place(&target_at(&g, 2, 2, 1)).unwrap();
        let ray = ray_down_cell(&g, 2, 2);
        let hit = pick_voxel(&ray, &store).unwrap();
        assert_eq!(hit.key, VoxelKey::new(2, 2, 1));
    }
}
