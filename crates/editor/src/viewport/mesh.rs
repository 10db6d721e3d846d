//! CPU-side mesh construction: voxel boxes, the merged arctic surface,
//! grid wires, and the placement preview wireframe.

use glam::Vec3;

use crate::grid::Grid;

/// Vertical extent of one placed cell.
pub const CELL_HEIGHT: f32 = 0.5;

/// CPU-side mesh data: interleaved [pos.x, pos.y, pos.z, norm.x, norm.y, norm.z, r, g, b]
#[derive(Clone, Default, Debug)]
pub struct MeshData {
    /// 9 floats per vertex: position(3) + normal(3) + color(3)
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 9
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn position(&self, vertex: usize) -> Vec3 {
        let base = vertex * 9;
        Vec3::new(
            self.vertices[base],
            self.vertices[base + 1],
            self.vertices[base + 2],
        )
    }

    /// Overwrite the color channel of every vertex in place.
    pub fn repaint(&mut self, color: [f32; 3]) {
        let count = self.vertex_count();
        for v in 0..count {
            let base = v * 9;
            self.vertices[base + 6] = color[0];
            self.vertices[base + 7] = color[1];
            self.vertices[base + 8] = color[2];
        }
    }
}

/// Lines mesh: interleaved [pos.x, pos.y, pos.z, r, g, b, a]
#[derive(Clone, Default)]
pub struct LineMeshData {
    /// 7 floats per vertex: position(3) + color(4)
    pub vertices: Vec<f32>,
}

impl LineMeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 7
    }
}

// ── Voxel box ────────────────────────────────────────────────

/// Triangle table for the 8-corner box, matching the vertex layout laid
/// down by [`voxel_box`]: bottom ring 0..4, top ring 4..8.
const BOX_INDICES: [u32; 36] = [
    // bottom
    0, 1, 2, 0, 2, 3, //
    // top
    4, 6, 5, 4, 7, 6, //
    // sides
    0, 4, 1, 1, 4, 5, //
    1, 5, 2, 2, 5, 6, //
    2, 6, 3, 3, 6, 7, //
    3, 7, 0, 0, 7, 4,
];

/// Build one cell's box geometry in coordinates local to its base center.
///
/// `corners` are the bounding cell's four anchor positions in the ground
/// plane, `center` the cell center the voxel is keyed to. 8 shared
/// vertices, 12 triangles, vertex normals averaged across incident faces.
pub fn voxel_box(corners: &[Vec3; 4], center: Vec3, color: [f32; 3]) -> MeshData {
    // ring order: (i,j), (i,j+1), (i+1,j+1), (i+1,j)
    let ring = [corners[0], corners[1], corners[3], corners[2]];

    let mut vertices = Vec::with_capacity(8 * 9);
    for y in [0.0, CELL_HEIGHT] {
        for p in &ring {
            let local = Vec3::new(p.x - center.x, y, p.z - center.z);
            vertices.extend_from_slice(&[
                local.x, local.y, local.z, 0.0, 0.0, 0.0, color[0], color[1], color[2],
            ]);
        }
    }

    let mut mesh = MeshData {
        vertices,
        indices: BOX_INDICES.to_vec(),
    };
    compute_vertex_normals(&mut mesh);
    mesh
}

/// Recompute averaged vertex normals from the triangle list.
pub fn compute_vertex_normals(mesh: &mut MeshData) {
    let count = mesh.vertex_count();
    let mut accum = vec![Vec3::ZERO; count];

    for tri in mesh.indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let v0 = mesh.position(i0);
        let v1 = mesh.position(i1);
        let v2 = mesh.position(i2);
        let face = (v1 - v0).cross(v2 - v0);
        accum[i0] += face;
        accum[i1] += face;
        accum[i2] += face;
    }

    for (v, n) in accum.iter().enumerate() {
        let n = n.normalize_or_zero();
        let base = v * 9;
        mesh.vertices[base + 3] = n.x;
        mesh.vertices[base + 4] = n.y;
        mesh.vertices[base + 5] = n.z;
    }
}

/// Concatenate meshes into one buffer, translating each part's vertices by
/// its world offset and shifting indices by the running vertex count.
/// Normals are recomputed for the combined buffer afterwards.
pub fn merge_translated<'a, I>(parts: I) -> MeshData
where
    I: IntoIterator<Item = (&'a MeshData, Vec3)>,
{
    let mut merged = MeshData::default();
    let mut offset: u32 = 0;

    for (part, world) in parts {
        for v in 0..part.vertex_count() {
            let base = v * 9;
            let p = part.position(v) + world;
            merged.vertices.extend_from_slice(&[
                p.x,
                p.y,
                p.z,
                0.0,
                0.0,
                0.0,
                part.vertices[base + 6],
                part.vertices[base + 7],
                part.vertices[base + 8],
            ]);
        }
        merged
            .indices
            .extend(part.indices.iter().map(|&i| i + offset));
        offset += part.vertex_count() as u32;
    }

    compute_vertex_normals(&mut merged);
    merged
}

// ── Grid wires and preview ───────────────────────────────────

const GRID_LINE_COLOR: [f32; 3] = [0.53, 0.53, 0.53];
const GRID_POINT_COLOR: [f32; 4] = [0.08, 0.38, 0.54, 1.0];
const PREVIEW_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.5];

/// Wire lines connecting every axis-adjacent pair of anchor points.
pub fn grid_lines(grid: &Grid, opacity: f32) -> LineMeshData {
    let color = [
        GRID_LINE_COLOR[0],
        GRID_LINE_COLOR[1],
        GRID_LINE_COLOR[2],
        opacity,
    ];
    let mut vertices = Vec::with_capacity(grid.edges().len() * 2 * 7);
    for &(a, b) in grid.edges() {
        let pa = grid.points()[a].position;
        let pb = grid.points()[b].position;
        push_line_vert(&mut vertices, pa, color);
        push_line_vert(&mut vertices, pb, color);
    }
    LineMeshData { vertices }
}

/// Anchor-point markers, one vertex per point (drawn as point sprites).
pub fn grid_points(grid: &Grid) -> LineMeshData {
    let mut vertices = Vec::with_capacity(grid.points().len() * 7);
    for p in grid.points() {
        push_line_vert(&mut vertices, p.position, GRID_POINT_COLOR);
    }
    LineMeshData { vertices }
}

/// Half-opacity wireframe box outlining where the next placement would
/// land. Recomputed per pointer move, never stored.
pub fn preview_wireframe(corners: &[Vec3; 4], base: Vec3) -> LineMeshData {
    let ring = [corners[0], corners[1], corners[3], corners[2]];
    let bottom: Vec<Vec3> = ring
        .iter()
        .map(|p| Vec3::new(p.x, base.y, p.z))
        .collect();
    let top: Vec<Vec3> = ring
        .iter()
        .map(|p| Vec3::new(p.x, base.y + CELL_HEIGHT, p.z))
        .collect();

    let mut vertices = Vec::with_capacity(24 * 7);
    for k in 0..4 {
        let next = (k + 1) % 4;
        // bottom edge
        push_line_vert(&mut vertices, bottom[k], PREVIEW_COLOR);
        push_line_vert(&mut vertices, bottom[next], PREVIEW_COLOR);
        // top edge
        push_line_vert(&mut vertices, top[k], PREVIEW_COLOR);
        push_line_vert(&mut vertices, top[next], PREVIEW_COLOR);
        // vertical edge
        push_line_vert(&mut vertices, bottom[k], PREVIEW_COLOR);
        push_line_vert(&mut vertices, top[k], PREVIEW_COLOR);
    }
    LineMeshData { vertices }
}

fn push_line_vert(v: &mut Vec<f32>, p: Vec3, c: [f32; 4]) {
    v.extend_from_slice(&[p.x, p.y, p.z, c[0], c[1], c[2], c[3]]);
}
