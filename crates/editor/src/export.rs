//! Artifact serialization: Wavefront OBJ text and PNG frame captures.

use crate::store::VoxelStore;

/// RGBA pixels read back from the render target right after a paint.
#[derive(Clone)]
pub struct FrameCapture {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8, top row first.
    pub rgba: Vec<u8>,
}

/// Serialize every stored cell as Wavefront OBJ text.
///
/// Per-voxel geometry is always used, never the merged arctic surface, so
/// downstream tools see cube-accurate topology. `v` lines carry world-space
/// positions; `f` lines use 1-based indices running globally across voxels
/// in store iteration order. No materials or texture coordinates.
pub fn write_obj(store: &VoxelStore) -> String {
    let mut out = String::new();
    out.push_str("# isovox mesh export\n");
    out.push_str(&format!("# voxels: {}\n", store.len()));

    let mut offset: u32 = 0;
    for voxel in store.iter() {
        for v in 0..voxel.mesh.vertex_count() {
            let p = voxel.mesh.position(v) + voxel.world_position;
            out.push_str(&format!("v {} {} {}\n", p.x, p.y, p.z));
        }
        for tri in voxel.mesh.indices.chunks_exact(3) {
            out.push_str(&format!(
                "f {} {} {}\n",
                offset + tri[0] + 1,
                offset + tri[1] + 1,
                offset + tri[2] + 1,
            ));
        }
        offset += voxel.mesh.vertex_count() as u32;
    }

    out
}

/// Encode a frame capture as PNG bytes.
pub fn encode_png(frame: &FrameCapture) -> Vec<u8> {
    let mut png = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png);
    use image::ImageEncoder;
    if let Err(e) = encoder.write_image(
        &frame.rgba,
        frame.width,
        frame.height,
        image::ExtendedColorType::Rgba8,
    ) {
        tracing::error!("PNG encoding failed: {e}");
        return Vec::new();
    }
    png
}

/// A capture of an empty canvas in the given background color, used when
/// an image export is requested before any frame was rendered.
pub fn blank_canvas(width: u32, height: u32, background: [u8; 3]) -> FrameCapture {
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
        rgba.extend_from_slice(&[background[0], background[1], background[2], 0xff]);
    }
    FrameCapture {
        width,
        height,
        rgba,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::target_at;
    use crate::grid::Grid;
    use crate::store::VoxelStore;
    use shared::GridConfig;

    fn count_lines(obj: &str, prefix: &str) -> usize {
        obj.lines().filter(|l| l.starts_with(prefix)).count()
    }

    #[test]
    fn test_empty_store_yields_geometry_free_obj() {
        let store = VoxelStore::new();
        let obj = write_obj(&store);
        assert_eq!(count_lines(&obj, "v "), 0);
        assert_eq!(count_lines(&obj, "f "), 0);
        assert!(obj.starts_with('#'));
    }

    #[test]
    fn test_single_voxel_obj_shape() {
        let grid = Grid::new(GridConfig::default());
        let mut store = VoxelStore::new();
        store.place(&target_at(&grid, 3, 3, 0)).unwrap();

        let obj = write_obj(&store);
        assert_eq!(count_lines(&obj, "v "), 8);
        assert_eq!(count_lines(&obj, "f "), 12);
    }

    #[test]
    fn test_indices_are_one_based_and_in_range() {
        let grid = Grid::new(GridConfig::default());
        let mut store = VoxelStore::new();
        store.place(&target_at(&grid, 1, 1, 0)).unwrap();
        store.place(&target_at(&grid, 1, 1, 1)).unwrap();
        store.place(&target_at(&grid, 4, 4, 0)).unwrap();

        let obj = write_obj(&store);
        let mut max_index = 0u32;
        for line in obj.lines().filter(|l| l.starts_with("f ")) {
            for idx in line.split_whitespace().skip(1) {
                let i: u32 = idx.parse().unwrap();
                assert!(i >= 1 && i <= 24, "index {i} out of range");
                max_index = max_index.max(i);
            }
        }
        assert_eq!(max_index, 24);
    }

    #[test]
    fn test_obj_vertices_are_world_space() {
        let grid = Grid::new(GridConfig::default());
        let mut store = VoxelStore::new();
        let target = target_at(&grid, 3, 3, 1);
        store.place(&target_at(&grid, 3, 3, 0)).unwrap();
        store.place(&target).unwrap();

        let obj = write_obj(&store);
        // the level-1 voxel's top vertices reach a full unit
        let has_unit_top = obj
            .lines()
            .filter(|l| l.starts_with("v "))
            .any(|l| l.split_whitespace().nth(2) == Some("1"));
        assert!(has_unit_top, "expected a vertex at y=1 in:\n{obj}");
    }

    #[test]
    fn test_png_roundtrip_dimensions() {
        let frame = blank_canvas(16, 9, [240, 240, 240]);
        let png = encode_png(&frame);
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), 16);
        assert_eq!(decoded.height(), 9);
    }
}
