//! Headless editor harness for programmatic manipulation.
//!
//! Drives the editor without a window: integration tests and the host
//! command dispatcher go through here. The GUI pushes frame captures into
//! the harness right after painting so image export stays meaningful even
//! though the render target lives elsewhere.

use shared::{GridConfig, VoxelRecord};

use crate::editor::Editor;
use crate::export::{self, FrameCapture};
use crate::store::{PlaceError, VoxelKey};
use crate::viewport::picking::Ray;

/// Fallback canvas size used when an image export is requested before any
/// frame was captured.
const FALLBACK_CANVAS: (u32, u32) = (800, 600);

pub struct EditorHarness {
    pub editor: Editor,
    last_frame: Option<FrameCapture>,
    background: [u8; 3],
}

impl EditorHarness {
    /// Create a harness over a default-sized grid.
    pub fn new() -> Self {
        Self::with_grid(GridConfig::default())
    }

    pub fn with_grid(config: GridConfig) -> Self {
        Self {
            editor: Editor::new(config),
            last_frame: None,
            background: [240, 240, 240],
        }
    }

    // ── Placement ─────────────────────────────────────────────

    /// Place at an explicit cell and level.
    pub fn place(&mut self, x: i32, z: i32, level: i32) -> Result<(), PlaceError> {
        self.editor.place_direct(x, z, level)
    }

    /// Place at ground level.
    pub fn place_ground(&mut self, x: i32, z: i32) -> Result<(), PlaceError> {
        self.place(x, z, 0)
    }

    /// Remove the cell at an explicit position; false when absent.
    pub fn remove(&mut self, x: i32, z: i32, level: i32) -> bool {
        self.editor.remove_key(VoxelKey::new(x, z, level))
    }

    /// Run the pointer placement path with a caller-supplied ray.
    pub fn place_by_ray(&mut self, ray: &Ray) -> bool {
        self.editor.place_at(ray)
    }

    /// Run the pointer removal path with a caller-supplied ray.
    pub fn remove_by_ray(&mut self, ray: &Ray) -> bool {
        self.editor.remove_at(ray)
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn voxel_count(&self) -> usize {
        self.editor.store().len()
    }

    pub fn is_occupied(&self, x: i32, z: i32, level: i32) -> bool {
        self.editor.store().contains(VoxelKey::new(x, z, level))
    }

    pub fn records(&self) -> Vec<VoxelRecord> {
        self.editor.store().records()
    }

    /// Vertex count of the merged arctic surface (0 outside arctic mode
    /// or with an empty store).
    pub fn unified_vertex_count(&self) -> usize {
        self.editor
            .unified_mesh()
            .map(|m| m.vertex_count())
            .unwrap_or(0)
    }

    // ── Commands ──────────────────────────────────────────────

    pub fn clear(&mut self) {
        self.editor.clear();
    }

    /// Set the global color from a CSS-style string.
    pub fn set_color(&mut self, color: &str) -> Result<(), String> {
        let color = color
            .parse()
            .map_err(|e| format!("invalid color: {e}"))?;
        self.editor.set_color(color);
        Ok(())
    }

    pub fn toggle_arctic(&mut self) -> bool {
        self.editor.toggle_arctic()
    }

    pub fn is_arctic(&self) -> bool {
        self.editor.is_arctic()
    }

    // ── Export ────────────────────────────────────────────────

    pub fn export_obj(&self) -> String {
        self.editor.export_obj()
    }

    /// Record the pixels of the frame that just finished rendering.
    pub fn set_frame(&mut self, frame: FrameCapture) {
        self.last_frame = Some(frame);
    }

    pub fn last_frame(&self) -> Option<&FrameCapture> {
        self.last_frame.as_ref()
    }

    /// PNG bytes of the most recent capture, or of an empty
    /// background-colored canvas when nothing was ever rendered.
    pub fn export_image(&self) -> (Vec<u8>, u32, u32) {
        let frame = match &self.last_frame {
            Some(frame) => frame.clone(),
            None => export::blank_canvas(FALLBACK_CANVAS.0, FALLBACK_CANVAS.1, self.background),
        };
        (export::encode_png(&frame), frame.width, frame.height)
    }
}

impl Default for EditorHarness {
    fn default() -> Self {
        Self::new()
    }
}
