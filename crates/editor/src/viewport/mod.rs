//! 3D viewport panel with OpenGL rendering

mod gl_renderer;

pub use isovox_editor_lib::viewport::{camera, mesh, picking};

use std::sync::{Arc, Mutex};

use egui::Ui;

use crate::editor::Editor;
use crate::export::FrameCapture;
use crate::settings::AppSettings;
use camera::ArcBallCamera;
use gl_renderer::GlRenderer;
use mesh::MeshData;

/// Deferred pixel readback: a capture request is served inside the next
/// paint callback, right after the scene is drawn.
#[derive(Default)]
struct CaptureSlot {
    requested: bool,
    frame: Option<FrameCapture>,
}

/// 3D viewport panel with OpenGL rendering
pub struct ViewportPanel {
    gl_renderer: Option<Arc<Mutex<GlRenderer>>>,
    capture: Arc<Mutex<CaptureSlot>>,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self {
            gl_renderer: None,
            capture: Arc::new(Mutex::new(CaptureSlot::default())),
        }
    }

    /// Initialize GL renderer (must be called with a GL context)
    pub fn init_gl(&mut self, gl: &glow::Context) {
        let renderer = GlRenderer::new(gl);
        self.gl_renderer = Some(Arc::new(Mutex::new(renderer)));
    }

    /// Ask for the next painted frame's pixels.
    pub fn request_capture(&self) {
        if let Ok(mut slot) = self.capture.lock() {
            slot.requested = true;
        }
    }

    /// Take a finished capture, if one landed since the last call.
    pub fn take_capture(&self) -> Option<FrameCapture> {
        self.capture.lock().ok()?.frame.take()
    }

    pub fn show(&mut self, ui: &mut Ui, editor: &mut Editor, settings: &AppSettings) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

        // ── Camera controls ─────────────────────────────────
        if response.dragged_by(egui::PointerButton::Middle) {
            let delta = response.drag_delta();
            if ui.input(|i| i.modifiers.shift) {
                let scale = editor.camera.distance * 0.002;
                editor.camera.pan(-delta.x * scale, delta.y * scale);
            } else {
                editor.camera.rotate(delta.x * 0.4, delta.y * 0.4);
            }
        }

        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll.abs() > 0.1 {
                editor.camera.zoom(scroll * 0.01);
            }
        }

        // ── Pointer -> editor ───────────────────────────────
        if let Some(pos) = response.hover_pos() {
            let ray = editor.camera.screen_ray(pos, rect);
            editor.update_preview(&ray);

            if response.clicked() {
                editor.place_at(&ray);
            }
            if response.secondary_clicked() {
                editor.remove_at(&ray);
            }
        } else {
            editor.clear_preview();
        }

        if !ui.is_rect_visible(rect) {
            return;
        }

        self.render_gl(ui, rect, editor, settings);
        self.draw_overlays(ui, rect, editor);
    }

    fn render_gl(&self, ui: &Ui, rect: egui::Rect, editor: &Editor, settings: &AppSettings) {
        let Some(gl_renderer) = &self.gl_renderer else {
            return;
        };

        let renderer_clone = gl_renderer.clone();
        let capture_clone = self.capture.clone();

        let camera_yaw = editor.camera.yaw;
        let camera_pitch = editor.camera.pitch;
        let camera_distance = editor.camera.distance;
        let camera_target = editor.camera.target;
        let camera_fov = editor.camera.fov;

        // Per-frame clones for the 'static paint callback; the renderer
        // skips re-uploads while the versions are unchanged.
        let grid_lines = mesh::grid_lines(editor.grid(), settings.grid.opacity);
        let grid_points = mesh::grid_points(editor.grid());
        let grid_version = editor.grid_version();

        let voxels: Vec<MeshData> = editor
            .store()
            .iter()
            .filter(|v| v.visible)
            .map(|v| world_space_mesh(&v.mesh, v.world_position))
            .collect();
        let unified = editor.unified_mesh().cloned();
        let scene_version = editor.version();

        let preview = editor
            .preview()
            .map(|t| mesh::preview_wireframe(&t.corners, t.position));

        let grid_visible = settings.grid.visible && !editor.is_arctic();
        let point_size = settings.grid.point_size;
        let bg_color = if editor.is_arctic() {
            settings.viewport.arctic_background
        } else {
            settings.viewport.background_color
        };

        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(eframe::egui_glow::CallbackFn::new(move |info, painter| {
                let gl = painter.gl();

                let camera = ArcBallCamera {
                    yaw: camera_yaw,
                    pitch: camera_pitch,
                    distance: camera_distance,
                    target: camera_target,
                    fov: camera_fov,
                };

                let clip = info.clip_rect_in_pixels();
                let viewport = [
                    clip.left_px as f32,
                    clip.from_bottom_px as f32,
                    clip.width_px as f32,
                    clip.height_px as f32,
                ];

                if let Ok(mut r) = renderer_clone.lock() {
                    r.sync_grid(gl, &grid_lines, &grid_points, grid_version);
                    r.sync_scene(gl, &voxels, unified.as_ref(), scene_version);
                    r.sync_preview(gl, preview.as_ref());

                    let render_params = gl_renderer::RenderParams {
                        viewport,
                        grid_visible,
                        point_size,
                        bg_color,
                    };
                    r.paint(gl, &camera, &render_params);

                    // Serve a pending capture while the frame is still intact
                    if let Ok(mut slot) = capture_clone.lock() {
                        if slot.requested {
                            slot.frame = Some(r.capture(gl, viewport));
                            slot.requested = false;
                        }
                    }
                }
            })),
        };

        ui.painter().add(callback);
    }

    fn draw_overlays(&self, ui: &Ui, rect: egui::Rect, editor: &Editor) {
        let painter = ui.painter_at(rect);

        if editor.store().is_empty() && !editor.is_arctic() {
            painter.text(
                egui::pos2(rect.center().x, rect.bottom() - 20.0),
                egui::Align2::CENTER_BOTTOM,
                "Left-click a grid cell to place a voxel",
                egui::FontId::proportional(11.0),
                egui::Color32::from_rgb(110, 110, 120),
            );
        }

        if editor.is_arctic() {
            painter.text(
                egui::pos2(rect.left() + 10.0, rect.top() + 8.0),
                egui::Align2::LEFT_TOP,
                "Arctic mode",
                egui::FontId::proportional(12.0),
                egui::Color32::from_rgb(70, 100, 130),
            );
        }
    }
}

/// Copy a local mesh with its vertices moved to world space. Normals and
/// colors are untouched.
fn world_space_mesh(local: &MeshData, offset: glam::Vec3) -> MeshData {
    let mut mesh = local.clone();
    let count = mesh.vertex_count();
    for v in 0..count {
        let base = v * 9;
        mesh.vertices[base] += offset.x;
        mesh.vertices[base + 1] += offset.y;
        mesh.vertices[base + 2] += offset.z;
    }
    mesh
}
