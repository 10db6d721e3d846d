//! Main application module

mod keyboard;
mod menus;
mod styles;

use eframe::egui;

use crate::editor::Editor;
use crate::export;
use crate::settings::AppSettings;
use crate::ui::{status_bar, toolbar};
use crate::viewport::ViewportPanel;

/// Main application
pub struct VoxelApp {
    pub editor: Editor,
    pub settings: AppSettings,
    pub show_settings_window: bool,
    viewport: ViewportPanel,
    /// Last applied font size (to detect changes)
    last_font_size: f32,
}

impl VoxelApp {
    pub fn new(cc: &eframe::CreationContext<'_>, grid_size: Option<usize>) -> Self {
        let mut settings = AppSettings::load();
        if let Some(size) = grid_size {
            settings.grid.size = size;
        }

        // Apply initial styles with font size from settings
        styles::configure_styles(&cc.egui_ctx, settings.ui.font_size);

        let editor = Editor::new(settings.grid.config());

        let mut viewport = ViewportPanel::new();

        // Initialize GL renderer if glow context is available
        if let Some(gl) = cc.gl.as_ref() {
            viewport.init_gl(gl);
        }

        let last_font_size = settings.ui.font_size;

        Self {
            editor,
            settings,
            show_settings_window: false,
            viewport,
            last_font_size,
        }
    }

    /// Finish a deferred image export: the viewport reads the pixels back
    /// right after its paint, we pick the capture up on the next update.
    fn finish_image_export(&mut self) {
        let Some(frame) = self.viewport.take_capture() else {
            return;
        };
        let png = export::encode_png(&frame);
        if png.is_empty() {
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .set_title("Export Image")
            .add_filter("PNG", &["png"])
            .set_file_name("voxels.png")
            .save_file()
        {
            if let Err(e) = std::fs::write(&path, &png) {
                tracing::error!("Failed to write PNG: {e}");
            } else {
                tracing::info!("Exported image to {}", path.display());
            }
        }
    }
}

impl eframe::App for VoxelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply font size if changed
        if self.settings.ui.font_size != self.last_font_size {
            styles::apply_font_size(ctx, self.settings.ui.font_size);
            self.last_font_size = self.settings.ui.font_size;
        }

        keyboard::handle_keyboard(ctx, &mut self.editor, &self.viewport);

        // ── Menu bar ──────────────────────────────────────────
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                menus::file_menu(ui, &mut self.editor, &self.viewport);
                menus::edit_menu(ui, &mut self.editor);
                menus::view_menu(ui, &mut self.editor, &mut self.settings);
                menus::settings_menu(ui, &mut self.show_settings_window);
            });
        });

        // ── Settings window ──────────────────────────────────
        menus::settings_window(
            ctx,
            &mut self.editor,
            &mut self.settings,
            &mut self.show_settings_window,
        );

        // ── Toolbar ───────────────────────────────────────────
        egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::side_top_panel(&ctx.style())
                    .inner_margin(egui::Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                toolbar::show(ui, &mut self.editor);
            });

        // ── Status bar ────────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            status_bar::show(ui, &self.editor);
        });

        // ── Viewport ──────────────────────────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport.show(ui, &mut self.editor, &self.settings);
            });

        self.finish_image_export();
    }

    fn on_exit(&mut self, _gl: Option<&glow::Context>) {
        self.settings.save();
    }
}
