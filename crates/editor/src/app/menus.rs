//! Application menu bar and settings window

use eframe::egui;

use crate::editor::Editor;
use crate::settings::AppSettings;
use crate::viewport::ViewportPanel;

/// Show the file menu
pub fn file_menu(ui: &mut egui::Ui, editor: &mut Editor, viewport: &ViewportPanel) {
    ui.menu_button("File", |ui| {
        if ui.button("Export Mesh (OBJ)…").clicked() {
            ui.close_menu();
            let obj = editor.export_obj();
            if let Some(path) = rfd::FileDialog::new()
                .set_title("Export Mesh")
                .add_filter("OBJ", &["obj"])
                .set_file_name("voxels.obj")
                .save_file()
            {
                if let Err(e) = std::fs::write(&path, &obj) {
                    tracing::error!("Failed to write OBJ: {e}");
                } else {
                    tracing::info!(
                        "Exported {} voxels to {}",
                        editor.store().len(),
                        path.display()
                    );
                }
            }
        }
        if ui.button("Export Image (PNG)…").clicked() {
            ui.close_menu();
            // Pixels are read back right after the next paint; the app
            // finishes the export once the capture lands.
            viewport.request_capture();
        }
        ui.separator();
        if ui.button("Quit").clicked() {
            std::process::exit(0);
        }
    });
}

/// Show the edit menu
pub fn edit_menu(ui: &mut egui::Ui, editor: &mut Editor) {
    ui.menu_button("Edit", |ui| {
        if ui
            .add_enabled(
                !editor.store().is_empty(),
                egui::Button::new("Clear All Voxels"),
            )
            .clicked()
        {
            editor.clear();
            ui.close_menu();
        }
    });
}

/// Show the view menu
pub fn view_menu(ui: &mut egui::Ui, editor: &mut Editor, settings: &mut AppSettings) {
    ui.menu_button("View", |ui| {
        let mut arctic = editor.is_arctic();
        if ui.checkbox(&mut arctic, "Arctic Mode").changed() {
            editor.toggle_arctic();
            ui.close_menu();
        }
        ui.checkbox(&mut settings.grid.visible, "Show Grid");
        ui.separator();
        if ui.button("Reset Camera").clicked() {
            editor.camera = Default::default();
            ui.close_menu();
        }
    });
}

/// Show the settings menu
pub fn settings_menu(ui: &mut egui::Ui, show_settings_window: &mut bool) {
    ui.menu_button("Settings", |ui| {
        if ui.button("Preferences…").clicked() {
            *show_settings_window = true;
            ui.close_menu();
        }
    });
}

/// Settings window
pub fn settings_window(
    ctx: &egui::Context,
    editor: &mut Editor,
    settings: &mut AppSettings,
    show: &mut bool,
) {
    if !*show {
        return;
    }

    let mut open = *show;
    egui::Window::new("Preferences")
        .open(&mut open)
        .resizable(false)
        .show(ctx, |ui| {
            ui.heading("Grid");
            egui::Grid::new("grid_settings").num_columns(2).show(ui, |ui| {
                ui.label("Points per side");
                ui.add(egui::DragValue::new(&mut settings.grid.size).range(2..=40));
                ui.end_row();

                ui.label("Spacing");
                ui.add(
                    egui::DragValue::new(&mut settings.grid.spacing)
                        .range(0.25..=4.0)
                        .speed(0.05),
                );
                ui.end_row();

                ui.label("Line opacity");
                ui.add(egui::Slider::new(&mut settings.grid.opacity, 0.0..=1.0));
                ui.end_row();

                ui.label("Point size");
                ui.add(egui::Slider::new(&mut settings.grid.point_size, 1.0..=12.0));
                ui.end_row();
            });

            let differs = editor.grid().config() != settings.grid.config();
            if ui
                .add_enabled(differs, egui::Button::new("Apply (rebuilds grid, clears voxels)"))
                .clicked()
            {
                editor.rebuild_grid(settings.grid.config());
            }

            ui.separator();
            ui.heading("Viewport");
            egui::Grid::new("viewport_settings").num_columns(2).show(ui, |ui| {
                ui.label("Background");
                ui.color_edit_button_srgb(&mut settings.viewport.background_color);
                ui.end_row();

                ui.label("Arctic background");
                ui.color_edit_button_srgb(&mut settings.viewport.arctic_background);
                ui.end_row();
            });

            ui.separator();
            ui.heading("Interface");
            ui.horizontal(|ui| {
                ui.label("Font size");
                ui.add(egui::Slider::new(&mut settings.ui.font_size, 10.0..=20.0));
            });

            ui.separator();
            if ui.button("Save Settings").clicked() {
                settings.save();
            }
        });
    *show = open;
}
