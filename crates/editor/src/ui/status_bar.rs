use egui::Ui;

use crate::editor::Editor;

pub fn show(ui: &mut Ui, editor: &Editor) {
    ui.horizontal(|ui| {
        ui.weak(format!("Voxels: {}", editor.store().len()));

        ui.separator();

        let mode = if editor.is_arctic() { "arctic" } else { "normal" };
        ui.weak(format!("Mode: {mode}"));

        ui.separator();

        match editor.preview() {
            Some(target) => {
                ui.weak(format!(
                    "Next: cell ({}, {}) at level {}",
                    target.key.x, target.key.z, target.key.level
                ));
            }
            None => {
                ui.weak("Left-click: place · Right-click: remove · Middle-drag: orbit");
            }
        }
    });
}
