//! Toolbar actions and UI

use egui::Ui;
use shared::Color;

use crate::editor::Editor;

/// Preset swatches offered next to the free color picker.
const PALETTE: &[(&str, [u8; 3])] = &[
    ("Steel", [0x46, 0x82, 0xb4]),
    ("Red", [0xd9, 0x3a, 0x2e]),
    ("Amber", [0xe8, 0xa3, 0x3d]),
    ("Moss", [0x5d, 0x8a, 0x4a]),
    ("Snow", [0xf4, 0xf8, 0xfb]),
    ("Slate", [0x4a, 0x4f, 0x58]),
];

pub fn show(ui: &mut Ui, editor: &mut Editor) {
    ui.horizontal(|ui| {
        ui.label("Color:");

        let mut rgb = editor.store().color().to_rgb8();
        if ui.color_edit_button_srgb(&mut rgb).changed() {
            editor.set_color(Color::from_rgb8(rgb[0], rgb[1], rgb[2]));
        }

        for &(name, [r, g, b]) in PALETTE {
            let swatch = egui::Button::new("  ")
                .fill(egui::Color32::from_rgb(r, g, b))
                .min_size(egui::vec2(18.0, 18.0));
            if ui.add(swatch).on_hover_text(name).clicked() {
                editor.set_color(Color::from_rgb8(r, g, b));
            }
        }

        ui.separator();

        let arctic_label = if editor.is_arctic() {
            "❄ Arctic: on"
        } else {
            "❄ Arctic: off"
        };
        if ui
            .selectable_label(editor.is_arctic(), arctic_label)
            .on_hover_text("Merge all voxels into one smoothed surface (A)")
            .clicked()
        {
            editor.toggle_arctic();
        }

        ui.separator();

        if ui
            .add_enabled(!editor.store().is_empty(), egui::Button::new("Clear"))
            .clicked()
        {
            editor.clear();
        }
    });
}
