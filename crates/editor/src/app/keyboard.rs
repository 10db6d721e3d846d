//! Keyboard shortcut handling

use eframe::egui;

use crate::editor::Editor;
use crate::viewport::ViewportPanel;

/// Handle keyboard shortcuts for the application
pub fn handle_keyboard(ctx: &egui::Context, editor: &mut Editor, viewport: &ViewportPanel) {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    ctx.input(|i| {
        // A — toggle arctic mode
        if i.key_pressed(egui::Key::A) && !i.modifiers.command {
            editor.toggle_arctic();
        }
        // R — reset camera to the isometric home pose
        if i.key_pressed(egui::Key::R) && !i.modifiers.command {
            editor.camera = Default::default();
        }
        // Ctrl+Shift+X — clear the scene
        if i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::X) {
            editor.clear();
        }
        // Ctrl+P — export the current frame as an image
        if i.modifiers.command && i.key_pressed(egui::Key::P) {
            viewport.request_capture();
        }
    });
}
