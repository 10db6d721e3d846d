//! JSON command protocol for the hosting process.
//!
//! The host (GUI chrome, job dispatcher) drives the editor through a small
//! serde-tagged command set and receives structured responses. Pick
//! failures never surface here; only malformed input is reported back.

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::editor::PresentationMode;
use crate::harness::EditorHarness;

/// A command the host can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditorCommand {
    /// Remove every placed cell.
    Clear,
    /// Set the global color (CSS-style hex or named).
    SetColor { color: String },
    /// Flip the presentation mode; reports the new state.
    ToggleArcticMode,
    /// Serialize the scene as Wavefront OBJ text.
    ExportMesh,
    /// PNG of the most recent rendered frame.
    ExportImage,
    /// List the placed cells and editor state.
    Inspect,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut EditorHarness, cmd: EditorCommand) -> CommandResponse {
    match cmd {
        EditorCommand::Clear => {
            harness.clear();
            CommandResponse::ok()
        }

        EditorCommand::SetColor { color } => match harness.set_color(&color) {
            Ok(()) => CommandResponse::ok_with_data(serde_json::json!({ "color": color })),
            Err(e) => CommandResponse::err(e),
        },

        EditorCommand::ToggleArcticMode => {
            let arctic = harness.toggle_arctic();
            CommandResponse::ok_with_data(serde_json::json!({ "arctic": arctic }))
        }

        EditorCommand::ExportMesh => {
            let obj = harness.export_obj();
            CommandResponse::ok_with_data(serde_json::json!({
                "obj": obj,
                "voxels": harness.voxel_count(),
            }))
        }

        EditorCommand::ExportImage => {
            let (png, width, height) = harness.export_image();
            let encoded = base64::engine::general_purpose::STANDARD.encode(&png);
            CommandResponse::ok_with_data(serde_json::json!({
                "png_base64": encoded,
                "width": width,
                "height": height,
            }))
        }

        EditorCommand::Inspect => {
            let mode = match harness.editor.mode() {
                PresentationMode::Normal => "normal",
                PresentationMode::Arctic => "arctic",
            };
            CommandResponse::ok_with_data(serde_json::json!({
                "voxel_count": harness.voxel_count(),
                "mode": mode,
                "grid_size": harness.editor.grid().size(),
                "voxels": harness.records(),
            }))
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut EditorHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: EditorCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut EditorHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<EditorCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}
