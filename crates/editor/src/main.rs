mod app;
mod ui;
mod viewport;

// Re-export library modules so that `crate::editor`, `crate::export`, etc.
// resolve to the lib crate types everywhere in the binary.
pub use isovox_editor_lib::editor;
pub use isovox_editor_lib::export;
pub use isovox_editor_lib::grid;
pub use isovox_editor_lib::settings;
pub use isovox_editor_lib::store;

use app::VoxelApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "isovox_editor=info".into()),
        )
        .init();

    // Parse --grid-size <n> argument
    let grid_size = parse_grid_size_arg();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("isovox — Voxel Grid Editor")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "isovox-editor",
        native_options,
        Box::new(move |cc| Ok(Box::new(VoxelApp::new(cc, grid_size)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

fn parse_grid_size_arg() -> Option<usize> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--grid-size" && i + 1 < args.len() {
            match args[i + 1].parse::<usize>() {
                Ok(n) if n >= 2 => {
                    tracing::info!("Using grid size {n} from command line");
                    return Some(n);
                }
                _ => {
                    tracing::error!("Invalid --grid-size value: {}", args[i + 1]);
                }
            }
            break;
        }
        i += 1;
    }
    None
}
