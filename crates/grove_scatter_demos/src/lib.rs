#![forbid(unsafe_code)]

mod rendering;
mod session_file;

pub use rendering::{render_scene_to_png, ItemStyle, RenderConfig, Scene};
pub use session_file::{load_session_file, SessionFile, TerrainDef};

use tracing_subscriber::EnvFilter;

/// Installs a console subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
