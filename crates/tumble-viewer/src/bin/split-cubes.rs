//! Two cubes fed from separate position and color buffers.

use tumble_engine::logging::{init_logging, LoggingConfig};
use tumble_engine::scene::SceneConfig;
use tumble_engine::window::RuntimeConfig;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());
    tumble_engine::run(RuntimeConfig::default(), SceneConfig::split_twin_cubes())
}
