//! Two cubes sharing one interleaved vertex buffer, spinning in opposite
//! directions about different axes.

use tumble_engine::geometry::VertexLayout;
use tumble_engine::logging::{init_logging, LoggingConfig};
use tumble_engine::scene::SceneConfig;
use tumble_engine::window::RuntimeConfig;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());
    log::info!("starting twin cubes");

    tumble_engine::run(
        RuntimeConfig::default(),
        SceneConfig::twin_cubes(VertexLayout::Interleaved),
    )
}
