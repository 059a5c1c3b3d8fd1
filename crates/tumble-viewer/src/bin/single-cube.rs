//! One cube spinning about the (1, 1, 0) axis.

use tumble_engine::geometry::VertexLayout;
use tumble_engine::logging::{init_logging, LoggingConfig};
use tumble_engine::scene::SceneConfig;
use tumble_engine::window::RuntimeConfig;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());
    tumble_engine::run(
        RuntimeConfig::default(),
        SceneConfig::single_cube(VertexLayout::Interleaved),
    )
}
