use tracing::Level;
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

/// Level used for every target not mentioned in [`target_filter`].
pub const DEFAULT_LEVEL: Level = Level::DEBUG;

fn target_filter(default_level: Level) -> filter::Targets {
    filter::Targets::new()
        .with_default(default_level)
        .with_target("wgpu_core", Level::WARN)
        // Workaround for https://github.com/gfx-rs/wgpu/issues/6043
        .with_target("wgpu_core::device::resource", Level::WARN)
        .with_target("wgpu_hal", Level::WARN)
        .with_target("naga", Level::INFO)
        .with_target("calloop", Level::INFO)
        .with_target("sctk", Level::INFO)
        .with_target("gltf", Level::INFO)
}

/// Installs a pretty stdout logger; `log` records are forwarded as well.
pub fn init_logger(default_level: Level) {
    // A layer that logs events to stdout using the human-readable "pretty" format.
    let logger = tracing_subscriber::fmt::layer().pretty();

    tracing_subscriber::registry()
        .with(logger)
        .with(target_filter(default_level))
        .init();
}
