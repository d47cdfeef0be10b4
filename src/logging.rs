//! Process-wide `tracing` subscriber, installed once by the binary

use tracing_subscriber::EnvFilter;

use diffgate::config::{LogConfig, LogFormat};

/// Install the global subscriber. Output goes to stderr so that stdout
/// stays free for callers.
pub fn init(config: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::new(config.level.as_str());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    let installed = match config.format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|e| anyhow::anyhow!("failed to install log subscriber: {}", e))
}
