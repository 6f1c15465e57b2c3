use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ResolverConfig;

/// Install a global `fmt` subscriber filtered by `config.log_level`.
///
/// Embedding processes that already installed their own subscriber keep it.
pub fn init(config: &ResolverConfig) -> anyhow::Result<()> {
    // 初始化日志
    let filter = EnvFilter::try_new(&config.log_level)?;

    if let Err(e) = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
    {
        debug!("Tracing subscriber already installed: {}", e);
    }

    Ok(())
}
