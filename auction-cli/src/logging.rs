use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so stdout only carries command results.
pub fn init(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("warn")
            .add_directive(format!("auction={}", level).parse().context("invalid log level")?)
            .add_directive(format!("auction_deploy={}", level).parse().context("invalid log level")?),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
