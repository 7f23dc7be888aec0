use tracing_subscriber::EnvFilter;

use crate::cli::ServeArgs;
use crate::config::ServerConfig;
use crate::error::{Result, TodoManagerError};
use crate::server;

pub fn handle_serve(args: ServeArgs) -> Result<()> {
    let config = ServerConfig::load(args.config.as_deref(), args.host, args.port, args.log_filter)?;
    init_logging(&config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server::start_server(&config))
}

/// `RUST_LOG` wins over the configured filter.
fn init_logging(config: &ServerConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_filter).map_err(|e| {
            TodoManagerError::Config(format!("invalid log filter '{}': {}", config.log_filter, e))
        })?,
    };

    // Keep an already installed subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
    Ok(())
}
