//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize logging and metrics in dependency order
//! - Start the config watcher when hot reload is requested
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners start last (traffic only when ready)

use std::net::SocketAddr;
use std::path::PathBuf;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::config::loader::load_or_default;
use crate::config::watcher::ConfigWatcher;
use crate::error::Result;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::forward_signals;
use crate::observability::{logging, metrics};

/// Options resolved from the command line.
#[derive(Debug, Clone)]
pub struct StartupOptions {
    pub config_path: PathBuf,
    pub watch: bool,
}

/// Start the guard and serve until a termination signal arrives.
pub async fn run(options: StartupOptions) -> Result<()> {
    let config = load_or_default(&options.config_path)?;
    logging::init_logging(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "json-size-guard starting");
    if !options.config_path.exists() {
        tracing::warn!(path = ?options.config_path, "Config file not found, using defaults");
    }

    if config.observability.metrics_enabled {
        // Validation already checked the address.
        if let Ok(addr) = config.observability.metrics_address.parse::<SocketAddr>() {
            metrics::init_metrics(addr);
        }
    }

    // The watcher handle must outlive the server.
    let (_watcher, config_updates) = if options.watch {
        let (watcher, updates) = ConfigWatcher::new(&options.config_path);
        match watcher.run() {
            Ok(handle) => (Some(handle), updates),
            Err(e) => {
                tracing::error!(error = %e, "Config watcher failed to start, hot reload disabled");
                (None, updates)
            }
        }
    } else {
        let (_tx, updates) = mpsc::unbounded_channel();
        (None, updates)
    };

    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    forward_signals(shutdown);

    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
