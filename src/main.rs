//! JSON size guard (v1)
//!
//! An HTTP front that enforces per-route JSON payload limits.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id → trace → timeout
//!                         │
//!                         ▼
//!                  route identity (routing::RouteTable)
//!                         │
//!                         ▼
//!                  size guard (guard::SizeGuard) ──── 413 ───▶ Client
//!                         │
//!                         ▼
//!                  upstream forward / echo
//!
//!     config file ──▶ watcher ──▶ LimitResolver swap (hot reload)
//! ```

use std::path::PathBuf;

use clap::Parser;

use json_size_guard::lifecycle::{self, StartupOptions};

#[derive(Parser)]
#[command(name = "json-size-guard")]
#[command(about = "HTTP front enforcing per-route JSON payload limits", long_about = None)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config/guard.toml")]
    config: PathBuf,

    /// Reload route limits when the configuration file changes
    #[arg(short, long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    lifecycle::run(StartupOptions {
        config_path: args.config,
        watch: args.watch,
    })
    .await?;

    Ok(())
}
