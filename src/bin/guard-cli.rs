use std::path::PathBuf;

use axum::http::Method;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use json_size_guard::config::loader::load_config;
use json_size_guard::guard::classifier::RequestClassifier;
use json_size_guard::guard::size_guard::evaluate;
use json_size_guard::guard::{GuardVerdict, LimitResolver, RequestSnapshot};

#[derive(Parser)]
#[command(name = "guard-cli")]
#[command(about = "Inspect and dry-run JSON size guard configurations", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config/guard.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and summarize its limits
    Validate,
    /// Print the limit that applies to a route identifier
    Resolve {
        /// Route identifier, e.g. `Upload::store`
        route: String,
    },
    /// Evaluate a hypothetical request against the configuration
    Check {
        /// Route identifier the request targets
        #[arg(short, long)]
        route: String,
        #[arg(short, long, default_value = "POST")]
        method: String,
        #[arg(short = 't', long, default_value = "application/json")]
        content_type: String,
        /// Declared Content-Length
        #[arg(short, long)]
        length: Option<u64>,
        /// Leading body bytes, for sniffing text/plain requests
        #[arg(short, long)]
        body: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let resolver = LimitResolver::from_config(&config)?;

    let output = match cli.command {
        Commands::Validate => {
            let mut entries: Vec<_> = resolver.config().route_limits.iter().collect();
            entries.sort_unstable();
            let limits: Vec<Value> = entries
                .into_iter()
                .map(|(route, max_bytes)| json!({ "route": route, "max_bytes": max_bytes }))
                .collect();
            json!({
                "valid": true,
                "default_max_bytes": resolver.default_max_bytes(),
                "routes": config.routes.len(),
                "limits": limits,
            })
        }
        Commands::Resolve { route } => json!({
            "route": route,
            "max_bytes": resolver.resolve(&route),
        }),
        Commands::Check {
            route,
            method,
            content_type,
            length,
            body,
        } => {
            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;
            let mut snapshot = RequestSnapshot::new(method, route).with_content_type(content_type);
            if let Some(length) = length {
                snapshot = snapshot.with_content_length(length);
            }
            if let Some(body) = body {
                snapshot = snapshot.with_body_preview(body.into_bytes());
            }

            let classifier = RequestClassifier::default();
            let checked = classifier.should_check(&snapshot);
            match evaluate(&classifier, &resolver, &snapshot) {
                GuardVerdict::Pass => json!({
                    "verdict": "pass",
                    "checked": checked,
                    "allowed_length": resolver.resolve(&snapshot.route_id),
                }),
                GuardVerdict::Reject(rejection) => json!({
                    "verdict": "reject",
                    "checked": checked,
                    "error": rejection.to_string(),
                    "received_length": rejection.received_bytes,
                    "allowed_length": rejection.allowed_bytes,
                }),
            }
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
