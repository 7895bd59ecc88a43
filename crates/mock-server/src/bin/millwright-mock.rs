//! `millwright-mock`: run the in-memory maintenance API locally.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use millwright_api::MemoryApi;
use millwright_mock_server::{seed_from_json, start_server, Credentials, DEFAULT_PORT};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "millwright-mock",
    version,
    about = "In-memory stand-in for the maintenance REST API"
)]
struct Cli {
    /// Port to listen on
    #[arg(long, default_value_t = DEFAULT_PORT, env = "MILLWRIGHT_MOCK_PORT")]
    port: u16,

    /// JSON fixture to preload: an object mapping resource paths to arrays
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Require this email at login and a session on resource routes
    #[arg(long, env = "MILLWRIGHT_MOCK_EMAIL", requires = "password")]
    email: Option<String>,

    /// Password paired with --email
    #[arg(long, env = "MILLWRIGHT_MOCK_PASSWORD", requires = "email")]
    password: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,millwright_api=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let api = MemoryApi::new();
    if let Some(path) = &cli.seed {
        let loaded = std::fs::read_to_string(path)
            .map_err(|e| format!("could not read '{}': {}", path.display(), e))
            .and_then(|content| {
                serde_json::from_str::<serde_json::Value>(&content)
                    .map_err(|e| format!("could not parse '{}': {}", path.display(), e))
            })
            .and_then(|fixture| seed_from_json(&api, &fixture));
        match loaded {
            Ok(n) => tracing::info!(records = n, path = %path.display(), "seeded"),
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        }
    }

    let credentials = match (cli.email, cli.password) {
        (Some(email), Some(password)) => Some(Credentials { email, password }),
        _ => None,
    };

    if let Err(e) = start_server(cli.port, api, credentials).await {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
