// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LetUsConnect - real-time messaging backend.
//!
//! This is the binary entry point: run the server, mint bearer tokens for
//! local clients, or check configuration.

mod serve;
mod shutdown;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};

use letusconnect_auth::TokenIssuer;
use letusconnect_config::{ConfigError, ConnectConfig};

/// LetUsConnect - real-time messaging backend.
#[derive(Parser, Debug)]
#[command(name = "letusconnect", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP/WebSocket server.
    Serve,
    /// Mint an HS256 bearer token signed with the configured secret.
    Token {
        /// Subject (user id) the token authenticates.
        #[arg(long)]
        user: String,
        /// Lifetime in seconds.
        #[arg(long, default_value_t = 3600)]
        ttl_secs: u64,
    },
    /// Load and validate configuration, then exit.
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => {
            let config = load_or_exit(cli.config.as_deref());
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Token { user, ttl_secs }) => {
            let config = load_or_exit(cli.config.as_deref());
            match mint_token(&config, &user, ttl_secs) {
                Ok(token) => println!("{token}"),
                Err(e) => {
                    eprintln!("error: {e}");
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::CheckConfig) => {
            let config = load_or_exit(cli.config.as_deref());
            eprintln!(
                "letusconnect: config ok (listen={}:{}, storage={:?}, broker={})",
                config.server.host,
                config.server.port,
                config.storage.backend,
                config.broker.endpoint()
            );
        }
        None => {
            println!("letusconnect: use --help for available commands");
        }
    }
}

fn load(path: Option<&Path>) -> Result<ConnectConfig, Vec<ConfigError>> {
    match path {
        Some(path) => letusconnect_config::load_and_validate_path(path),
        None => letusconnect_config::load_and_validate(),
    }
}

fn load_or_exit(path: Option<&Path>) -> ConnectConfig {
    match load(path) {
        Ok(config) => config,
        Err(errors) => {
            letusconnect_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

fn mint_token(
    config: &ConnectConfig,
    user: &str,
    ttl_secs: u64,
) -> Result<String, letusconnect_core::ConnectError> {
    let secret = config.auth.jwt_secret.as_deref().ok_or_else(|| {
        letusconnect_core::ConnectError::Config("auth.jwt_secret is not set".to_string())
    })?;
    TokenIssuer::new(secret).issue(user, Duration::from_secs(ttl_secs))
}
