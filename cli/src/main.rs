// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Permissions-Boundary Enforcer Service
//!
//! The `boundary-enforcer` binary serves the HTTP-triggered enforcement
//! function: `POST /` with a JSON body naming an account, a Lambda
//! function, and an `add`/`remove` action toggles the fixed IAM
//! permissions boundary on that function's execution role.
//!
//! AWS credentials are read from the environment once at startup. When
//! they are absent the service still starts, but every request is
//! rejected with a 400 `MissingCredentials` response.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};

use enforcer_core::application::enforcer::{BoundaryEnforcer, CloudClients, EnforcerConfig};
use enforcer_core::infrastructure::credentials::AwsCredentials;
use enforcer_core::infrastructure::iam::IamBoundaryClient;
use enforcer_core::infrastructure::lambda::LambdaRoleResolver;
use enforcer_core::presentation::api;

/// IAM permissions-boundary enforcer HTTP service
#[derive(Parser)]
#[command(name = "boundary-enforcer")]
#[command(version, about, long_about = None)]
struct Cli {
    /// HTTP API host (default: 127.0.0.1)
    #[arg(long, env = "ENFORCER_HOST", default_value = "127.0.0.1")]
    host: String,

    /// HTTP API port (default: 8080)
    #[arg(long, env = "ENFORCER_PORT", default_value = "8080")]
    port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ENFORCER_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    init_logging(&cli.log_level)?;

    // Credentials are read once; absence is carried into the enforcer and
    // surfaced per request as MissingCredentials.
    let clients = match AwsCredentials::from_env() {
        Ok(credentials) => {
            info!("AWS credentials loaded from environment");
            Some(CloudClients {
                roles: Arc::new(LambdaRoleResolver::new(&credentials)),
                boundaries: Arc::new(IamBoundaryClient::new(&credentials)),
            })
        }
        Err(err) => {
            warn!("{err}; all requests will be rejected");
            None
        }
    };

    let enforcer = BoundaryEnforcer::new(EnforcerConfig::default(), clients);
    let app = api::app(enforcer);

    let listener = tokio::net::TcpListener::bind((cli.host.as_str(), cli.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", cli.host, cli.port))?;
    info!("boundary enforcer listening on {}:{}", cli.host, cli.port);

    axum::serve(listener, app)
        .await
        .context("HTTP server error")?;

    Ok(())
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
