//! Serve command - run the HTTP API

use std::sync::Arc;

use clap::Args;

use crate::cli::logging::init_tracing;
use crate::core::config::{Config, LogFormat};
use crate::core::services::Services;
use crate::http::build_router;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Bind address (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides config)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Log output format (overrides config)
    #[arg(long)]
    pub log_format: Option<LogFormat>,
}

impl ServeArgs {
    fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Execute the serve command
pub async fn execute(args: ServeArgs, mut config: Config) -> Result<(), Box<dyn std::error::Error>> {
    args.apply(&mut config);
    config.validate()?;

    init_tracing(&config.logging);

    tracing::info!("Starting soda review service");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    config.log_config();

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let services = Arc::new(Services::connect(config).await?);
    let app = build_router(Arc::clone(&services));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);
    tracing::info!("Service ready - Health check at http://{}/validate/up/cli", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    services.shutdown().await;
    tracing::info!("Soda review service stopped");

    Ok(())
}
