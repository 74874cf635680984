mod config;
mod telemetry;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::ServiceConfig;
use devicehub_api::{run_http_server, AppState, HttpServerConfig};
use devicehub_domain::DeviceService;
use devicehub_postgres::{PostgresClient, PostgresConfig, PostgresDeviceRepository};

#[tokio::main]
async fn main() {
    // Initialize configuration and tracing
    let config = match ServiceConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    telemetry::init_tracing(&config.log_level);

    info!(environment = %config.environment, "Starting devicehub server");

    // Initialize PostgreSQL; a store that cannot be reached at startup is fatal
    let postgres_client = match initialize_postgres(&config).await {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to initialize PostgreSQL: {}", e);
            std::process::exit(1);
        }
    };

    let device_repository = Arc::new(PostgresDeviceRepository::new(postgres_client.clone()));
    let device_service = Arc::new(DeviceService::new(device_repository));

    let state = AppState {
        device_service,
        environment: config.environment.clone(),
    };

    let http_config = HttpServerConfig {
        host: config.http_host.clone(),
        port: config.http_port,
    };

    // Shutdown signals cancel the token; the server drains before we close the pool
    let shutdown_token = CancellationToken::new();
    spawn_signal_handlers(shutdown_token.clone());

    let result = run_http_server(http_config, state, shutdown_token).await;

    // In-flight requests have completed by now
    postgres_client.close();

    match result {
        Ok(()) => {
            info!("Shutdown complete");
        }
        Err(e) => {
            error!("HTTP server failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn initialize_postgres(config: &ServiceConfig) -> anyhow::Result<PostgresClient> {
    info!("Testing database connection...");
    let postgres_config = PostgresConfig {
        url: config.database_url.clone(),
        max_pool_size: config.postgres_max_pool_size,
    };
    let client = PostgresClient::new(&postgres_config)?;
    client.ping().await?;
    info!("Database connection successful");
    Ok(client)
}

fn spawn_signal_handlers(token: CancellationToken) {
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received shutdown signal");
                ctrl_c_token.cancel();
            }
            Err(err) => {
                error!("Error setting up signal handler: {}", err);
            }
        }
    });

    #[cfg(unix)]
    {
        tokio::spawn(async move {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm =
                signal(SignalKind::terminate()).expect("Failed to set up SIGTERM handler");
            sigterm.recv().await;
            info!("Received SIGTERM signal");
            token.cancel();
        });
    }
}
