use sqlx::postgres::PgPoolOptions;
use wardrobe_api::{config, factory, router, telemetry};

const MAX_DB_CONNECTIONS: u32 = 10;

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing()?;

    let config = config::read_config()?;
    tracing::debug!(storage = ?config.storage, "configuration loaded");

    let connection_pool = PgPoolOptions::new()
        .max_connections(MAX_DB_CONNECTIONS)
        .connect_with(config.database.with_db())
        .await?;

    sqlx::migrate!("./migrations").run(&connection_pool).await?;

    let app_state = factory::create_app_state(connection_pool, &config.storage)?;
    let app = router::create(app_state);

    let address = format!("{}:{}", config.application.host, config.application.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
