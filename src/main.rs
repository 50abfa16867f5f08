use std::net::SocketAddr;

use anyhow::Context;
use classflow::logging::init_tracing;
use classflow::metrics::{init_metrics, metrics_app};
use classflow::router::init_router;
use classflow::state::init_app_state;
use classflow_config::ServerConfig;
use dotenvy::dotenv;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing().context("Failed to initialize logging")?;

    let server_config = ServerConfig::from_env();

    if let Some(handle) = init_metrics().context("Failed to install metrics recorder")? {
        let metrics_listener = tokio::net::TcpListener::bind(server_config.metrics_address())
            .await
            .context("Failed to bind metrics listener")?;
        info!(address = %server_config.metrics_address(), "Metrics available at /metrics");
        tokio::spawn(async move {
            if let Err(err) = axum::serve(metrics_listener, metrics_app(handle)).await {
                tracing::error!(error = %err, "Metrics server stopped");
            }
        });
    }

    let state = init_app_state().await?;
    classflow_db::run_migrations(&state.db)
        .await
        .context("Failed to run migrations")?;

    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(server_config.address())
        .await
        .with_context(|| format!("Failed to bind {}", server_config.address()))?;
    info!(address = %server_config.address(), "Server running");
    info!("Swagger UI available at /swagger-ui, Scalar at /scalar");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
