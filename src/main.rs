use anyhow::Result;
use rmcp::ServiceExt;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use city_weather::{FileStore, HistoryStore, LoggingListener, Orchestrator, WeatherConfig, WeatherServer};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "city_weather=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Arc::new(WeatherConfig::from_env()?);
    tracing::info!(
        "Starting city weather server (units: {}, history: {})",
        config.units.as_query(),
        config.history_dir.display()
    );

    let history = Arc::new(HistoryStore::open(Arc::new(FileStore::new(
        config.history_dir.clone(),
    ))));
    let core = Arc::new(Orchestrator::new(config, history, Arc::new(LoggingListener))?);

    let server = WeatherServer::new(core)?.serve(rmcp::transport::stdio()).await?;
    server.waiting().await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
