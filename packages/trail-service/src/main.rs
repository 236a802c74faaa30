use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trail_service::{config::Config, handlers::AppState, services::dataset::TrailDataset};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trail_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenv::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting trail service with data from {}", config.data_path);

    let dataset = TrailDataset::load(&config).await?;
    info!(
        "Loaded {} trail locations. Serving map data.",
        dataset.len()
    );

    let addr: std::net::SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    let app = trail_service::app(AppState::new(config, dataset));

    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    info!("Shutting down...");
    Ok(())
}
