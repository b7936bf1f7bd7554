use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const LISTEN_ADDR: &str = "0.0.0.0:3000";
const METRICS_ADDR: &str = "0.0.0.0:8002";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mock_service=debug,tower_http=debug"));
    FmtSubscriber::builder().with_env_filter(filter).init();

    PrometheusBuilder::new()
        .with_http_listener(METRICS_ADDR.parse::<SocketAddr>()?)
        .install()?;

    let listener = TcpListener::bind(LISTEN_ADDR).await?;
    info!("Mock service listening on {LISTEN_ADDR}");
    mock_service::run(listener, Arc::default()).await?;
    Ok(())
}
