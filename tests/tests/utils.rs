use metrics_exporter_prometheus::PrometheusBuilder;
use mock_service::Hits;
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use stroll::prelude::*;
use tracing::error;
use tracing_subscriber::FmtSubscriber;

/// Install logging and a metrics recorder once, then start a fresh mock service for the caller.
#[allow(unused)]
pub async fn init() -> (SocketAddr, Arc<Hits>) {
    static ONCE_LOCK: OnceLock<()> = OnceLock::new();

    ONCE_LOCK.get_or_init(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            default_panic(info);
            error!("Panic occurred: {info:?}");
        }));

        FmtSubscriber::builder()
            .with_env_filter("stroll=debug,mock_service=debug")
            .init();

        PrometheusBuilder::new().install_recorder().unwrap();
    });

    mock_service::spawn().await.unwrap()
}

/// `profile` aimed at the mock service with a short think time.
#[allow(unused)]
pub fn against(profile: Profile, addr: SocketAddr) -> Profile {
    let think_time = ThinkTime::between(Duration::from_millis(5), Duration::from_millis(20)).unwrap();
    profile
        .with_host(&format!("http://{addr}"))
        .unwrap()
        .with_think_time(think_time)
}
