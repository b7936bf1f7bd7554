use std::time::Duration;
use stroll::prelude::*;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter("stroll=debug")
        .init();

    let stats = Run::new(builtin("website_user")?)
        .users(10)
        .duration(Duration::from_secs(120))
        .await;

    println!("{stats}");
    Ok(())
}
