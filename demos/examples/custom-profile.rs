use serde_json::json;
use std::time::Duration;
use stroll::prelude::*;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter("stroll=info")
        .init();

    // Readers outnumber writers three to one.
    let profile = Profile::builder("api_heavy")
        .set_host("http://localhost:3000")?
        .set_think_time(Duration::from_millis(500), Duration::from_secs(2))?
        .register("get_data", 3, [Request::get("/api/data")])?
        .register(
            "post_data",
            1,
            [Request::post("/api/data", json!({ "key": "value" }))],
        )?
        .build()?;

    info!("Profile:\n{}", profile.to_json()?);

    let stats = Run::new(profile)
        .users(25)
        .duration(Duration::from_secs(60))
        .seed(42)
        .await;

    println!("{stats}");
    Ok(())
}
