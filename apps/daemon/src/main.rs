mod sink;

use anyhow::Result;
use sink::StdoutSink;
use sltrack_api::StarlineClient;
use sltrack_core::{scheduler, Config, Tracker};
use tracing::{debug, info};
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    info!("configuration loaded");
    debug!("{:?}", config);

    let client = StarlineClient::new(config.credentials());
    let tracker = Tracker::connect(client, StdoutSink).await?;
    info!(
        "authenticated as account {}, polling every {:?}",
        tracker.account_id(),
        config.scan_interval
    );

    scheduler::run(&tracker, config.scan_interval).await;

    Ok(())
}
