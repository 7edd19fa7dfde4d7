use anyhow::Result;
use incident_reporter::{
    client::IncidentApi, config::Config, controller::IncidentController,
    poller::NotificationPoller,
};
use tokio::signal;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let cfg = Config::from_env()?;
    tracing::info!(
        "incident-reporter starting; api={}, poll={:?}",
        cfg.api_base_url,
        cfg.poll_interval
    );

    let api = IncidentApi::new(&cfg)?;
    let controller = IncidentController::new(api);

    controller.refresh().await;
    tracing::info!(
        "initial load: {} incidents, {} notifications",
        controller.incidents().await.len(),
        controller.notifications().await.len()
    );

    let poller = NotificationPoller::start(controller.clone(), cfg.poll_interval);

    signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");
    poller.stop();

    tracing::info!(
        "final state: {} incidents, {} notifications",
        controller.incidents().await.len(),
        controller.notifications().await.len()
    );
    Ok(())
}
