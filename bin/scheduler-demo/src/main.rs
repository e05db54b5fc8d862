mod jobs;

use cadence_registrar::{Registrar, RegistrarConfig};
use jobs::{AlwaysFails, Heartbeat};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RegistrarConfig::from_env().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "failed to load scheduler configuration; using defaults");
        RegistrarConfig::default()
    });
    tracing::info!(max_concurrency = config.max_concurrency, queue_capacity = config.queue_capacity, "loaded configuration");

    let registrar = Registrar::new(config);

    registrar
        .register_fixed_rate("heartbeat-fixed-rate", Arc::new(Heartbeat { label: "fixed-rate".to_string() }), Duration::from_secs(5), None)
        .expect("failed to register heartbeat-fixed-rate");

    registrar
        .register_cron("heartbeat-cron", Arc::new(Heartbeat { label: "cron".to_string() }), "0 * * * * *", None)
        .expect("failed to register heartbeat-cron");

    registrar
        .register_periodic("failing-demo", Arc::new(AlwaysFails), Duration::from_secs(30))
        .expect("failed to register failing-demo");

    registrar.ready().expect("failed to start the scheduler");
    tracing::info!(live_tasks = registrar.live_tasks().len(), "scheduler running");

    tokio::signal::ctrl_c().await.expect("failed to listen for ctrl-c");
    tracing::info!("shutdown signal received");

    registrar.destroy().await;
    tracing::info!("scheduler shut down cleanly");
}
