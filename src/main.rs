mod telemetry;

use petsync_reminders_core::start_job_schedulers;
use petsync_reminders_infra::setup_context;
use telemetry::{get_subscriber, init_subscriber};
use tracing::info;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    openssl_probe::init_ssl_cert_env_vars();

    let subscriber = get_subscriber("petsync_reminders".into(), "info".into());
    init_subscriber(subscriber);

    let context = setup_context().await;

    start_job_schedulers(context);

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Stopping the reminder poller.");
    Ok(())
}
