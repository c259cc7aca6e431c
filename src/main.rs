// Main entry point - Settings validation and subsystem wiring
use std::sync::Arc;

use chrono::{Datelike, Utc};
use fhem_display::application::clock_service::ClockService;
use fhem_display::application::polling_service::StatusPoller;
use fhem_display::infrastructure::config::load_settings;
use fhem_display::infrastructure::http_status_source::HttpStatusSource;
use fhem_display::presentation::screen::StatusScreen;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load and validate settings, any violation aborts startup
    let settings = Arc::new(load_settings()?);
    tracing::info!(
        "Starting {} for {} (locale {}, touchpad {})",
        settings.wifi.hostname,
        settings.server.base_url,
        settings.localization.locale,
        if settings.features.touchpad { "on" } else { "off" }
    );

    // Time subsystem
    let clock = ClockService::new(&settings)?;
    let now = Utc::now();
    let transitions = clock.transitions(now.year())?;
    tracing::info!(
        "DST {}: {} to {} (UTC)",
        now.year(),
        transitions.start,
        transitions.end
    );
    tracing::info!("NTP servers: {}", clock.ntp_servers().join(", "));

    // Remote status polling
    let source = Arc::new(HttpStatusSource::new(
        &settings.server,
        &settings.wifi.hostname,
    )?);
    let poller = StatusPoller::new(source, &settings);
    let screen = StatusScreen::new(clock.clone(), settings.display_pins());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poll_task = {
        let poller = poller.clone();
        tokio::spawn(async move { poller.run(shutdown_rx).await })
    };

    let mut refresh = tokio::time::interval(poller.interval());
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = refresh.tick() => {
                let local = clock.now(Utc::now())?;
                let state = poller.state().await;
                let polled = (state.polls > 0).then_some(&state);
                for line in screen.render(&local, polled) {
                    tracing::info!("{}", line);
                }
            }
            _ = &mut ctrl_c => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    let _ = shutdown_tx.send(true);
    poll_task.await?;

    Ok(())
}
