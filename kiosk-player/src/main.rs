//! Kiosk Player (kiosk-player) - Main entry point
//!
//! Starts the playback supervisor and serves the HTTP control API until
//! Ctrl+C or SIGTERM, then stops the display process before exiting.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

use kiosk_player::api::{self, AppState};
use kiosk_player::config::{Args, Config};
use kiosk_player::media::Pattern;
use kiosk_player::playback::Supervisor;
use kiosk_player::server;

/// Time allowed for the display process to be stopped after the server exits
const SUPERVISOR_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins; otherwise start at info and switch to the configured
    // level once the config file has been read
    let (filter, filter_handle) = reload::Layer::new(log_filter("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting kiosk-player v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = Config::load(&args).context("Failed to load configuration")?;

    if std::env::var_os("RUST_LOG").is_none() {
        if let Err(e) = filter_handle.reload(log_filter(&config.log_level)) {
            warn!("Failed to apply configured log level: {}", e);
        }
    }

    info!("Media directory: {}", config.media_dir.display());
    let patterns = config.profiles.playlist_patterns();
    let patterns: Vec<&str> = patterns.iter().map(Pattern::as_str).collect();
    info!("Playlist patterns: {}", patterns.join(" "));
    info!("Default item: {}", config.default_file.display());
    if let Some(initial) = &config.initial_file {
        info!("Initial item: {}", initial.display());
    }
    if let Some(dir) = &config.static_dir {
        info!("Serving web UI from {}", dir.display());
    }

    let (supervisor, player) = Supervisor::new(config.supervisor_options());
    let mut supervisor_task = tokio::spawn(supervisor.run());

    let app = api::create_router(AppState {
        player,
        playlist: config.playlist(),
        static_dir: config.static_dir.clone(),
    });

    // The router owns the last Player handle; once the server returns, the
    // command channel closes and the supervisor stops the display process
    let served = server::run(&config, app).await;

    match tokio::time::timeout(SUPERVISOR_SHUTDOWN_TIMEOUT, &mut supervisor_task).await {
        Ok(Ok(())) => info!("Playback supervisor stopped"),
        Ok(Err(e)) => error!("Playback supervisor task failed: {}", e),
        Err(_) => {
            warn!("Playback supervisor did not stop in time, aborting");
            supervisor_task.abort();
        }
    }

    served.context("Server error")?;
    info!("Shutdown complete");
    Ok(())
}

/// Filter from RUST_LOG, else `level` for this service's crates
fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "kiosk_player={level},kiosk_common={level},tower_http={level}",
            level = level
        )
        .into()
    })
}
