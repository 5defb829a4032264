// Lineup board entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config (writing the default board.toml on first run)
// 3. Build the HTTP lineup client
// 4. Create mpsc channels
// 5. Create the refresh scheduler and app state
// 6. Spawn app logic task
// 7. Run the TUI until the user quits
// 8. Cleanup on exit

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

use dinger_core::app::{self, AppState};
use dinger_core::client::{HttpLineupClient, LineupSource};
use dinger_core::config;
use dinger_core::scheduler::{RefreshScheduler, SystemClock};
use dinger_tui::tui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Lineup board starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: backend={}, tiers={}, source={}",
        config.backend.base_url,
        config.display.tier_scheme.label(),
        config.display.data_source.label()
    );

    // 3. HTTP client
    let lineups: Arc<dyn LineupSource> = Arc::new(
        HttpLineupClient::from_config(&config).context("failed to build HTTP client")?,
    );

    // 4. Channels
    let (refresh_tx, refresh_rx) = mpsc::channel(64);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    // 5. Scheduler and app state
    let tier_scheme = config.display.tier_scheme;
    let data_source = config.display.data_source;
    let scheduler = RefreshScheduler::new(lineups, Arc::new(SystemClock), refresh_tx);
    let app_state = AppState::new(config, scheduler);

    // 6. Spawn app logic task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(refresh_rx, cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 7. TUI blocks until 'q' or Ctrl+C
    if let Err(e) = tui::run(ui_rx, cmd_tx, tier_scheme, data_source).await {
        error!("TUI error: {:#}", e);
    }

    // 8. Cleanup: the app loop stops the scheduler once cmd_tx is gone
    if tokio::time::timeout(Duration::from_secs(5), app_handle)
        .await
        .is_err()
    {
        error!("Application loop did not stop within 5s");
    }

    info!("Lineup board shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("dinger.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dinger_core=info,dinger_tui=info,dinger=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
