// Application state and orchestration logic.
//
// The central event loop: consumes refresh events from the scheduler and
// user commands from the TUI, folds them into `BoardState`, and pushes a
// fresh snapshot to the TUI after every change.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::adapt::{adapt, latest_weather_update};
use crate::config::Config;
use crate::protocol::{AppSnapshot, UiUpdate, UserCommand};
use crate::scheduler::{RefreshEvent, RefreshScheduler};
use crate::state::{BoardAction, BoardState, USER_FACING_ERROR};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub board: BoardState,
    pub scheduler: RefreshScheduler,
}

impl AppState {
    pub fn new(config: Config, scheduler: RefreshScheduler) -> Self {
        AppState {
            config,
            board: BoardState::default(),
            scheduler,
        }
    }

    /// Fold one scheduler event into the board. Returns `true` when the
    /// board changed.
    pub fn handle_refresh_event(&mut self, event: RefreshEvent) -> bool {
        let action = match event {
            RefreshEvent::Started { seq, .. } => BoardAction::FetchStarted { seq },
            RefreshEvent::Finished {
                seq,
                at,
                result: Ok(records),
                ..
            } => {
                let weather_updated = latest_weather_update(&records);
                BoardAction::FetchSucceeded {
                    seq,
                    lineups: adapt(records),
                    weather_updated,
                    at,
                }
            }
            // The cause was already logged at the fetch boundary.
            RefreshEvent::Finished {
                seq,
                result: Err(_),
                ..
            } => BoardAction::FetchFailed {
                seq,
                message: USER_FACING_ERROR.to_string(),
            },
        };
        self.board.reduce(action)
    }

    pub fn build_snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            board: self.board.clone(),
            data_source: self.scheduler.data_source(),
        }
    }

    /// Apply a non-quit user command. Returns `true` when a snapshot should
    /// be pushed.
    pub fn handle_user_command(&mut self, cmd: UserCommand) -> bool {
        match cmd {
            UserCommand::Refresh => {
                if !self.scheduler.refresh_now() {
                    debug!("refresh requested while scheduler is not running");
                }
                false
            }
            UserCommand::ToggleDataSource => {
                let next = self.scheduler.data_source().toggled();
                info!("Switching data source to {}", next.label());
                let min_seq = self.scheduler.reconfigure(next);
                self.board.reduce(BoardAction::SourceChanged { min_seq });
                true
            }
            UserCommand::Quit => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Starts the refresh scheduler on the configured data source, then listens
/// on two channels using `tokio::select!`:
/// 1. Refresh events from the scheduler
/// 2. User commands from the TUI
///
/// Pushes UI updates through `ui_tx` for the TUI render loop. The scheduler
/// is stopped before returning.
pub async fn run(
    mut refresh_rx: mpsc::Receiver<RefreshEvent>,
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    let initial_source = state.config.display.data_source;
    state.scheduler.start(initial_source);
    push_snapshot(&state, &ui_tx).await;

    loop {
        tokio::select! {
            // --- Scheduler events ---
            event = refresh_rx.recv() => {
                match event {
                    Some(event) => {
                        if state.handle_refresh_event(event) {
                            push_snapshot(&state, &ui_tx).await;
                        }
                    }
                    None => {
                        info!("Refresh channel closed, shutting down");
                        break;
                    }
                }
            }

            // --- User commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        if state.handle_user_command(cmd) {
                            push_snapshot(&state, &ui_tx).await;
                        }
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    // Cleanup
    state.scheduler.stop();
    info!("Application event loop exiting");
    Ok(())
}

async fn push_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let snapshot = state.build_snapshot();
    let _ = ui_tx.send(UiUpdate::Snapshot(Box::new(snapshot))).await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
