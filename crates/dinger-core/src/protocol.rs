// Messages exchanged between the app orchestrator and the TUI.

use crate::client::DataSource;
use crate::state::BoardState;

/// Commands sent from the TUI to the app orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    /// Fetch now without waiting for the next scheduled tick.
    Refresh,
    /// Switch between the live and test datasets.
    ToggleDataSource,
    Quit,
}

/// Everything the view renders from, pushed after every state change.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSnapshot {
    pub board: BoardState,
    pub data_source: DataSource,
}

/// Updates pushed from the app orchestrator to the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    Snapshot(Box<AppSnapshot>),
}
