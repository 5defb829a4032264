// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the board state. The app
// orchestrator pushes `UiUpdate` messages over an mpsc channel; the TUI
// applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use tokio::sync::mpsc;

use dinger_core::classify::TierScheme;
use dinger_core::client::DataSource;
use dinger_core::projection::PlayerViewModel;
use dinger_core::protocol::{AppSnapshot, UiUpdate, UserCommand};
use dinger_core::state::BoardState;

use layout::build_layout;

/// Shown until the first successful fetch lands.
pub const LOADING_TEXT: &str = "Loading lineups and projections...";

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the application state for rendering.
pub struct ViewState {
    pub board: BoardState,
    pub data_source: DataSource,
    /// Coloring scheme for multiplier dots, fixed by configuration.
    pub tier_scheme: TierScheme,
    /// Index of the highlighted lineup row.
    pub selected: usize,
}

impl ViewState {
    pub fn new(tier_scheme: TierScheme, data_source: DataSource) -> Self {
        ViewState {
            board: BoardState::default(),
            data_source,
            tier_scheme,
            selected: 0,
        }
    }

    /// Apply a full snapshot from the app orchestrator. The selection is
    /// kept but clamped to the new row count.
    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        self.board = snapshot.board;
        self.data_source = snapshot.data_source;
        self.clamp_selection();
    }

    pub fn selected_row(&self) -> Option<&PlayerViewModel> {
        self.board.lineups.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.board.lineups.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.board.lineups.len().saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let len = self.board.lineups.len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::new(TierScheme::default(), DataSource::default())
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => state.apply_snapshot(*snapshot),
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Which body the main panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainView {
    Loading,
    Error,
    Table,
}

pub fn main_view(board: &BoardState) -> MainView {
    if board.error_message().is_some() {
        MainView::Error
    } else if board.awaiting_first_load() {
        MainView::Loading
    } else {
        MainView::Table
    }
}

/// Render the complete dashboard frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    match main_view(&state.board) {
        MainView::Loading => render_message(frame, layout.main_panel, LOADING_TEXT, Color::White),
        MainView::Error => {
            let msg = state.board.error_message().unwrap_or_default();
            render_message(frame, layout.main_panel, msg, Color::Red);
        }
        MainView::Table => widgets::lineup_table::render(frame, layout.main_panel, state),
    }
    widgets::detail::render(frame, layout.detail, state);
    widgets::help_bar::render(frame, layout.help_bar);
}

fn render_message(frame: &mut Frame, area: ratatui::layout::Rect, text: &str, color: Color) {
    let paragraph = Paragraph::new(text.to_string())
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Lineups"));
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    tier_scheme: TierScheme,
    data_source: DataSource,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::new(tier_scheme, data_source);
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // App is shutting down
                    None => break Ok(()),
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    // Mouse, resize, focus: the next render tick picks up size changes
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(anyhow::Error::new(e).context("terminal input error")),
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(anyhow::Error::new(e).context("failed to draw frame"));
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
