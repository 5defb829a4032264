// Status bar widget: title, data source, refresh times, activity indicator.

use chrono::Local;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use dinger_core::client::DataSource;
use dinger_core::format::format_clock;
use dinger_core::state::BoardState;

use crate::tui::ViewState;

pub const TITLE: &str = "HR Multipliers";

/// Render the status bar into the given area.
///
/// Layout: [title] [LIVE|TEST] | Updated: h:mm | Weather as of h:mm [refreshing]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(status_spans(state)))
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

pub fn status_spans(state: &ViewState) -> Vec<Span<'static>> {
    let separator = || Span::styled(" | ", Style::default().fg(Color::Gray));
    let mut spans = vec![Span::styled(
        format!(" {TITLE} "),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )];

    let (label, color) = source_indicator(state.data_source);
    spans.push(Span::styled(
        format!("[{label}]"),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ));

    if let Some(updated) = updated_text(&state.board) {
        spans.push(separator());
        spans.push(Span::styled(updated, Style::default().fg(Color::White)));
    }

    if let Some(weather) = weather_text(&state.board) {
        spans.push(separator());
        spans.push(Span::styled(weather, Style::default().fg(Color::Cyan)));
    }

    if state.board.is_loading() {
        spans.push(separator());
        spans.push(Span::styled(
            "⟳ refreshing",
            Style::default().fg(Color::Yellow),
        ));
    }
    spans
}

/// Return the data source label and its color.
pub fn source_indicator(source: DataSource) -> (&'static str, Color) {
    match source {
        DataSource::Live => (source.label(), Color::Green),
        DataSource::Test => (source.label(), Color::Magenta),
    }
}

pub fn updated_text(board: &BoardState) -> Option<String> {
    board
        .last_updated
        .map(|t| format!("Updated: {}", format_clock(&t)))
}

/// Weather timestamps arrive in UTC; show them in local time.
pub fn weather_text(board: &BoardState) -> Option<String> {
    board
        .weather_updated
        .map(|t| format!("Weather as of {}", format_clock(&t.with_timezone(&Local))))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use dinger_core::protocol::AppSnapshot;
    use dinger_core::state::BoardAction;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn board_at(hour: u32, minute: u32) -> BoardState {
        let mut board = BoardState::default();
        board.reduce(BoardAction::FetchStarted { seq: 1 });
        board.reduce(BoardAction::FetchSucceeded {
            seq: 1,
            lineups: Vec::new(),
            weather_updated: None,
            at: NaiveDate::from_ymd_opt(2026, 6, 1)
                .unwrap()
                .and_hms_opt(hour, minute, 0)
                .unwrap(),
        });
        board
    }

    fn view(board: BoardState, data_source: DataSource) -> ViewState {
        let mut state = ViewState::default();
        state.apply_snapshot(AppSnapshot { board, data_source });
        state
    }

    fn render_to_string(state: &ViewState) -> String {
        let backend = TestBackend::new(100, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn source_indicator_labels() {
        assert_eq!(source_indicator(DataSource::Live).0, "LIVE");
        assert_eq!(source_indicator(DataSource::Test).0, "TEST");
        assert_ne!(
            source_indicator(DataSource::Live).1,
            source_indicator(DataSource::Test).1
        );
    }

    #[test]
    fn updated_text_uses_twelve_hour_clock() {
        assert_eq!(updated_text(&board_at(14, 5)).as_deref(), Some("Updated: 2:05 PM"));
        assert_eq!(updated_text(&board_at(0, 30)).as_deref(), Some("Updated: 12:30 AM"));
        assert_eq!(updated_text(&BoardState::default()), None);
    }

    #[test]
    fn weather_text_present_only_with_timestamp() {
        let mut board = board_at(9, 0);
        assert_eq!(weather_text(&board), None);

        board.weather_updated = Some(Utc.with_ymd_and_hms(2026, 6, 1, 16, 0, 0).unwrap());
        let text = weather_text(&board).unwrap();
        assert!(text.starts_with("Weather as of "));
        assert!(text.ends_with(" AM") || text.ends_with(" PM"));
    }

    #[test]
    fn renders_title_source_and_time() {
        let screen = render_to_string(&view(board_at(14, 0), DataSource::Test));
        assert!(screen.contains(TITLE));
        assert!(screen.contains("[TEST]"));
        assert!(screen.contains("Updated: 2:00 PM"));
        assert!(!screen.contains("refreshing"));
    }

    #[test]
    fn shows_refreshing_while_loading() {
        let mut board = board_at(14, 0);
        board.reduce(BoardAction::FetchStarted { seq: 2 });
        let screen = render_to_string(&view(board, DataSource::Live));
        assert!(screen.contains("[LIVE]"));
        assert!(screen.contains("refreshing"));
        assert!(screen.contains("Updated: 2:00 PM"));
    }
}
