// Lineup table widget: one row per batter, sorted by projected HR chance.
//
// Columns: Batter, Hand, Batter x, Pitcher, Throws, Pitcher x, Park, Park x,
// Weather x, HR%, Time. Multiplier cells carry a dot colored by tier.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Row, Table, TableState};
use ratatui::Frame;

use dinger_core::classify::{Tier, TierScheme};
use dinger_core::format::{decode_weather, format_adjusted_hr, format_percent, format_time};
use dinger_core::projection::PlayerViewModel;

use crate::tui::ViewState;

const DOT: &str = "●";

/// Render the lineup table into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let header = Row::new(vec![
        Cell::from("Batter"),
        Cell::from("Hand"),
        Cell::from("Batter ×"),
        Cell::from("Pitcher"),
        Cell::from("Throws"),
        Cell::from("Pitcher ×"),
        Cell::from("Park"),
        Cell::from("Park ×"),
        Cell::from("Weather ×"),
        Cell::from("HR%"),
        Cell::from("Time"),
    ])
    .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    let scheme = state.tier_scheme;
    let rows: Vec<Row> = state
        .board
        .lineups
        .iter()
        .map(|row| build_row(row, scheme))
        .collect();

    let widths = [
        Constraint::Min(16),
        Constraint::Length(6),
        Constraint::Length(9),
        Constraint::Min(14),
        Constraint::Length(6),
        Constraint::Length(9),
        Constraint::Min(14),
        Constraint::Length(7),
        Constraint::Length(22),
        Constraint::Length(6),
        Constraint::Length(6),
    ];

    let title = format!(
        "Lineups ({}) [{}]",
        state.board.lineups.len(),
        scheme.label()
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(">> ");

    let mut table_state = TableState::default();
    if !state.board.lineups.is_empty() {
        table_state.select(Some(state.selected));
    }
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn build_row(row: &PlayerViewModel, scheme: TierScheme) -> Row<'static> {
    let raw = &row.raw;
    let weather = decode_weather(&raw.weather_emoji);

    let mut weather_spans = multiplier_spans(raw.weather_multiplier, scheme);
    let glyphs = weather.to_string();
    if !glyphs.trim().is_empty() {
        weather_spans.push(Span::styled(
            format!(" {}", glyphs.trim()),
            Style::default().fg(Color::Gray),
        ));
    }

    Row::new(vec![
        Cell::from(raw.player.clone()),
        Cell::from(row.batter_hand_display.clone()),
        Cell::from(Line::from(multiplier_spans(raw.batter_multiplier, scheme))),
        Cell::from(raw.pitcher.clone()),
        Cell::from(row.pitcher_hand_display()),
        Cell::from(Line::from(multiplier_spans(raw.pitcher_multiplier, scheme))),
        Cell::from(raw.park.clone()),
        Cell::from(Line::from(multiplier_spans(raw.park_multiplier, scheme))),
        Cell::from(Line::from(weather_spans)),
        Cell::from(format!("{}%", format_adjusted_hr(row.adjusted_hr))),
        Cell::from(format_time(&raw.game_time)),
    ])
}

/// Colored tier dot followed by the multiplier as a percentage.
pub fn multiplier_spans(multiplier: Option<f64>, scheme: TierScheme) -> Vec<Span<'static>> {
    let tier = scheme.classify(multiplier);
    vec![
        Span::styled(DOT, Style::default().fg(tier_color(tier))),
        Span::raw(format!(" {}", format_percent(multiplier))),
    ]
}

/// Terminal color for a favorability tier.
pub fn tier_color(tier: Tier) -> Color {
    match tier {
        Tier::Red => Color::Red,
        Tier::Orange => Color::Rgb(255, 140, 0),
        Tier::Yellow => Color::Yellow,
        Tier::Green => Color::Green,
        Tier::Blue => Color::Blue,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dinger_core::adapt::adapt;
    use dinger_core::client::DataSource;
    use dinger_core::projection::{Hand, PlayerProjection};
    use dinger_core::protocol::AppSnapshot;
    use dinger_core::state::{BoardAction, BoardState};
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;

    fn projection(player: &str, base_hr: f64) -> PlayerProjection {
        PlayerProjection {
            player: player.to_string(),
            pitcher: "Zack Wheeler".into(),
            park: "Truist Park".into(),
            batter_hand: Some(Hand::Right),
            original_batter_hand: Some(Hand::Switch),
            pitcher_hand: Some(Hand::Right),
            batter_multiplier: Some(1.2),
            pitcher_multiplier: Some(0.8),
            park_multiplier: None,
            weather_multiplier: Some(1.07),
            base_hr: Some(base_hr),
            weather_emoji: "↗ 81F 55% 9mph".into(),
            game_time: "19:20".into(),
            ..Default::default()
        }
    }

    fn state_with(records: Vec<PlayerProjection>, scheme: TierScheme) -> ViewState {
        let mut board = BoardState::default();
        board.reduce(BoardAction::FetchStarted { seq: 1 });
        board.reduce(BoardAction::FetchSucceeded {
            seq: 1,
            lineups: adapt(records),
            weather_updated: None,
            at: NaiveDate::from_ymd_opt(2026, 6, 1)
                .unwrap()
                .and_hms_opt(9, 5, 0)
                .unwrap(),
        });
        let mut state = ViewState::new(scheme, DataSource::Live);
        state.apply_snapshot(AppSnapshot {
            board,
            data_source: DataSource::Live,
        });
        state
    }

    fn render_buffer(state: &ViewState) -> Buffer {
        let backend = TestBackend::new(150, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn buffer_text(buffer: &Buffer) -> String {
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    /// Color of the first cell on `row` whose symbol is the tier dot,
    /// scanning from column `from`.
    fn dot_color_after(buffer: &Buffer, row: u16, from: u16) -> Option<Color> {
        (from..buffer.area.width)
            .map(|x| &buffer[(x, row)])
            .find(|cell| cell.symbol() == DOT)
            .map(|cell| cell.fg)
    }

    #[test]
    fn tier_colors_are_distinct() {
        let colors = [
            tier_color(Tier::Red),
            tier_color(Tier::Orange),
            tier_color(Tier::Yellow),
            tier_color(Tier::Green),
            tier_color(Tier::Blue),
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn multiplier_spans_show_dot_and_percent() {
        let spans = multiplier_spans(Some(1.2), TierScheme::FiveTier);
        assert_eq!(spans[0].content, DOT);
        assert_eq!(spans[0].style.fg, Some(Color::Red));
        assert_eq!(spans[1].content, " 120%");

        let missing = multiplier_spans(None, TierScheme::FiveTier);
        assert_eq!(missing[0].style.fg, Some(Color::Yellow));
        assert_eq!(missing[1].content, " 100%");
    }

    #[test]
    fn three_tier_scheme_recolors_dots() {
        let spans = multiplier_spans(Some(1.2), TierScheme::ThreeTier);
        assert_eq!(spans[0].style.fg, Some(Color::Green));
        let spans = multiplier_spans(Some(0.8), TierScheme::ThreeTier);
        assert_eq!(spans[0].style.fg, Some(Color::Red));
    }

    #[test]
    fn renders_headers_and_row_content() {
        let state = state_with(vec![projection("Ozzie Albies", 0.064)], TierScheme::FiveTier);
        let text = buffer_text(&render_buffer(&state));

        for header in ["Batter", "Hand", "Pitcher", "Throws", "Park", "Weather", "HR%", "Time"] {
            assert!(text.contains(header), "missing header {header}");
        }
        assert!(text.contains("Ozzie Albies"));
        assert!(text.contains("R (S)"));
        assert!(text.contains("120%"));
        assert!(text.contains("80%"));
        assert!(text.contains("100%"));
        assert!(text.contains("107%"));
        assert!(text.contains("↗ 81F 55% 9mph"));
        assert!(text.contains("6.4%"));
        assert!(text.contains("19:20"));
        assert!(text.contains("Lineups (1) [5-tier]"));
    }

    #[test]
    fn rows_follow_sorted_order() {
        let state = state_with(
            vec![projection("Low Guy", 0.05), projection("High Guy", 0.20)],
            TierScheme::FiveTier,
        );
        let text = buffer_text(&render_buffer(&state));
        let high = text.find("High Guy").unwrap();
        let low = text.find("Low Guy").unwrap();
        assert!(high < low);
    }

    #[test]
    fn batter_dot_uses_tier_color() {
        let state = state_with(vec![projection("Ozzie Albies", 0.064)], TierScheme::FiveTier);
        let buffer = render_buffer(&state);
        // Border row, header row, then the first data row.
        assert_eq!(dot_color_after(&buffer, 2, 0), Some(Color::Red));
    }

    #[test]
    fn selected_row_is_marked() {
        let mut state = state_with(
            vec![projection("First", 0.2), projection("Second", 0.1)],
            TierScheme::FiveTier,
        );
        state.select_next();
        let buffer = render_buffer(&state);
        let row_text = |y: u16| -> String {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect()
        };
        assert!(row_text(3).contains(">> Second"));
        assert!(!row_text(2).contains(">>"));
    }

    #[test]
    fn empty_weather_shows_only_multiplier() {
        let mut record = projection("No Weather", 0.1);
        record.weather_emoji = String::new();
        record.weather_multiplier = None;
        let state = state_with(vec![record], TierScheme::FiveTier);
        let text = buffer_text(&render_buffer(&state));
        assert!(text.contains("No Weather"));
        assert!(!text.contains("mph"));
    }
}
