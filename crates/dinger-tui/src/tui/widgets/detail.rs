// Detail line: wind report for the highlighted lineup row.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use dinger_core::projection::PlayerViewModel;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let line = match state.selected_row() {
        Some(row) => detail_line(row),
        None => Line::from(Span::styled("No player selected", Style::default().fg(Color::DarkGray))),
    };
    let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("Wind"));
    frame.render_widget(paragraph, area);
}

/// "<player> @ <park>: <wind text> (<favorability>)"; missing wind fields
/// read "No wind report".
pub fn detail_line(row: &PlayerViewModel) -> Line<'static> {
    let raw = &row.raw;
    let mut spans = vec![Span::styled(
        format!("{} @ {}: ", raw.player, raw.park),
        Style::default().fg(Color::White),
    )];

    let wind = raw.wind_relative_text.trim();
    if wind.is_empty() {
        spans.push(Span::styled("No wind report", Style::default().fg(Color::DarkGray)));
    } else {
        spans.push(Span::raw(wind.to_string()));
    }

    let favorability = raw.wind_favorability.trim();
    if !favorability.is_empty() {
        spans.push(Span::styled(
            format!(" ({favorability})"),
            Style::default().fg(favorability_color(favorability)),
        ));
    }
    Line::from(spans)
}

/// Favorability arrives as free text from the backend.
pub fn favorability_color(favorability: &str) -> Color {
    let lower = favorability.to_ascii_lowercase();
    if lower.starts_with("unfavorable") {
        Color::Blue
    } else if lower.starts_with("favorable") {
        Color::Red
    } else {
        Color::Gray
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dinger_core::adapt::adapt;
    use dinger_core::projection::PlayerProjection;

    fn row(wind: &str, favorability: &str) -> PlayerViewModel {
        adapt(vec![PlayerProjection {
            player: "Kyle Schwarber".into(),
            park: "Citizens Bank Park".into(),
            wind_relative_text: wind.into(),
            wind_favorability: favorability.into(),
            ..Default::default()
        }])
        .remove(0)
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn describes_wind_and_favorability() {
        let line = detail_line(&row("Out to RF", "Favorable"));
        assert_eq!(
            text(&line),
            "Kyle Schwarber @ Citizens Bank Park: Out to RF (Favorable)"
        );
        assert_eq!(line.spans.last().unwrap().style.fg, Some(Color::Red));
    }

    #[test]
    fn missing_wind_reads_placeholder() {
        let line = detail_line(&row("", ""));
        assert_eq!(text(&line), "Kyle Schwarber @ Citizens Bank Park: No wind report");
    }

    #[test]
    fn favorability_colors() {
        assert_eq!(favorability_color("Favorable"), Color::Red);
        assert_eq!(favorability_color("Unfavorable"), Color::Blue);
        assert_eq!(favorability_color("Neutral"), Color::Gray);
    }
}
