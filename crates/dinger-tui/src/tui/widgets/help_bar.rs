// Help bar widget: keyboard shortcut hints.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

const KEYS: &[(&str, &str)] = &[
    ("q", "Quit"),
    ("r", "Refresh"),
    ("t", "Live/Test"),
    ("j/k", "Move"),
    ("g/G", "Top/Bottom"),
];

pub fn render(frame: &mut Frame, area: Rect) {
    let mut spans = Vec::new();
    for (key, action) in KEYS {
        spans.push(Span::styled(
            format!(" {key} "),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Gray)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(" {action}  "), Style::default().fg(Color::Gray)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
