// Dashboard widgets. Each module exposes a `render(frame, area, ...)`.

pub mod detail;
pub mod help_bar;
pub mod lineup_table;
pub mod status_bar;
