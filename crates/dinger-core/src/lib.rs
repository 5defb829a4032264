// Library root: the lineup board's data model, display logic, fetch
// boundary, refresh scheduler and app orchestrator. The terminal front end
// lives in the `dinger-tui` crate.

pub mod adapt;
pub mod app;
pub mod classify;
pub mod client;
pub mod config;
pub mod format;
pub mod projection;
pub mod protocol;
pub mod scheduler;
pub mod state;
