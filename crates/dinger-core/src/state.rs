// Board state container and its reducer.
//
// All lineup/loading/error state lives in one `BoardState`. It only changes
// through `BoardState::reduce`, which also enforces request sequencing: only
// the most recently started fetch may update the board.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::debug;

use crate::projection::PlayerViewModel;

/// User-facing text for every fetch failure. The cause is only logged.
pub const USER_FACING_ERROR: &str = "Failed to load data. Try again later.";

/// Load status of the board. Exactly one variant holds at a time, so the
/// board can never be Loaded and Error simultaneously.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch succeeded.
    Loaded,
    /// The last fetch failed; holds the message shown to the user.
    Error(String),
}

/// Everything the view needs to render the board.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    pub status: LoadStatus,
    /// Rows from the last successful fetch, sorted by baseHR.
    pub lineups: Vec<PlayerViewModel>,
    /// Local wall-clock time of the last successful fetch.
    pub last_updated: Option<NaiveDateTime>,
    /// Newest weather computation time reported by the backend.
    pub weather_updated: Option<DateTime<Utc>>,
    /// Sequence number of the newest fetch that has started. Fetch sequence
    /// numbers start at 1.
    pub latest_seq: u64,
    /// Lowest sequence number still accepted. Raised when the data source
    /// changes so results queued by the retired loop are dropped.
    pub min_seq: u64,
}

/// State transitions driven by the refresh scheduler.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardAction {
    FetchStarted {
        seq: u64,
    },
    FetchSucceeded {
        seq: u64,
        lineups: Vec<PlayerViewModel>,
        weather_updated: Option<DateTime<Utc>>,
        at: NaiveDateTime,
    },
    FetchFailed {
        seq: u64,
        message: String,
    },
    /// The scheduler was pointed at another dataset; its new loop numbers
    /// fetches from `min_seq` upwards.
    SourceChanged {
        min_seq: u64,
    },
}

impl BoardState {
    /// Apply an action. Returns `false` when the action was stale and
    /// discarded.
    pub fn reduce(&mut self, action: BoardAction) -> bool {
        match action {
            BoardAction::FetchStarted { seq } => {
                if seq <= self.latest_seq || seq < self.min_seq {
                    debug!(seq, latest = self.latest_seq, min = self.min_seq, "ignoring out-of-order fetch start");
                    return false;
                }
                self.latest_seq = seq;
                self.status = LoadStatus::Loading;
                true
            }
            BoardAction::FetchSucceeded {
                seq,
                lineups,
                weather_updated,
                at,
            } => {
                if !self.is_current(seq) {
                    return false;
                }
                self.lineups = lineups;
                self.weather_updated = weather_updated;
                self.last_updated = Some(at);
                self.status = LoadStatus::Loaded;
                true
            }
            BoardAction::FetchFailed { seq, message } => {
                if !self.is_current(seq) {
                    return false;
                }
                self.status = LoadStatus::Error(message);
                true
            }
            BoardAction::SourceChanged { min_seq } => {
                self.min_seq = self.min_seq.max(min_seq).max(self.latest_seq + 1);
                false
            }
        }
    }

    fn is_current(&self, seq: u64) -> bool {
        if seq != self.latest_seq || seq < self.min_seq {
            debug!(seq, latest = self.latest_seq, min = self.min_seq, "discarding stale fetch response");
            return false;
        }
        true
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            LoadStatus::Error(msg) => Some(msg),
            _ => None,
        }
    }

    /// True until the first successful fetch lands.
    pub fn awaiting_first_load(&self) -> bool {
        self.last_updated.is_none()
            && matches!(self.status, LoadStatus::Idle | LoadStatus::Loading)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
