// Favorability tiers for HR multipliers.
//
// Two threshold schemes exist: a five-tier heat scale (red = hottest) and a
// three-tier traffic light (green = most favorable). Which one the board uses
// is a configuration choice; every call site goes through `TierScheme`.

use serde::Deserialize;

use crate::projection::NEUTRAL_MULTIPLIER;

/// Discrete favorability bucket. The three-tier scheme only produces
/// `Green`, `Yellow` and `Red`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierScheme {
    /// >1.15 Red, >1.05 Orange, >0.95 Yellow, >0.85 Green, else Blue.
    #[default]
    FiveTier,
    /// >=1.2 Green, >=1.0 Yellow, else Red.
    ThreeTier,
}

impl TierScheme {
    /// Map a multiplier to its tier. A missing multiplier is neutral (1.0).
    /// Total over f64: NaN fails every comparison and lands in the lowest
    /// tier of the scheme.
    pub fn classify(self, multiplier: Option<f64>) -> Tier {
        let m = multiplier.unwrap_or(NEUTRAL_MULTIPLIER);
        match self {
            TierScheme::FiveTier => {
                if m > 1.15 {
                    Tier::Red
                } else if m > 1.05 {
                    Tier::Orange
                } else if m > 0.95 {
                    Tier::Yellow
                } else if m > 0.85 {
                    Tier::Green
                } else {
                    Tier::Blue
                }
            }
            TierScheme::ThreeTier => {
                if m >= 1.2 {
                    Tier::Green
                } else if m >= 1.0 {
                    Tier::Yellow
                } else {
                    Tier::Red
                }
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TierScheme::FiveTier => "5-tier",
            TierScheme::ThreeTier => "3-tier",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
