// Raw lineup records as served by the projections backend, and the derived
// per-row view model the board renders.
//
// Deserialization is deliberately lenient: a single bad field in one record
// must never fail the whole batch.

use serde::{Deserialize, Deserializer};

/// Neutral multiplier value: no adjustment to home-run likelihood.
pub const NEUTRAL_MULTIPLIER: f64 = 1.0;

// ---------------------------------------------------------------------------
// Handedness
// ---------------------------------------------------------------------------

/// Batting or throwing side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hand {
    Left,
    Right,
    Switch,
}

impl Hand {
    /// Parse a backend handedness code ("L", "R", "S"). Case-insensitive;
    /// anything else yields `None`.
    pub fn from_code(code: &str) -> Option<Hand> {
        match code.trim() {
            "L" | "l" => Some(Hand::Left),
            "R" | "r" => Some(Hand::Right),
            "S" | "s" => Some(Hand::Switch),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Hand::Left => "L",
            Hand::Right => "R",
            Hand::Switch => "S",
        }
    }
}

// ---------------------------------------------------------------------------
// PlayerProjection (raw)
// ---------------------------------------------------------------------------

/// One batter-versus-pitcher row as returned by `GET /lineups`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerProjection {
    #[serde(deserialize_with = "lenient_string")]
    pub player: String,
    #[serde(deserialize_with = "lenient_hand")]
    pub batter_hand: Option<Hand>,
    #[serde(deserialize_with = "lenient_hand")]
    pub original_batter_hand: Option<Hand>,
    #[serde(deserialize_with = "lenient_string")]
    pub pitcher: String,
    #[serde(deserialize_with = "lenient_hand")]
    pub pitcher_hand: Option<Hand>,
    #[serde(deserialize_with = "lenient_string")]
    pub park: String,
    #[serde(deserialize_with = "lenient_number")]
    pub batter_multiplier: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub pitcher_multiplier: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub park_multiplier: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub weather_multiplier: Option<f64>,
    #[serde(rename = "baseHR", deserialize_with = "lenient_number")]
    pub base_hr: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub weather_emoji: String,
    #[serde(deserialize_with = "lenient_string")]
    pub wind_relative_text: String,
    #[serde(deserialize_with = "lenient_string")]
    pub wind_favorability: String,
    #[serde(deserialize_with = "lenient_string")]
    pub game_time: String,
    /// RFC 3339 time the backend last computed weather for this game.
    #[serde(deserialize_with = "lenient_opt_string")]
    pub weather_updated: Option<String>,
}

impl PlayerProjection {
    /// Base home-run probability; a missing value counts as zero.
    pub fn base_hr_or_zero(&self) -> f64 {
        self.base_hr.unwrap_or(0.0)
    }

    /// Whether the backend flagged this batter as a switch hitter.
    pub fn is_switch_hitter(&self) -> bool {
        self.original_batter_hand == Some(Hand::Switch)
    }
}

// ---------------------------------------------------------------------------
// PlayerViewModel (derived)
// ---------------------------------------------------------------------------

/// A display-ready lineup row. Built once per fetch by `adapt::adapt`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerViewModel {
    pub raw: PlayerProjection,
    /// `baseHR * 100`, rounded to one decimal.
    pub adjusted_hr: f64,
    /// Batter hand code, suffixed with " (S)" for switch hitters.
    pub batter_hand_display: String,
}

impl PlayerViewModel {
    pub fn player(&self) -> &str {
        &self.raw.player
    }

    pub fn pitcher_hand_display(&self) -> &'static str {
        self.raw.pitcher_hand.map(Hand::code).unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Lenient field deserializers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// Accepts a JSON number or a numeric string. Anything else (null, bool,
/// garbage text) becomes `None`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrText::Number(n)) if n.is_finite() => Some(n),
        Some(NumberOrText::Text(s)) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    })
}

fn lenient_hand<'de, D>(deserializer: D) -> Result<Option<Hand>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrText::Text(s)) => Hand::from_code(&s),
        _ => None,
    })
}

/// Null or non-string values collapse to an empty string.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrText::Text(s)) => s,
        Some(NumberOrText::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

/// Non-empty strings only; null, numbers and blank text become `None`.
fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrText::Text(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_record() {
        let json = r#"{
            "player": "Aaron Judge",
            "batterHand": "R",
            "originalBatterHand": "R",
            "pitcher": "Chris Sale",
            "pitcherHand": "L",
            "park": "Yankee Stadium",
            "batterMultiplier": 1.22,
            "pitcherMultiplier": 0.91,
            "parkMultiplier": 1.08,
            "weatherMultiplier": 1.03,
            "baseHR": 0.18,
            "weatherEmoji": "↑ 72F 60% 5mph",
            "windRelativeText": "Out to CF",
            "windFavorability": "Favorable",
            "gameTime": "19:05",
            "weatherUpdated": "2026-06-01T18:00:00Z"
        }"#;
        let p: PlayerProjection = serde_json::from_str(json).unwrap();
        assert_eq!(p.player, "Aaron Judge");
        assert_eq!(p.batter_hand, Some(Hand::Right));
        assert_eq!(p.pitcher_hand, Some(Hand::Left));
        assert_eq!(p.batter_multiplier, Some(1.22));
        assert_eq!(p.base_hr, Some(0.18));
        assert_eq!(p.weather_emoji, "↑ 72F 60% 5mph");
        assert_eq!(p.game_time, "19:05");
        assert_eq!(p.weather_updated.as_deref(), Some("2026-06-01T18:00:00Z"));
        assert!(!p.is_switch_hitter());
    }

    #[test]
    fn missing_fields_default() {
        let p: PlayerProjection = serde_json::from_str(r#"{"player": "Nobody"}"#).unwrap();
        assert_eq!(p.player, "Nobody");
        assert!(p.base_hr.is_none());
        assert!((p.base_hr_or_zero() - 0.0).abs() < f64::EPSILON);
        assert!(p.batter_multiplier.is_none());
        assert!(p.weather_emoji.is_empty());
        assert!(p.weather_updated.is_none());
    }

    #[test]
    fn numeric_strings_and_nulls() {
        let json = r#"{
            "batterMultiplier": "1.15",
            "pitcherMultiplier": null,
            "parkMultiplier": "n/a",
            "baseHR": "0.07",
            "weatherEmoji": null
        }"#;
        let p: PlayerProjection = serde_json::from_str(json).unwrap();
        assert_eq!(p.batter_multiplier, Some(1.15));
        assert_eq!(p.pitcher_multiplier, None);
        assert_eq!(p.park_multiplier, None);
        assert_eq!(p.base_hr, Some(0.07));
        assert!(p.weather_emoji.is_empty());
    }

    #[test]
    fn null_names_and_bad_timestamps_do_not_fail_batch() {
        let json = r#"[
            {"player": null, "pitcher": 42, "park": null, "baseHR": 0.1},
            {"player": "A", "weatherUpdated": 1717257600},
            {"player": "B", "weatherUpdated": "  ", "baseHR": 0.2}
        ]"#;
        let batch: Vec<PlayerProjection> = serde_json::from_str(json).unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0].player, "");
        assert_eq!(batch[0].pitcher, "42");
        assert_eq!(batch[0].park, "");
        assert_eq!(batch[0].base_hr, Some(0.1));
        assert_eq!(batch[1].player, "A");
        assert!(batch[1].weather_updated.is_none());
        assert!(batch[2].weather_updated.is_none());
        assert_eq!(batch[2].base_hr, Some(0.2));
    }

    #[test]
    fn unknown_hand_codes_are_dropped() {
        let json = r#"{"batterHand": "X", "originalBatterHand": "S", "pitcherHand": 3}"#;
        let p: PlayerProjection = serde_json::from_str(json).unwrap();
        assert_eq!(p.batter_hand, None);
        assert_eq!(p.pitcher_hand, None);
        assert!(p.is_switch_hitter());
    }

    #[test]
    fn hand_codes_round_trip_to_display() {
        for code in ["L", "R", "S"] {
            assert_eq!(Hand::from_code(code).map(Hand::code), Some(code));
        }
        assert_eq!(Hand::from_code(" l "), Some(Hand::Left));
        assert_eq!(Hand::from_code(""), None);
    }
}
