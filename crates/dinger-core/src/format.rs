// Display formatting for lineup cells: multiplier percentages, game times,
// encoded weather glyphs and clock labels. Everything here is pure and must
// degrade gracefully on malformed backend text.

use chrono::Timelike;

use crate::projection::NEUTRAL_MULTIPLIER;

/// Render a multiplier as a whole-number percentage ("115%").
/// A missing multiplier is shown as neutral ("100%").
pub fn format_percent(value: Option<f64>) -> String {
    let v = value.unwrap_or(NEUTRAL_MULTIPLIER);
    format!("{:.0}%", (v * 100.0).round())
}

/// Render an adjusted HR% value with one decimal ("18.0").
pub fn format_adjusted_hr(value: f64) -> String {
    format!("{value:.1}")
}

/// Strip the leading zero from the hour of an "HH:MM" game time.
///
/// "09:05" -> "9:05", "14:30" -> "14:30". The minute part is kept verbatim.
/// Input without a colon is returned unchanged; a non-numeric hour is kept
/// as written.
pub fn format_time(time_str: &str) -> String {
    let Some((hour_str, minute_part)) = time_str.split_once(':') else {
        return time_str.to_string();
    };
    let hour = match hour_str.trim().parse::<u32>() {
        Ok(h) => h.to_string(),
        Err(_) => hour_str.to_string(),
    };
    format!("{hour}:{minute_part}")
}

/// Decoded `weatherEmoji` field: wind direction arrow, temperature,
/// humidity and wind speed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherGlyphs {
    pub arrow: String,
    pub temperature: String,
    pub humidity: String,
    pub wind: String,
}

impl WeatherGlyphs {
    pub fn tokens(&self) -> [&str; 4] {
        [&self.arrow, &self.temperature, &self.humidity, &self.wind]
    }
}

impl std::fmt::Display for WeatherGlyphs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.arrow, self.temperature, self.humidity, self.wind
        )
    }
}

/// Split a space-delimited weather string into its four glyph tokens.
/// Missing tokens are empty strings; extra tokens are ignored.
pub fn decode_weather(emoji: &str) -> WeatherGlyphs {
    let mut parts = emoji.split(' ').map(str::to_string);
    WeatherGlyphs {
        arrow: parts.next().unwrap_or_default(),
        temperature: parts.next().unwrap_or_default(),
        humidity: parts.next().unwrap_or_default(),
        wind: parts.next().unwrap_or_default(),
    }
}

/// 12-hour clock label without a padded hour ("2:47 PM", "12:05 AM").
pub fn format_clock<T: Timelike>(time: &T) -> String {
    let (is_pm, hour) = time.hour12();
    let suffix = if is_pm { "PM" } else { "AM" };
    format!("{}:{:02} {}", hour, time.minute(), suffix)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
