// Raw lineup batch -> sorted view model.

use chrono::{DateTime, Utc};

use crate::projection::{PlayerProjection, PlayerViewModel};

/// Build the board rows for one fetched batch.
///
/// Each row gets `adjusted_hr = round(baseHR * 100, 1)` and a switch-hitter
/// aware hand label. Rows are ordered by raw `baseHR`, highest first; the
/// sort is stable so equal values keep their fetch order. A missing `baseHR`
/// counts as zero and sorts last.
pub fn adapt(raw: Vec<PlayerProjection>) -> Vec<PlayerViewModel> {
    let mut rows: Vec<PlayerViewModel> = raw.into_iter().map(to_view_model).collect();
    rows.sort_by(|a, b| {
        b.raw
            .base_hr_or_zero()
            .total_cmp(&a.raw.base_hr_or_zero())
    });
    rows
}

fn to_view_model(raw: PlayerProjection) -> PlayerViewModel {
    let adjusted_hr = round_to_tenth(raw.base_hr_or_zero() * 100.0);
    let hand = raw.batter_hand.map(|h| h.code()).unwrap_or("");
    let batter_hand_display = if raw.is_switch_hitter() {
        format!("{hand} (S)")
    } else {
        hand.to_string()
    };
    PlayerViewModel {
        raw,
        adjusted_hr,
        batter_hand_display,
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Newest `weatherUpdated` timestamp in the batch. The backend stamps at
/// least one record per batch; unparseable stamps are skipped.
pub fn latest_weather_update(raw: &[PlayerProjection]) -> Option<DateTime<Utc>> {
    raw.iter()
        .filter_map(|p| p.weather_updated.as_deref())
        .filter_map(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .max()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_adjusted_hr;
    use crate::projection::Hand;

    fn rec(player: &str, base_hr: Option<f64>) -> PlayerProjection {
        PlayerProjection {
            player: player.to_string(),
            base_hr,
            batter_hand: Some(Hand::Right),
            original_batter_hand: Some(Hand::Right),
            ..Default::default()
        }
    }

    #[test]
    fn empty_batch() {
        assert!(adapt(Vec::new()).is_empty());
    }

    #[test]
    fn adjusted_hr_rounds_to_tenth() {
        let rows = adapt(vec![rec("A", Some(0.18)), rec("B", Some(0.07349))]);
        assert_eq!(format_adjusted_hr(rows[0].adjusted_hr), "18.0");
        assert_eq!(format_adjusted_hr(rows[1].adjusted_hr), "7.3");
    }

    #[test]
    fn sorted_descending_by_base_hr() {
        let rows = adapt(vec![
            rec("low", Some(0.05)),
            rec("high", Some(0.21)),
            rec("mid", Some(0.12)),
        ]);
        let names: Vec<&str> = rows.iter().map(|r| r.player()).collect();
        assert_eq!(names, vec!["high", "mid", "low"]);
    }

    #[test]
    fn ties_keep_fetch_order() {
        let rows = adapt(vec![
            rec("first", Some(0.10)),
            rec("top", Some(0.20)),
            rec("second", Some(0.10)),
            rec("third", Some(0.10)),
        ]);
        let names: Vec<&str> = rows.iter().map(|r| r.player()).collect();
        assert_eq!(names, vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn sorts_on_raw_value_not_rounded_value() {
        // Both round to 10.0 but the raw values differ.
        let rows = adapt(vec![rec("a", Some(0.09996)), rec("b", Some(0.10004))]);
        assert_eq!(rows[0].player(), "b");
        assert_eq!(rows[0].adjusted_hr, rows[1].adjusted_hr);
    }

    #[test]
    fn missing_base_hr_sorts_last_without_failing_batch() {
        let rows = adapt(vec![rec("missing", None), rec("present", Some(0.01))]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].player(), "present");
        assert_eq!(rows[1].player(), "missing");
        assert_eq!(format_adjusted_hr(rows[1].adjusted_hr), "0.0");
    }

    #[test]
    fn switch_hitter_gets_suffix() {
        let mut switch = rec("Switchy", Some(0.1));
        switch.batter_hand = Some(Hand::Left);
        switch.original_batter_hand = Some(Hand::Switch);
        let rows = adapt(vec![switch, rec("Righty", Some(0.05))]);
        assert_eq!(rows[0].batter_hand_display, "L (S)");
        assert_eq!(rows[1].batter_hand_display, "R");
    }

    #[test]
    fn length_is_preserved() {
        let batch: Vec<PlayerProjection> = (0..37)
            .map(|i| rec(&format!("p{i}"), Some((i % 5) as f64 / 100.0)))
            .collect();
        let rows = adapt(batch);
        assert_eq!(rows.len(), 37);
        assert!(rows
            .windows(2)
            .all(|w| w[0].raw.base_hr_or_zero() >= w[1].raw.base_hr_or_zero()));
    }

    #[test]
    fn latest_weather_update_picks_newest() {
        let mut a = rec("a", Some(0.1));
        a.weather_updated = Some("2026-06-01T17:00:00Z".into());
        let mut b = rec("b", Some(0.1));
        b.weather_updated = Some("2026-06-01T14:30:00-04:00".into());
        let mut c = rec("c", Some(0.1));
        c.weather_updated = Some("yesterday".into());
        let d = rec("d", Some(0.1));

        let latest = latest_weather_update(&[a, b, c, d]).unwrap();
        assert_eq!(latest.to_rfc3339(), "2026-06-01T18:30:00+00:00");
    }

    #[test]
    fn latest_weather_update_none_when_absent() {
        assert!(latest_weather_update(&[rec("a", Some(0.1))]).is_none());
    }
}
