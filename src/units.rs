//! Canonicalizes the entry site's distance and time text into meters and
//! seconds. Both conversions are total: anything unparseable yields 0.0,
//! which downstream code treats as "unusable".

use once_cell::sync::Lazy;
use regex::Regex;

pub const METERS_PER_FURLONG: f64 = 201.168;
pub const METERS_PER_MILE: f64 = 1609.344;
pub const METERS_PER_YARD: f64 = 0.9144;

static COMBINED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)?)\s*m(?:iles?)?\s+(\d+)\s*y(?:ards?)?$").unwrap());
static FRACTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\s+(\d+)/(\d+)\s*([mf])").unwrap());
static STANDARD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)?)\s*(miles?|m|furlongs?|f|yards?|y)?").unwrap());

/// Converts race-distance text to meters.
///
/// Accepts furlongs (`6F`, `6 1/2F`), miles (`1M`, `1 1/16M`, `1 mile`),
/// yards (`70Y`) and the combined mile-and-yards form (`1M 70Y`). A bare
/// number is read as furlongs, matching the source site's habit.
pub fn distance_to_meters(text: &str) -> f64 {
    let cleaned = text.trim().to_lowercase();
    if cleaned.is_empty() || cleaned == "-" || cleaned == "0" {
        return 0.0;
    }

    if let Some(caps) = COMBINED_RE.captures(&cleaned) {
        let miles: f64 = caps[1].parse().unwrap_or(0.0);
        let yards: f64 = caps[2].parse().unwrap_or(0.0);
        return miles * METERS_PER_MILE + yards * METERS_PER_YARD;
    }

    if let Some(caps) = FRACTION_RE.captures(&cleaned) {
        let whole: f64 = caps[1].parse().unwrap_or(0.0);
        let numerator: f64 = caps[2].parse().unwrap_or(0.0);
        let denominator: f64 = caps[3].parse().unwrap_or(1.0);
        if denominator > 0.0 {
            let total = whole + numerator / denominator;
            return match &caps[4] {
                "m" => total * METERS_PER_MILE,
                _ => total * METERS_PER_FURLONG,
            };
        }
    }

    if let Some(caps) = STANDARD_RE.captures(&cleaned) {
        let number: f64 = caps[1].parse().unwrap_or(0.0);
        let unit = caps.get(2).map(|m| m.as_str()).unwrap_or("f");
        return match unit {
            "m" | "mile" | "miles" => number * METERS_PER_MILE,
            "y" | "yard" | "yards" => number * METERS_PER_YARD,
            _ => number * METERS_PER_FURLONG,
        };
    }

    0.0
}

/// Converts finishing-time text to seconds. Accepts `1:25.61`
/// (minutes:seconds.hundredths) and bare decimal seconds.
pub fn time_to_seconds(text: &str) -> f64 {
    let cleaned = text.trim();
    if cleaned.is_empty() || cleaned == "-" || cleaned == "0" {
        return 0.0;
    }

    if let Some((minutes_part, seconds_part)) = cleaned.split_once(':') {
        if seconds_part.contains(':') {
            return 0.0;
        }
        let minutes = minutes_part.trim().parse::<i64>();
        let seconds = seconds_part.trim().parse::<f64>();
        if let (Ok(minutes), Ok(seconds)) = (minutes, seconds) {
            if minutes >= 0 && seconds.is_finite() {
                return minutes as f64 * 60.0 + seconds;
            }
        }
        return 0.0;
    }

    match cleaned.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() => seconds,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_numbers_are_furlongs() {
        assert!((distance_to_meters("6") - 6.0 * METERS_PER_FURLONG).abs() < 1e-9);
    }

    #[test]
    fn combined_mile_and_yards() {
        let expected = METERS_PER_MILE + 70.0 * METERS_PER_YARD;
        assert!((distance_to_meters("1M 70Y") - expected).abs() < 1e-9);
    }

    #[test]
    fn garbage_is_zero() {
        assert_eq!(distance_to_meters("about two laps"), 0.0);
        assert_eq!(time_to_seconds("1:2:3"), 0.0);
    }
}
