//! Performance scoring: projects a horse's latest finishing time onto
//! today's race and produces an adjusted pace per 100 meters. Lower is
//! better. Records without a usable time or distance score as invalid and
//! sort behind every valid score.

use serde::{Deserialize, Serialize};

use crate::essential::EssentialRecord;
use crate::units::{distance_to_meters, time_to_seconds};

/// Used when today's race distance is unknown or unparseable.
pub const FALLBACK_TARGET_METERS: f64 = 1200.0;
/// Seconds added per beaten finishing position, spread over the race.
pub const POSITION_PENALTY_SECS: f64 = 0.30;
/// Distance shifts smaller than this are treated as no shift at all.
const DISTANCE_SHIFT_IGNORE_METERS: f64 = 100.0;
const LENGTHEN_COST_PER_100M: f64 = 0.04;
const SHORTEN_GAIN_PER_100M: f64 = 0.03;
const PACE_NORMALIZER_SECS: f64 = 6.0;
const DISTANCE_FACTOR_MIN: f64 = 0.8;
const DISTANCE_FACTOR_MAX: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Dirt,
    Turf,
    Synthetic,
}

impl Surface {
    /// Lenient parse from site text; substring match so "Inner Turf" and
    /// "All Weather Synthetic" resolve too.
    pub fn parse(text: &str) -> Option<Surface> {
        let lowered = text.to_lowercase();
        if lowered.contains("dirt") {
            Some(Surface::Dirt)
        } else if lowered.contains("turf") {
            Some(Surface::Turf)
        } else if lowered.contains("synth") || lowered.contains("tapeta")
            || lowered.contains("all weather")
        {
            Some(Surface::Synthetic)
        } else {
            None
        }
    }
}

/// Multiplier applied when moving from `from` (last race) to `to` (today).
/// Above 1.0 projects a slower pace on the new footing.
pub fn surface_factor(from: Surface, to: Surface) -> f64 {
    use Surface::{Dirt, Synthetic, Turf};
    match (from, to) {
        (Dirt, Dirt) | (Turf, Turf) | (Synthetic, Synthetic) => 1.0,
        (Dirt, Turf) => 1.05,
        (Dirt, Synthetic) => 1.02,
        (Turf, Dirt) => 0.98,
        (Turf, Synthetic) => 1.01,
        (Synthetic, Dirt) => 0.99,
        (Synthetic, Turf) => 1.03,
    }
}

/// Pace multiplier for the change from `previous_meters` to
/// `target_meters`. Stretching out costs pace, shortening returns a little,
/// and the result is clamped to a sane band.
pub fn distance_factor(previous_meters: f64, target_meters: f64) -> f64 {
    let diff = target_meters - previous_meters;
    if diff.abs() < DISTANCE_SHIFT_IGNORE_METERS {
        return 1.0;
    }
    let per_100m = diff.abs() / 100.0;
    let factor = if diff > 0.0 {
        1.0 + per_100m * LENGTHEN_COST_PER_100M / PACE_NORMALIZER_SECS
    } else {
        1.0 - per_100m * SHORTEN_GAIN_PER_100M / PACE_NORMALIZER_SECS
    };
    factor.clamp(DISTANCE_FACTOR_MIN, DISTANCE_FACTOR_MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PerformanceScore {
    /// Adjusted seconds per 100 meters.
    Valid(f64),
    Invalid,
}

impl PerformanceScore {
    pub fn value(&self) -> Option<f64> {
        match self {
            PerformanceScore::Valid(v) => Some(*v),
            PerformanceScore::Invalid => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, PerformanceScore::Valid(_))
    }
}

/// Which adjustments the engine applies. All on by default.
#[derive(Debug, Clone, Copy)]
pub struct ScoreConfig {
    pub surface_adjustment: bool,
    pub distance_adjustment: bool,
    pub position_penalty: bool,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            surface_adjustment: true,
            distance_adjustment: true,
            position_penalty: true,
        }
    }
}

/// Today's race context, when the card parse produced one.
#[derive(Debug, Clone, Default)]
pub struct RaceMetadata {
    pub distance: String,
    pub surface: String,
}

/// Intermediate values of one scoring pass, kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationDetails {
    pub raw_pace_per_100m: f64,
    pub surface_factor: f64,
    pub distance_factor: f64,
    pub position_penalty_applied: f64,
    pub estimated_race_time: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredEntry {
    pub track: String,
    pub date: String,
    pub race_number: String,
    pub program_number: String,
    pub horse_name: String,
    pub latest_distance: String,
    pub latest_surface: String,
    pub latest_time: String,
    pub latest_finish_position: String,
    pub performance_score: PerformanceScore,
    pub details: Option<CalculationDetails>,
    pub calculation_status: String,
}

/// Scores one essential record against today's race metadata.
pub fn score_record(
    record: &EssentialRecord,
    track: &str,
    date: &str,
    meta: Option<&RaceMetadata>,
    cfg: &ScoreConfig,
) -> ScoredEntry {
    let mut scored = ScoredEntry {
        track: track.to_string(),
        date: date.to_string(),
        race_number: record.race_number.clone(),
        program_number: record.program_number.clone(),
        horse_name: record.horse_name.clone(),
        latest_distance: record.latest_distance.clone(),
        latest_surface: record.latest_surface.clone(),
        latest_time: record.latest_time.clone(),
        latest_finish_position: record.latest_finish_position.clone(),
        performance_score: PerformanceScore::Invalid,
        details: None,
        calculation_status: String::new(),
    };

    let prev_seconds = time_to_seconds(&record.latest_time);
    let prev_meters = distance_to_meters(&record.latest_distance);
    if prev_seconds <= 0.0 {
        scored.calculation_status = "no usable finishing time".to_string();
        return scored;
    }
    if prev_meters <= 0.0 {
        scored.calculation_status = "no usable race distance".to_string();
        return scored;
    }

    let target_meters = meta
        .map(|m| distance_to_meters(&m.distance))
        .filter(|m| *m > 0.0)
        .unwrap_or(FALLBACK_TARGET_METERS);

    let raw_pace = prev_seconds / (prev_meters / 100.0);

    let surface_mult = if cfg.surface_adjustment {
        let from = Surface::parse(&record.latest_surface);
        let to = meta.and_then(|m| Surface::parse(&m.surface));
        match (from, to) {
            (Some(from), Some(to)) => surface_factor(from, to),
            _ => 1.0,
        }
    } else {
        1.0
    };

    let distance_mult = if cfg.distance_adjustment {
        distance_factor(prev_meters, target_meters)
    } else {
        1.0
    };

    let penalty = if cfg.position_penalty {
        position_penalty_per_100m(&record.latest_finish_position, target_meters)
    } else {
        0.0
    };

    let adjusted_pace = raw_pace * surface_mult * distance_mult + penalty;
    let estimated_time = adjusted_pace * (target_meters / 100.0);

    scored.performance_score = PerformanceScore::Valid(adjusted_pace);
    scored.details = Some(CalculationDetails {
        raw_pace_per_100m: raw_pace,
        surface_factor: surface_mult,
        distance_factor: distance_mult,
        position_penalty_applied: penalty,
        estimated_race_time: estimated_time,
    });
    scored.calculation_status = "ok".to_string();
    scored
}

/// Seconds-per-100m penalty for finishing behind the winner: a flat
/// per-position cost spread over the target distance. Position 1 and
/// unparseable positions cost nothing.
pub fn position_penalty_per_100m(finish_position: &str, target_meters: f64) -> f64 {
    let Ok(position) = finish_position.trim().parse::<u32>() else {
        return 0.0;
    };
    if position <= 1 || target_meters <= 0.0 {
        return 0.0;
    }
    let beaten = (position - 1) as f64;
    beaten * POSITION_PENALTY_SECS / (target_meters / 100.0)
}
