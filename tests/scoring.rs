use railbird::essential::EssentialRecord;
use railbird::scoring::{
    RaceMetadata, ScoreConfig, Surface, distance_factor, position_penalty_per_100m, score_record,
    surface_factor,
};
use railbird::units::distance_to_meters;

fn record(distance: &str, surface: &str, time: &str, finish: &str) -> EssentialRecord {
    EssentialRecord {
        race_number: "1".to_string(),
        program_number: "3".to_string(),
        horse_name: "Quiet Storm".to_string(),
        latest_distance: distance.to_string(),
        latest_surface: surface.to_string(),
        latest_time: time.to_string(),
        latest_finish_position: finish.to_string(),
    }
}

fn meta(distance: &str, surface: &str) -> RaceMetadata {
    RaceMetadata {
        distance: distance.to_string(),
        surface: surface.to_string(),
    }
}

#[test]
fn winner_score_is_exactly_base_times_factors() {
    let rec = record("6F", "Dirt", "1:09.80", "1");
    let today = meta("1M", "Turf");
    let scored = score_record(&rec, "saratoga", "2025-08-01", Some(&today), &ScoreConfig::default());

    let prev_meters = distance_to_meters("6F");
    let target_meters = distance_to_meters("1M");
    let raw_pace = 69.80 / (prev_meters / 100.0);
    let expected = raw_pace
        * surface_factor(Surface::Dirt, Surface::Turf)
        * distance_factor(prev_meters, target_meters);

    let value = scored.performance_score.value().expect("winner scores valid");
    assert!((value - expected).abs() < 1e-12);

    let details = scored.details.expect("valid scores carry details");
    assert_eq!(details.position_penalty_applied, 0.0);
    assert!((details.estimated_race_time - value * (target_meters / 100.0)).abs() < 1e-9);
}

#[test]
fn position_penalty_is_monotonic() {
    let target = distance_to_meters("6F");
    let mut previous = 0.0;
    for position in 1..=12u32 {
        let penalty = position_penalty_per_100m(&position.to_string(), target);
        assert!(penalty >= previous, "position {position} should not cost less");
        previous = penalty;
    }
    assert_eq!(position_penalty_per_100m("1", target), 0.0);
    assert!(position_penalty_per_100m("2", target) > 0.0);
}

#[test]
fn worse_finish_scores_worse() {
    let today = meta("6F", "Dirt");
    let cfg = ScoreConfig::default();
    let second = score_record(&record("6F", "Dirt", "1:10.00", "2"), "t", "d", Some(&today), &cfg);
    let seventh = score_record(&record("6F", "Dirt", "1:10.00", "7"), "t", "d", Some(&today), &cfg);
    assert!(seventh.performance_score.value() > second.performance_score.value());
}

#[test]
fn missing_time_is_invalid() {
    let scored = score_record(
        &record("6F", "Dirt", "", "1"),
        "t",
        "d",
        None,
        &ScoreConfig::default(),
    );
    assert!(!scored.performance_score.is_valid());
    assert!(scored.details.is_none());
    assert!(!scored.calculation_status.is_empty());
}

#[test]
fn missing_distance_is_invalid() {
    let scored = score_record(
        &record("", "Dirt", "1:10.00", "1"),
        "t",
        "d",
        None,
        &ScoreConfig::default(),
    );
    assert!(!scored.performance_score.is_valid());
}

#[test]
fn unknown_surfaces_apply_no_adjustment() {
    let cfg = ScoreConfig::default();
    let today = meta("6F", "");
    let scored = score_record(&record("6F", "Sloppy?", "1:10.00", "1"), "t", "d", Some(&today), &cfg);
    let details = scored.details.expect("valid");
    assert_eq!(details.surface_factor, 1.0);
}

#[test]
fn adjustments_can_be_switched_off() {
    let cfg = ScoreConfig {
        surface_adjustment: false,
        distance_adjustment: false,
        position_penalty: false,
    };
    let today = meta("1M", "Turf");
    let scored = score_record(&record("6F", "Dirt", "1:09.80", "5"), "t", "d", Some(&today), &cfg);
    let details = scored.details.expect("valid");
    assert_eq!(details.surface_factor, 1.0);
    assert_eq!(details.distance_factor, 1.0);
    assert_eq!(details.position_penalty_applied, 0.0);
    let value = scored.performance_score.value().expect("valid");
    assert!((value - details.raw_pace_per_100m).abs() < 1e-12);
}

#[test]
fn missing_metadata_falls_back_to_default_target() {
    let scored = score_record(
        &record("6F", "Dirt", "1:09.80", "1"),
        "t",
        "d",
        None,
        &ScoreConfig::default(),
    );
    assert!(scored.performance_score.is_valid());
}
