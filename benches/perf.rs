use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use railbird::entries::parse_race_card;
use railbird::essential::EssentialRecord;
use railbird::scoring::{RaceMetadata, ScoreConfig, score_record};
use railbird::units::{distance_to_meters, time_to_seconds};

const CARD_HTML: &str = include_str!("../tests/fixtures/race_card.html");

fn sample_record() -> EssentialRecord {
    EssentialRecord {
        race_number: "1".to_string(),
        program_number: "3".to_string(),
        horse_name: "Quiet Storm".to_string(),
        latest_distance: "6 1/2F".to_string(),
        latest_surface: "Dirt".to_string(),
        latest_time: "1:16.40".to_string(),
        latest_finish_position: "4".to_string(),
    }
}

fn bench_unit_conversions(c: &mut Criterion) {
    c.bench_function("distance_to_meters", |b| {
        b.iter(|| {
            black_box(distance_to_meters(black_box("1 1/16M")));
            black_box(distance_to_meters(black_box("6 1/2F")));
            black_box(distance_to_meters(black_box("1M 70Y")));
        })
    });
    c.bench_function("time_to_seconds", |b| {
        b.iter(|| black_box(time_to_seconds(black_box("1:25.61"))))
    });
}

fn bench_score_record(c: &mut Criterion) {
    let record = sample_record();
    let meta = RaceMetadata {
        distance: "1M".to_string(),
        surface: "Turf".to_string(),
    };
    let cfg = ScoreConfig::default();
    c.bench_function("score_record", |b| {
        b.iter(|| black_box(score_record(black_box(&record), "saratoga", "2025-08-01", Some(&meta), &cfg)))
    });
}

fn bench_parse_race_card(c: &mut Criterion) {
    c.bench_function("parse_race_card", |b| {
        b.iter(|| black_box(parse_race_card(black_box(CARD_HTML))))
    });
}

criterion_group!(
    benches,
    bench_unit_conversions,
    bench_score_record,
    bench_parse_race_card
);
criterion_main!(benches);
