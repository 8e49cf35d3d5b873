use std::fs;
use std::path::PathBuf;

use railbird::entries::{RowClass, classify_row, parse_race_card};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_race_card_fixture() {
    let html = read_fixture("race_card.html");
    let races = parse_race_card(&html);

    assert_eq!(races.len(), 2);

    let first = &races[0];
    assert_eq!(first.race_number, 1);
    assert_eq!(first.post_time, "1:00 PM");
    assert_eq!(first.conditions.distance, "6 F");
    assert_eq!(first.conditions.surface, "Dirt");
    assert_eq!(first.conditions.purse.as_deref(), Some("80,000"));
    assert_eq!(first.entries.len(), 3);

    let second = &races[1];
    assert_eq!(second.race_number, 2);
    assert_eq!(second.conditions.surface, "Turf");
    assert_eq!(second.entries.len(), 3);
}

#[test]
fn entry_rows_split_the_horse_cell() {
    let html = read_fixture("race_card.html");
    let races = parse_race_card(&html);

    let entry = &races[0].entries[0];
    assert_eq!(entry.post_position, 1);
    assert_eq!(entry.horse_name, "Tiger of the Sea");
    assert_eq!(entry.speed_figure, Some(52));
    assert_eq!(entry.sire.as_deref(), Some("Smiling Tiger"));
    assert_eq!(entry.trainer_jockey.as_deref(), Some("S. Asmussen / J. Rosario"));
    assert_eq!(entry.morning_line.as_deref(), Some("5/2"));

    // No parenthesized figure means no sire either.
    let bare = &races[0].entries[2];
    assert_eq!(bare.horse_name, "Copper Kettle");
    assert_eq!(bare.speed_figure, None);
    assert_eq!(bare.sire, None);
}

#[test]
fn payout_tables_are_not_races() {
    let html = read_fixture("race_card.html");
    let races = parse_race_card(&html);
    assert!(races.iter().all(|race| race.race_number == 1 || race.race_number == 2));
}

#[test]
fn classifier_rejects_header_and_payout_rows() {
    let header: Vec<String> = ["PP", "Horse / Sire", "Trainer / Jockey", "ML"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert!(matches!(classify_row(&header), RowClass::Other));

    let payout: Vec<String> = ["$2 Win", "$7.40"].iter().map(|s| s.to_string()).collect();
    assert!(matches!(classify_row(&payout), RowClass::Other));
}

#[test]
fn classifier_accepts_entry_rows() {
    let row: Vec<String> = ["4", "Quiet Storm (66) Stormy Atlantic", "T. Pletcher / L. Saez", "8/1"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    match classify_row(&row) {
        RowClass::Entry(entry) => {
            assert_eq!(entry.post_position, 4);
            assert_eq!(entry.horse_name, "Quiet Storm");
            assert_eq!(entry.speed_figure, Some(66));
        }
        RowClass::Other => panic!("row should classify as an entry"),
    }
}

#[test]
fn horses_named_like_payout_pools_are_kept() {
    let row: Vec<String> = ["4", "Winter Memories (66) El Prado", "T. Pletcher / L. Saez", "8/1"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    match classify_row(&row) {
        RowClass::Entry(entry) => assert_eq!(entry.horse_name, "Winter Memories"),
        RowClass::Other => panic!("'Win' inside a horse name must not drop the row"),
    }

    let html = read_fixture("race_card.html");
    let races = parse_race_card(&html);
    assert!(
        races[1]
            .entries
            .iter()
            .any(|entry| entry.horse_name == "Win Win Win"),
        "every listed horse should survive extraction"
    );
}

#[test]
fn empty_page_yields_no_races() {
    assert!(parse_race_card("<html><body><p>No entries.</p></body></html>").is_empty());
}
