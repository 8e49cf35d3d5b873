//! Race card parser for the entries site.
//!
//! A card page is a flat sequence of `h2` race headers, each followed by a
//! short conditions blurb and (eventually) the entries table. The parse is
//! two-stage: section boundary detection on the headers, then a bounded
//! sibling scan with a typed row classifier to find and read the table.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::FetchError;
use crate::http_client::{fetch_page, http_client};

/// How many sibling elements past a race header to scan for its table.
const SIBLING_LOOKAHEAD: usize = 20;

static RACE_NUM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Race\s*#?\s*(\d+)").unwrap());
static POST_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2}:\d{2}\s*[AP]M)").unwrap());
static DISTANCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\s*\d+/\d+)?\s*[MFmf])").unwrap());
static SURFACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(dirt|turf|synthetic)").unwrap());
static PURSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Purse:\s*\$?([\d,]+)").unwrap());
static SPEED_FIGURE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((\d+)\)").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Entry {
    pub post_position: u32,
    pub program_number: u32,
    pub horse_name: String,
    pub speed_figure: Option<u32>,
    pub sire: Option<String>,
    pub trainer_jockey: Option<String>,
    pub morning_line: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RaceConditions {
    pub distance: String,
    pub surface: String,
    pub purse: Option<String>,
    pub race_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Race {
    pub race_number: u32,
    pub post_time: String,
    pub conditions: RaceConditions,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceCard {
    pub track: String,
    pub date: String,
    pub races: Vec<Race>,
}

/// A page that loads but carries no race sections is a normal outcome,
/// distinct from a fetch failure.
#[derive(Debug)]
pub enum RaceCardOutcome {
    Card(RaceCard),
    NoRacesToday,
}

pub fn fetch_race_card(
    config: &Config,
    track: &str,
    date: &str,
) -> Result<RaceCardOutcome, FetchError> {
    let client = http_client(config)?;
    let url = format!("{}/entries-results/{}/{}", config.entries_base_url, track, date);
    debug!(%url, "fetching race card");
    let html = fetch_page(client, &url)?;

    let races = parse_race_card(&html);
    if races.is_empty() {
        info!(track, date, "page loaded but no race sections found");
        return Ok(RaceCardOutcome::NoRacesToday);
    }
    info!(track, date, races = races.len(), "race card parsed");
    Ok(RaceCardOutcome::Card(RaceCard {
        track: track.to_string(),
        date: date.to_string(),
        races,
    }))
}

pub fn parse_race_card(html: &str) -> Vec<Race> {
    let document = Html::parse_document(html);
    let header_sel = Selector::parse("h2").unwrap();

    let mut races = Vec::new();
    for header in document.select(&header_sel) {
        let text = header.text().collect::<String>();
        if !(text.contains("Race") && text.contains('#')) {
            continue;
        }
        if let Some(race) = parse_race_section(header, &text) {
            debug!(race = race.race_number, entries = race.entries.len(), "parsed race section");
            races.push(race);
        }
    }
    races
}

fn parse_race_section(header: ElementRef<'_>, header_text: &str) -> Option<Race> {
    let race_number: u32 = RACE_NUM_RE
        .captures(header_text)?
        .get(1)?
        .as_str()
        .parse()
        .ok()?;
    let post_time = POST_TIME_RE
        .captures(header_text)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    let mut conditions = RaceConditions::default();
    let mut entries = Vec::new();

    let siblings = header
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .take(SIBLING_LOOKAHEAD);
    for (index, sibling) in siblings.enumerate() {
        // The first sibling is conventionally the conditions blurb.
        if index == 0 {
            let blurb = collapse_whitespace(&sibling.text().collect::<String>());
            if !blurb.is_empty() {
                conditions = parse_race_conditions(&blurb);
            }
        }
        if let Some(table) = find_entries_table(sibling) {
            entries = parse_entries_table(table);
            break;
        }
    }

    Some(Race {
        race_number,
        post_time,
        conditions,
        entries,
    })
}

fn parse_race_conditions(text: &str) -> RaceConditions {
    RaceConditions {
        distance: DISTANCE_RE
            .captures(text)
            .map(|caps| caps[1].to_string())
            .unwrap_or_default(),
        surface: SURFACE_RE
            .captures(text)
            .map(|caps| title_case(&caps[1]))
            .unwrap_or_default(),
        purse: PURSE_RE.captures(text).map(|caps| caps[1].to_string()),
        race_type: text.to_string(),
    }
}

fn find_entries_table(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let table_sel = Selector::parse("table").unwrap();
    if element.value().name() == "table" && is_entries_table(element) {
        return Some(element);
    }
    element.select(&table_sel).find(|table| is_entries_table(*table))
}

/// A table qualifies when some row classifies as an entry row whose raw
/// horse cell carries no payout markers. The payout check lives here, not
/// in the classifier, so a horse named "Winter Memories" still extracts.
fn is_entries_table(table: ElementRef<'_>) -> bool {
    let row_sel = Selector::parse("tr").unwrap();
    table.select(&row_sel).any(|row| {
        let cells = row_cells(row);
        find_entry(&cells).is_some_and(|(index, _)| {
            let horse_cell = &cells[index + 1];
            !horse_cell.contains('$')
                && !horse_cell.contains("Win")
                && !horse_cell.contains("Place")
        })
    })
}

fn parse_entries_table(table: ElementRef<'_>) -> Vec<Entry> {
    let row_sel = Selector::parse("tr").unwrap();
    table
        .select(&row_sel)
        .filter_map(|row| match classify_row(&row_cells(row)) {
            RowClass::Entry(entry) => Some(entry),
            RowClass::Other => None,
        })
        .collect()
}

fn row_cells(row: ElementRef<'_>) -> Vec<String> {
    let cell_sel = Selector::parse("td, th").unwrap();
    row.select(&cell_sel)
        .map(|cell| collapse_whitespace(&cell.text().collect::<String>()))
        .collect()
}

/// Outcome of the row classifier; anything that is not an entry row
/// (headers, payout lines, scratches notes) is `Other`.
#[derive(Debug)]
pub enum RowClass {
    Entry(Entry),
    Other,
}

/// Classifies one table row from its cell texts. An entry row holds a small
/// integer (the post position) immediately followed by a horse cell.
pub fn classify_row(cells: &[String]) -> RowClass {
    match find_entry(cells) {
        Some((_, entry)) => RowClass::Entry(entry),
        None => RowClass::Other,
    }
}

/// Locates the post-position cell and reads the entry that follows it.
/// Returns the index of the post cell alongside the entry.
fn find_entry(cells: &[String]) -> Option<(usize, Entry)> {
    if cells.len() < 3 {
        return None;
    }

    for (index, cell) in cells.iter().enumerate() {
        let Ok(post) = cell.trim().parse::<u32>() else {
            continue;
        };
        if !(1..=20).contains(&post) {
            continue;
        }
        let Some(horse_cell) = cells.get(index + 1) else {
            continue;
        };
        let horse_cell = horse_cell.trim();
        if !looks_like_horse_cell(horse_cell) {
            continue;
        }
        let (horse_name, speed_figure, sire) = parse_horse_cell(horse_cell);
        if horse_name.is_empty() {
            continue;
        }

        let trainer_jockey = cells
            .get(index + 2)
            .map(|text| text.trim())
            .filter(|text| text.len() > 3)
            .map(str::to_string);
        let morning_line = cells
            .last()
            .filter(|_| cells.len() > index + 3)
            .map(|text| text.trim())
            .filter(|text| looks_like_odds(text))
            .map(str::to_string);

        return Some((
            index,
            Entry {
                post_position: post,
                // The program number usually matches the post position on the
                // card page; the entries table has no separate column for it.
                program_number: post,
                horse_name,
                speed_figure,
                sire,
                trainer_jockey,
                morning_line,
            },
        ));
    }

    None
}

fn looks_like_horse_cell(text: &str) -> bool {
    text.len() > 3 && text.chars().any(|c| c.is_alphabetic()) && !text.starts_with('$')
}

fn looks_like_odds(text: &str) -> bool {
    !text.is_empty() && (text.contains('/') || text.replace('.', "").chars().all(|c| c.is_ascii_digit()))
}

/// Splits the combined horse cell: name, optional parenthesized speed
/// figure, trailing sire text. `"Tiger of the Sea(52) Smiling Tiger"`
/// yields `("Tiger of the Sea", Some(52), Some("Smiling Tiger"))`.
fn parse_horse_cell(text: &str) -> (String, Option<u32>, Option<String>) {
    let speed_figure = SPEED_FIGURE_RE
        .captures(text)
        .and_then(|caps| caps[1].parse().ok());
    let name = text
        .split('(')
        .next()
        .unwrap_or("")
        .trim()
        .to_string();
    let sire = text
        .rsplit_once(')')
        .map(|(_, rest)| rest.trim())
        .filter(|rest| !rest.is_empty())
        .map(str::to_string);
    (name, speed_figure, sire)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
