//! Horse profile pages: URL slug candidates, race-history rows and the
//! recency check that decides whether a candidate page is the right horse.
//!
//! The site disambiguates horses that share a name by appending numeric
//! suffixes to the slug. The resolver probes the bare slug then `_1`..`_5`
//! in order and accepts the first candidate whose most recent history row
//! falls inside the lookback window.

use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::essential::ProfileSource;
use crate::http_client::fetch_page;

const SUFFIX_CANDIDATES: u32 = 5;

/// Names whose slugs the generic rule gets wrong on the live site.
const SPECIAL_SLUGS: &[(&str, &str)] = &[
    ("Cash's Candy", "CashsCandy"),
    ("Full Serrano", "Full_Serrano_(ARG)"),
];

const DATE_FORMATS: &[&str] = &["%m/%d/%y", "%m/%d/%Y", "%Y-%m-%d"];

static FINISH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)(?:st|nd|rd|th)\s*\(([^)]+)\)").unwrap());
static AGE_SEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s+years?\s+old.*?-\s*(\w+)").unwrap());
static BREEDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"by\s+(.+)$").unwrap());
static ISO_DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"PT(?:(\d+)M)?(\d+(?:\.\d+)?)S").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RaceHistoryRecord {
    pub date: String,
    pub track: String,
    pub distance: String,
    pub surface: String,
    pub time: String,
    pub finish_position: String,
    pub speed_figure: Option<String>,
    pub race_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HorseProfile {
    pub horse_name: String,
    pub age: Option<String>,
    pub sex: Option<String>,
    pub status: Option<String>,
    pub owner: Option<String>,
    pub trainer: Option<String>,
    pub breeder: Option<String>,
    pub sire: Option<String>,
    pub dam: Option<String>,
    pub dam_sire: Option<String>,
    /// The single retained history row; older rows are discarded at parse
    /// time, never accumulated.
    pub latest_race: RaceHistoryRecord,
}

/// Builds the URL slug for a horse name: strip apostrophes and periods,
/// join words with underscores. The special-case table wins outright.
pub fn profile_slug(horse_name: &str) -> String {
    for (name, slug) in SPECIAL_SLUGS {
        if *name == horse_name {
            return (*slug).to_string();
        }
    }
    horse_name
        .replace('\'', "")
        .replace('.', "")
        .trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// The ordered candidate slugs for a horse: the bare slug, then `_1`..`_5`.
pub fn candidate_slugs(horse_name: &str) -> Vec<String> {
    let base = profile_slug(horse_name);
    let mut slugs = vec![base.clone()];
    for suffix in 1..=SUFFIX_CANDIDATES {
        slugs.push(format!("{base}_{suffix}"));
    }
    slugs
}

/// Probes the candidate URLs in order; the first candidate whose latest
/// history row passes the recency check wins. `None` is the normal
/// "no qualifying recent race" outcome, not an error.
pub fn resolve_profile(config: &Config, client: &Client, horse_name: &str) -> Option<HorseProfile> {
    let today = Utc::now().date_naive();
    for slug in candidate_slugs(horse_name) {
        let url = format!("{}/horse/{}", config.profile_base_url, slug);
        debug!(horse = horse_name, %url, "trying profile candidate");
        let html = match fetch_page(client, &url) {
            Ok(html) => html,
            Err(err) => {
                warn!(horse = horse_name, %url, %err, "candidate fetch failed, trying next");
                continue;
            }
        };
        if let Some(profile) = parse_profile(&html, horse_name, today, config.lookback_days) {
            info!(horse = horse_name, %url, "accepted profile candidate");
            return Some(profile);
        }
        debug!(horse = horse_name, %url, "no recent race on candidate page");
    }
    info!(horse = horse_name, "no candidate page had a qualifying recent race");
    None
}

/// Live resolver used by the cache merge; paces itself via the caller.
pub struct LiveProfileSource<'a> {
    config: &'a Config,
    client: &'a Client,
}

impl<'a> LiveProfileSource<'a> {
    pub fn new(config: &'a Config, client: &'a Client) -> Self {
        Self { config, client }
    }
}

impl ProfileSource for LiveProfileSource<'_> {
    fn resolve(&mut self, horse_name: &str) -> Option<HorseProfile> {
        resolve_profile(self.config, self.client, horse_name)
    }
}

/// Parses one candidate page. Returns a profile only when the history
/// table has a row inside the lookback window ending at `today`.
pub fn parse_profile(
    html: &str,
    horse_name: &str,
    today: NaiveDate,
    lookback_days: i64,
) -> Option<HorseProfile> {
    let document = Html::parse_document(html);
    let latest_race = latest_qualifying_race(&document, today, lookback_days)?;
    let mut profile = HorseProfile {
        horse_name: horse_name.to_string(),
        latest_race,
        ..Default::default()
    };
    extract_bio(&document, &mut profile);
    Some(profile)
}

/// Scans history rows most-recent-first and keeps the first one whose date
/// parses and falls inside the window. Older or undated rows are skipped.
fn latest_qualifying_race(
    document: &Html,
    today: NaiveDate,
    lookback_days: i64,
) -> Option<RaceHistoryRecord> {
    let row_sel = Selector::parse("table.horse-table tbody tr").unwrap();
    let cell_sel = Selector::parse("td").unwrap();

    for row in document.select(&row_sel) {
        let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
        if cells.len() < 6 {
            continue;
        }
        let record = parse_history_row(&cells);
        if date_within_lookback(&record.date, today, lookback_days) {
            return Some(record);
        }
    }
    None
}

/// True when `raw` parses with one of the accepted date formats and is no
/// older than `lookback_days` before `today`.
pub fn date_within_lookback(raw: &str, today: NaiveDate, lookback_days: i64) -> bool {
    let Some(date) = parse_history_date(raw) else {
        return false;
    };
    date >= today - Duration::days(lookback_days)
}

fn parse_history_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = raw.trim();
    if cleaned.is_empty() || cleaned == "N/A" {
        return None;
    }
    if let Ok(stamp) = NaiveDateTime::parse_from_str(cleaned, "%Y-%m-%dT%H:%M:%SZ") {
        return Some(stamp.date());
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(cleaned, format) {
            return Some(date);
        }
    }
    None
}

fn parse_history_row(cells: &[ElementRef]) -> RaceHistoryRecord {
    let mut record = RaceHistoryRecord {
        date: cell_date(cells[0]),
        ..Default::default()
    };

    let finish_text = cell_text(cells[1]);
    if let Some(caps) = FINISH_RE.captures(&finish_text) {
        record.finish_position = caps[1].to_string();
        record.speed_figure = Some(caps[2].trim_matches('*').to_string());
    } else {
        record.finish_position = finish_text;
    }

    record.track = cells[2]
        .select(&Selector::parse("a").unwrap())
        .next()
        .map(|link| collapse_whitespace(&link.text().collect::<String>()))
        .unwrap_or_else(|| cell_text(cells[2]));

    if cells.len() > 3 {
        record.distance = cell_text(cells[3]);
    }
    if cells.len() > 4 {
        record.surface = cell_text(cells[4]);
    }
    if cells.len() > 5 {
        record.race_type = cell_text(cells[5]);
    }

    // Desktop layouts carry the finishing time in the tenth column; narrow
    // layouts drop intermediate columns, leaving it last.
    let time_cell = if cells.len() > 9 {
        Some(cells[9])
    } else if cells.len() > 6 {
        cells.last().copied()
    } else {
        None
    };
    if let Some(cell) = time_cell {
        record.time = cell_finishing_time(cell);
    }

    record
}

/// Prefers the machine-readable `<time datetime>` attribute over the
/// display text.
fn cell_date(cell: ElementRef<'_>) -> String {
    let time_sel = Selector::parse("time").unwrap();
    cell.select(&time_sel)
        .next()
        .and_then(|elem| elem.value().attr("datetime"))
        .map(str::to_string)
        .unwrap_or_else(|| cell_text(cell))
}

/// Finishing times arrive as ISO-8601 durations (`PT1M8.61S`); convert to
/// the site's display form `1:08.61`.
fn cell_finishing_time(cell: ElementRef<'_>) -> String {
    let time_sel = Selector::parse("time").unwrap();
    if let Some(elem) = cell.select(&time_sel).next() {
        if let Some(duration) = elem.value().attr("datetime") {
            if let Some(formatted) = format_iso_duration(duration) {
                return formatted;
            }
        }
        return collapse_whitespace(&elem.text().collect::<String>());
    }
    cell_text(cell)
}

fn format_iso_duration(raw: &str) -> Option<String> {
    let caps = ISO_DURATION_RE.captures(raw)?;
    let minutes = caps.get(1).map(|m| m.as_str()).unwrap_or("0");
    let mut seconds = caps[2].to_string();
    while seconds.len() < 5 {
        seconds.insert(0, '0');
    }
    Some(format!("{minutes}:{seconds}"))
}

fn extract_bio(document: &Html, profile: &mut HorseProfile) {
    let stats_sel = Selector::parse("dl.horse-stats").unwrap();
    let dt_sel = Selector::parse("dt").unwrap();
    let dd_sel = Selector::parse("dd").unwrap();
    let pedigree_sel = Selector::parse("a.horse-name").unwrap();

    let Some(stats) = document.select(&stats_sel).next() else {
        return;
    };

    let labels: Vec<String> = stats
        .select(&dt_sel)
        .map(|dt| cell_text(dt).to_lowercase())
        .map(|label| label.trim_end_matches(':').to_string())
        .collect();
    let values: Vec<ElementRef> = stats.select(&dd_sel).collect();

    for (label, value_elem) in labels.iter().zip(values.iter()) {
        let value = cell_text(*value_elem);
        if label.contains("age") {
            if let Some(caps) = AGE_SEX_RE.captures(&value) {
                profile.age = Some(caps[1].to_string());
                profile.sex = Some(caps[2].to_string());
            }
        } else if label.contains("status") {
            profile.status = Some(value);
        } else if label.contains("owner") {
            profile.owner = Some(value);
        } else if label.contains("trainer") {
            profile.trainer = Some(value);
        } else if label.contains("bred") {
            if let Some(caps) = BREEDER_RE.captures(&value) {
                profile.breeder = Some(caps[1].trim().to_string());
            }
        } else if label.contains("pedigree") {
            let links: Vec<String> = value_elem
                .select(&pedigree_sel)
                .map(|link| collapse_whitespace(&link.text().collect::<String>()))
                .collect();
            profile.sire = links.first().cloned();
            profile.dam = links.get(1).cloned();
            profile.dam_sire = links.get(2).cloned();
        }
    }
}

fn cell_text(cell: ElementRef<'_>) -> String {
    collapse_whitespace(&cell.text().collect::<String>())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
