//! End-to-end orchestration: fetch the card, refresh the essential cache,
//! score every record and rank each race.

use std::collections::HashMap;

use anyhow::{Context, anyhow};
use tracing::{info, warn};

use crate::config::Config;
use crate::entries::{RaceCard, RaceCardOutcome, fetch_race_card};
use crate::essential::{EssentialRecord, merge_essential};
use crate::http_client::http_client;
use crate::pacer::Pacer;
use crate::persist::{essential_path, load_essential_from, save_essential_to};
use crate::profile::LiveProfileSource;
use crate::ranking::{RankedRace, rank};
use crate::scoring::{RaceMetadata, ScoreConfig, ScoredEntry, score_record};

pub fn fetch_entries(config: &Config, track: &str, date: &str) -> anyhow::Result<RaceCardOutcome> {
    fetch_race_card(config, track, date)
        .with_context(|| format!("fetching race card for {track} on {date}"))
}

/// Refreshes the essential cache for one card: load prior records, merge
/// against today's entries with live profile lookups, save the result.
pub fn refresh_essential(
    config: &Config,
    track: &str,
    date: &str,
    card: &RaceCard,
) -> anyhow::Result<Vec<EssentialRecord>> {
    let path = essential_path(track, date)
        .ok_or_else(|| anyhow!("no usable cache directory (HOME and XDG_CACHE_HOME unset)"))?;
    let prior = load_essential_from(&path);

    let client = http_client(config).context("building http client")?;
    let mut source = LiveProfileSource::new(config, client);
    let mut pacer = Pacer::new(config.request_delay);
    let records = merge_essential(card, &prior, &mut source, &mut pacer);

    if let Err(err) = save_essential_to(&path, &records) {
        warn!(%err, "cache save failed, continuing with in-memory records");
    }

    let complete = records.iter().filter(|r| r.is_complete()).count();
    info!(
        track,
        date,
        total = records.len(),
        complete,
        "essential refresh finished"
    );
    Ok(records)
}

/// Scores every record against its race's metadata from today's card.
pub fn score_card(
    card: &RaceCard,
    records: &[EssentialRecord],
    cfg: &ScoreConfig,
) -> Vec<ScoredEntry> {
    let metadata = race_metadata_by_number(card);
    records
        .iter()
        .map(|record| {
            let meta = record
                .race_number
                .trim()
                .parse::<u32>()
                .ok()
                .and_then(|num| metadata.get(&num));
            score_record(record, &card.track, &card.date, meta, cfg)
        })
        .collect()
}

fn race_metadata_by_number(card: &RaceCard) -> HashMap<u32, RaceMetadata> {
    card.races
        .iter()
        .map(|race| {
            (
                race.race_number,
                RaceMetadata {
                    distance: race.conditions.distance.clone(),
                    surface: race.conditions.surface.clone(),
                },
            )
        })
        .collect()
}

/// The full pass for one track and date. `None` when the site has no races
/// on the card that day.
pub fn run(
    config: &Config,
    track: &str,
    date: &str,
    cfg: &ScoreConfig,
) -> anyhow::Result<Option<Vec<RankedRace>>> {
    let card = match fetch_entries(config, track, date)? {
        RaceCardOutcome::Card(card) => card,
        RaceCardOutcome::NoRacesToday => return Ok(None),
    };
    let records = refresh_essential(config, track, date, &card)?;
    let scored = score_card(&card, &records, cfg);
    Ok(Some(rank(scored)))
}
