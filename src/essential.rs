//! The essential record: one flat row per entered horse, merging today's
//! card entry with the horse's latest past race. This is the unit the
//! cache stores and the scorer consumes.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::entries::RaceCard;
use crate::pacer::Pacer;
use crate::profile::HorseProfile;

/// Column names of the cached file, in order. A cache written before a
/// column existed is stale and gets rebuilt from scratch.
pub const ESSENTIAL_COLUMNS: [&str; 7] = [
    "race_number",
    "program_number",
    "horse_name",
    "latest_distance",
    "latest_surface",
    "latest_time",
    "latest_finish_position",
];

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EssentialRecord {
    pub race_number: String,
    pub program_number: String,
    pub horse_name: String,
    pub latest_distance: String,
    pub latest_surface: String,
    pub latest_time: String,
    pub latest_finish_position: String,
}

impl EssentialRecord {
    /// A record is complete when its profile lookup succeeded in some
    /// earlier run. Incomplete records get retried on the next refresh.
    pub fn is_complete(&self) -> bool {
        !self.latest_finish_position.trim().is_empty()
    }

    fn from_profile(race_number: u32, program_number: u32, profile: &HorseProfile) -> Self {
        Self {
            race_number: race_number.to_string(),
            program_number: program_number.to_string(),
            horse_name: profile.horse_name.clone(),
            latest_distance: profile.latest_race.distance.clone(),
            latest_surface: profile.latest_race.surface.clone(),
            latest_time: profile.latest_race.time.clone(),
            latest_finish_position: profile.latest_race.finish_position.clone(),
        }
    }

    fn unresolved(race_number: u32, program_number: u32, horse_name: &str) -> Self {
        Self {
            race_number: race_number.to_string(),
            program_number: program_number.to_string(),
            horse_name: horse_name.to_string(),
            ..Default::default()
        }
    }
}

/// Where profile lookups come from. The live implementation walks the
/// candidate URLs; tests substitute a canned map.
pub trait ProfileSource {
    fn resolve(&mut self, horse_name: &str) -> Option<HorseProfile>;
}

/// Merges today's card against the prior cache. Complete prior records are
/// reused with their race and program numbers refreshed from today's card;
/// everything else goes through `source`, paced by `pacer`. Every horse on
/// the card yields exactly one record, resolved or not.
pub fn merge_essential(
    card: &RaceCard,
    prior: &[EssentialRecord],
    source: &mut dyn ProfileSource,
    pacer: &mut Pacer,
) -> Vec<EssentialRecord> {
    let prior_by_name: HashMap<&str, &EssentialRecord> = prior
        .iter()
        .map(|record| (record.horse_name.as_str(), record))
        .collect();

    let mut records = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut reused = 0usize;
    let mut resolved = 0usize;

    for race in &card.races {
        for entry in &race.entries {
            if !seen.insert(entry.horse_name.clone()) {
                continue;
            }

            if let Some(cached) = prior_by_name.get(entry.horse_name.as_str()) {
                if cached.is_complete() {
                    let mut record = (*cached).clone();
                    record.race_number = race.race_number.to_string();
                    record.program_number = entry.program_number.to_string();
                    records.push(record);
                    reused += 1;
                    debug!(horse = %entry.horse_name, "reused cached record");
                    continue;
                }
            }

            pacer.pause();
            match source.resolve(&entry.horse_name) {
                Some(profile) => {
                    records.push(EssentialRecord::from_profile(
                        race.race_number,
                        entry.program_number,
                        &profile,
                    ));
                    resolved += 1;
                }
                None => {
                    records.push(EssentialRecord::unresolved(
                        race.race_number,
                        entry.program_number,
                        &entry.horse_name,
                    ));
                }
            }
        }
    }

    info!(
        total = records.len(),
        reused, resolved, "essential records merged"
    );
    records
}
