//! Groups scored entries back into races and orders each field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::scoring::ScoredEntry;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RaceKey {
    pub track: String,
    pub date: String,
    pub race_number: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedRace {
    pub key: RaceKey,
    /// Valid scores ascending (lower pace first), then invalid entries in
    /// their original order.
    pub entries: Vec<ScoredEntry>,
}

/// Groups by (track, date, race number) and ranks each race. Entries whose
/// race number fails to parse are grouped under race 0.
pub fn rank(entries: Vec<ScoredEntry>) -> Vec<RankedRace> {
    let mut groups: BTreeMap<RaceKey, Vec<ScoredEntry>> = BTreeMap::new();
    for entry in entries {
        let key = RaceKey {
            track: entry.track.clone(),
            date: entry.date.clone(),
            race_number: entry.race_number.trim().parse().unwrap_or(0),
        };
        groups.entry(key).or_default().push(entry);
    }

    groups
        .into_iter()
        .map(|(key, mut field)| {
            let mut valid: Vec<ScoredEntry> = Vec::new();
            let mut invalid: Vec<ScoredEntry> = Vec::new();
            for entry in field.drain(..) {
                if entry.performance_score.is_valid() {
                    valid.push(entry);
                } else {
                    invalid.push(entry);
                }
            }
            valid.sort_by(|a, b| {
                let a = a.performance_score.value().unwrap_or(f64::INFINITY);
                let b = b.performance_score.value().unwrap_or(f64::INFINITY);
                a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
            });
            valid.extend(invalid);
            RankedRace {
                key,
                entries: valid,
            }
        })
        .collect()
}
