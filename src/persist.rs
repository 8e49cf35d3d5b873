//! On-disk cache of essential records, one JSON file per track and date.
//!
//! Loads are lenient: a missing, unreadable, or stale file just means an
//! empty prior set and a full rebuild. Saves go through a temp file and a
//! rename so a crash never leaves a half-written cache.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::essential::{ESSENTIAL_COLUMNS, EssentialRecord};

const CACHE_DIR: &str = "railbird";
const CACHE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct EssentialFile {
    version: u32,
    /// Column names the writer knew about. A reader that expects a column
    /// the file lacks treats the whole file as stale.
    columns: Vec<String>,
    records: Vec<EssentialRecord>,
}

/// Cache location for one track and date, under the XDG cache dir.
pub fn essential_path(track: &str, date: &str) -> Option<PathBuf> {
    Some(cache_dir()?.join(format!("{track}_{date}_essential.json")))
}

fn cache_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

/// Loads prior records from `path`. Any failure, version mismatch, or
/// missing expected column yields an empty set.
pub fn load_essential_from(path: &Path) -> Vec<EssentialRecord> {
    let Ok(raw) = fs::read_to_string(path) else {
        debug!(path = %path.display(), "no prior cache");
        return Vec::new();
    };
    let Ok(file) = serde_json::from_str::<EssentialFile>(&raw) else {
        warn!(path = %path.display(), "unreadable cache, rebuilding");
        return Vec::new();
    };
    if file.version != CACHE_VERSION {
        warn!(
            path = %path.display(),
            found = file.version,
            expected = CACHE_VERSION,
            "cache version mismatch, rebuilding"
        );
        return Vec::new();
    }
    for column in ESSENTIAL_COLUMNS {
        if !file.columns.iter().any(|c| c == column) {
            warn!(path = %path.display(), column, "cache predates column, rebuilding");
            return Vec::new();
        }
    }
    debug!(path = %path.display(), records = file.records.len(), "loaded prior cache");
    file.records
}

/// Writes `records` to `path` atomically (temp file then rename).
pub fn save_essential_to(path: &Path, records: &[EssentialRecord]) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating cache dir {}", dir.display()))?;
    }

    let file = EssentialFile {
        version: CACHE_VERSION,
        columns: ESSENTIAL_COLUMNS.iter().map(|c| c.to_string()).collect(),
        records: records.to_vec(),
    };
    let json = serde_json::to_string(&file).context("serializing essential cache")?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("renaming into {}", path.display()))?;
    debug!(path = %path.display(), records = records.len(), "cache saved");
    Ok(())
}
