use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::store::{ClubStore, LeagueState};

const SNAPSHOT_DIR: &str = "clubstat_engine";
const SNAPSHOT_FILE: &str = "store.json";
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct StoreFile {
    version: u32,
    leagues: HashMap<String, LeagueState>,
}

/// A missing file or stale snapshot version yields an empty store; a corrupt
/// file is an error. Derived metrics are recomputed from counts on the way
/// in, so the persisted projection is never trusted.
pub fn load_store(store: &ClubStore, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read snapshot {}", path.display()))?;
    let file: StoreFile = serde_json::from_str(&raw)
        .with_context(|| format!("parse snapshot {}", path.display()))?;
    if file.version != SNAPSHOT_VERSION {
        return Ok(());
    }
    let mut leagues = file.leagues;
    for league in leagues.values_mut() {
        for player in &mut league.players {
            player.refresh_metrics();
        }
        league.reseed_counters();
    }
    store.restore(leagues);
    Ok(())
}

/// Serialize to a sibling tmp file, then rename over the target so readers
/// never observe a half-written snapshot.
pub fn save_store(store: &ClubStore, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let file = StoreFile {
        version: SNAPSHOT_VERSION,
        leagues: store.snapshot(),
    };
    let json = serde_json::to_string(&file).context("serialize store snapshot")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write snapshot {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap snapshot {}", path.display()))?;
    Ok(())
}

// XDG data dir, falling back to ~/.local/share.
pub fn default_store_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_DATA_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(SNAPSHOT_DIR).join(SNAPSHOT_FILE));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(SNAPSHOT_DIR)
            .join(SNAPSHOT_FILE),
    )
}
