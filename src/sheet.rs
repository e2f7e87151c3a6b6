use std::collections::HashMap;

use anyhow::{Result, anyhow};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::stats::{CountKey, StatLine};

/// Arbitrary header -> raw cell value, exactly as uploaded.
pub type SheetRow = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKey {
    Category,
    Team,
    Player,
    Count(CountKey),
    /// Recognized but never accumulated.
    Derived(DerivedKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivedKey {
    AttackIndex,
    DefenseIndex,
    WeightedSet,
}

/// Header-spelling -> canonical-key map. Lookup is a case-insensitive exact
/// match after trimming, not fuzzy.
#[derive(Debug, Clone)]
pub struct AliasTable {
    map: HashMap<String, ColumnKey>,
}

impl AliasTable {
    pub fn new(pairs: &[(&str, ColumnKey)]) -> Self {
        let mut map = HashMap::with_capacity(pairs.len());
        for (spelling, key) in pairs {
            map.insert(spelling.trim().to_lowercase(), *key);
        }
        Self { map }
    }

    pub fn resolve(&self, header: &str) -> Option<ColumnKey> {
        self.map.get(&header.trim().to_lowercase()).copied()
    }

    /// The spellings seen across the club's exports; callers needing more
    /// build their own table and inject it.
    pub fn built_in() -> &'static AliasTable {
        &BUILT_IN
    }
}

static BUILT_IN: Lazy<AliasTable> = Lazy::new(|| {
    use ColumnKey::*;
    use CountKey::*;
    AliasTable::new(&[
        ("category", Category),
        ("categoria", Category),
        ("categoría", Category),
        ("team", Team),
        ("equipo", Team),
        ("club", Team),
        ("player", Player),
        ("jugador", Player),
        ("name", Player),
        ("nombre", Player),
        ("shots", Count(ShotsTotal)),
        ("shots total", Count(ShotsTotal)),
        ("total shots", Count(ShotsTotal)),
        ("lanzamientos", Count(ShotsTotal)),
        ("hits", Count(Hits)),
        ("local hits", Count(Hits)),
        ("hits local", Count(Hits)),
        ("golpeos", Count(Hits)),
        ("forced outs", Count(ForcedOuts)),
        ("outs forced", Count(ForcedOuts)),
        ("eliminaciones", Count(ForcedOuts)),
        ("assists", Count(Assists)),
        ("asistencias", Count(Assists)),
        ("shots received", Count(ShotsReceived)),
        ("received shots", Count(ShotsReceived)),
        ("lanzamientos recibidos", Count(ShotsReceived)),
        ("hits received", Count(HitsReceived)),
        ("received hits", Count(HitsReceived)),
        ("golpeos recibidos", Count(HitsReceived)),
        ("dodges", Count(Dodges)),
        ("esquivas", Count(Dodges)),
        ("unforced dodges", Count(UnforcedDodges)),
        ("free dodges", Count(UnforcedDodges)),
        ("esquivas no forzadas", Count(UnforcedDodges)),
        ("times out", Count(TimesPutOut)),
        ("times put out", Count(TimesPutOut)),
        ("veces eliminado", Count(TimesPutOut)),
        ("catch attempts", Count(CatchAttempts)),
        ("intentos de recepcion", Count(CatchAttempts)),
        ("catches", Count(Catches)),
        ("recepciones", Count(Catches)),
        ("block attempts", Count(BlockAttempts)),
        ("intentos de bloqueo", Count(BlockAttempts)),
        ("blocks", Count(Blocks)),
        ("bloqueos", Count(Blocks)),
        ("line faults", Count(LineFaults)),
        ("faltas de linea", Count(LineFaults)),
        ("catches conceded", Count(CatchesConceded)),
        ("recepciones concedidas", Count(CatchesConceded)),
        ("yellow cards", Count(YellowCards)),
        ("tarjetas amarillas", Count(YellowCards)),
        ("red cards", Count(RedCards)),
        ("tarjetas rojas", Count(RedCards)),
        ("sets played", Count(SetsPlayed)),
        ("sets", Count(SetsPlayed)),
        ("sets jugados", Count(SetsPlayed)),
        ("attack index", Derived(DerivedKey::AttackIndex)),
        ("attackindex", Derived(DerivedKey::AttackIndex)),
        ("defense index", Derived(DerivedKey::DefenseIndex)),
        ("defenseindex", Derived(DerivedKey::DefenseIndex)),
        ("weighted set", Derived(DerivedKey::WeightedSet)),
        ("weightedset", Derived(DerivedKey::WeightedSet)),
    ])
});

/// Fallback labels for rows that name no category or team.
#[derive(Debug, Clone)]
pub struct IngestDefaults {
    pub category: String,
    pub team: String,
}

impl Default for IngestDefaults {
    fn default() -> Self {
        Self {
            category: "General".to_string(),
            team: "No Team".to_string(),
        }
    }
}

impl IngestDefaults {
    pub fn from_env() -> Self {
        let base = Self::default();
        Self {
            category: std::env::var("SHEET_DEFAULT_CATEGORY")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(base.category),
            team: std::env::var("SHEET_DEFAULT_TEAM")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(base.team),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerTotals {
    pub team: String,
    pub stats: StatLine,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategorySummary {
    pub teams: HashMap<String, StatLine>,
    pub players: HashMap<String, PlayerTotals>,
}

/// Totals for one spreadsheet, before any identity resolution or
/// persistence. The preview payload; the store's commit path merges it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetSummary {
    pub categories: HashMap<String, CategorySummary>,
    pub rows_seen: usize,
    pub cells_matched: usize,
}

/// Rejects an empty table upfront; otherwise never fails, coercing unknown
/// or malformed cells to zero contributions.
pub fn summarize(table: &AliasTable, defaults: &IngestDefaults, rows: &[SheetRow]) -> Result<SheetSummary> {
    if rows.is_empty() {
        return Err(anyhow!("spreadsheet contains no rows"));
    }

    let mut summary = SheetSummary::default();
    for row in rows {
        let mut category = defaults.category.clone();
        let mut team = defaults.team.clone();
        let mut player: Option<String> = None;
        let mut delta = StatLine::default();

        for (header, value) in row {
            match table.resolve(header) {
                Some(ColumnKey::Category) => {
                    if let Some(text) = cell_text(value) {
                        category = text;
                    }
                }
                Some(ColumnKey::Team) => {
                    if let Some(text) = cell_text(value) {
                        team = text;
                    }
                }
                Some(ColumnKey::Player) => {
                    if player.is_none() {
                        player = cell_text(value);
                    }
                }
                Some(ColumnKey::Count(key)) => {
                    delta.add(key, coerce_count(value));
                    summary.cells_matched += 1;
                }
                // Derived values are never accumulated.
                Some(ColumnKey::Derived(_)) | None => {}
            }
        }

        let cat = summary.categories.entry(category).or_default();
        cat.teams.entry(team.clone()).or_default().merge(&delta);
        if let Some(player_name) = player {
            let totals = cat.players.entry(player_name).or_insert_with(|| PlayerTotals {
                team: team.clone(),
                stats: StatLine::default(),
            });
            totals.stats.merge(&delta);
        }
        summary.rows_seen += 1;
    }
    Ok(summary)
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Non-numeric and blank cells become 0, decimals truncate, negatives clamp.
pub fn coerce_count(value: &Value) -> u32 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_loose_number(s),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() && v > 0.0 => v.trunc().min(f64::from(u32::MAX)) as u32,
        _ => 0,
    }
}

// Accepts "12", " 12 ", "1,204", "12.7" and similar decorated spellings.
fn parse_loose_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || s == "-" {
        return None;
    }
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    cleaned.parse::<f64>().ok()
}
