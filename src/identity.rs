use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Player identity lives in three loosely-synced places: structured ledger
/// references, the free-text `extra_names` list, and ad-hoc name strings in
/// incoming rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub player_ids: Vec<u32>,
    #[serde(default)]
    pub extra_names: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct Mention<'a> {
    pub name: &'a str,
    pub player_id: Option<u32>,
    pub team_id: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    /// Matched an existing PlayerLedger.
    Player(u32),
    /// Matched (or was registered as) a free-text roster entry, pending
    /// promotion to a full ledger.
    RosterName { team_id: u32, index: usize },
}

/// Identity key for a name: diacritics stripped, lowercased, whitespace
/// collapsed, one leading article and one trailing plural `s` folded.
pub fn normalize_name(raw: &str) -> String {
    let folded: String = raw
        .chars()
        .map(fold_diacritic)
        .flat_map(char::to_lowercase)
        .collect();
    let mut tokens: Vec<&str> = folded.split_whitespace().collect();
    if tokens.len() > 1
        && let Some(first) = tokens.first()
        && matches!(*first, "el" | "la" | "los" | "las" | "the")
    {
        tokens.remove(0);
    }
    let mut out = tokens.join(" ");
    if let Some(last) = tokens.last()
        && last.len() > 3
        && out.ends_with('s')
    {
        out.pop();
    }
    out
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'Á' | 'À' | 'Â' | 'Ä' | 'Ã' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
        'ñ' | 'Ñ' => 'n',
        'ç' | 'Ç' => 'c',
        _ => c,
    }
}

/// When several entries share one normalized key the first by stable index
/// order wins; near-duplicates differing in punctuation or middle names are
/// not folded together.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    // Normalized full name -> ledger id, first occurrence wins.
    ledger_index: HashMap<String, u32>,
}

impl IdentityResolver {
    pub fn new<'a>(ledger_names: impl IntoIterator<Item = (u32, &'a str)>) -> Self {
        let mut ledger_index = HashMap::new();
        for (id, name) in ledger_names {
            ledger_index.entry(normalize_name(name)).or_insert(id);
        }
        Self { ledger_index }
    }

    /// Register a ledger created mid-batch so later mentions reuse it.
    pub fn learn(&mut self, id: u32, name: &str) {
        self.ledger_index.entry(normalize_name(name)).or_insert(id);
    }

    /// Resolution order: known reference id, then ledger full-name match,
    /// then the mentioned team's free-text roster.
    pub fn resolve(&self, mention: Mention<'_>, teams: &[Team]) -> Option<Resolved> {
        if let Some(id) = mention.player_id {
            return Some(Resolved::Player(id));
        }
        let key = normalize_name(mention.name);
        if key.is_empty() {
            return None;
        }
        if let Some(id) = self.ledger_index.get(&key) {
            return Some(Resolved::Player(*id));
        }
        if let Some(team_id) = mention.team_id
            && let Some(team) = teams.iter().find(|t| t.id == team_id)
            && let Some(index) = team
                .extra_names
                .iter()
                .position(|n| normalize_name(n) == key)
        {
            return Some(Resolved::RosterName { team_id, index });
        }
        None
    }

    /// Resolve, or register the mention as a new free-text roster entry on
    /// its team.
    pub fn resolve_or_register(
        &self,
        mention: Mention<'_>,
        teams: &mut [Team],
    ) -> Option<Resolved> {
        if let Some(found) = self.resolve(mention, teams) {
            return Some(found);
        }
        let team_id = mention.team_id?;
        let team = teams.iter_mut().find(|t| t.id == team_id)?;
        let trimmed = mention.name.trim();
        if trimmed.is_empty() {
            return None;
        }
        team.extra_names.push(trimmed.to_string());
        Some(Resolved::RosterName {
            team_id,
            index: team.extra_names.len() - 1,
        })
    }
}

/// Strictly additive union into the team's free-text roster; returns the
/// number of names added.
pub fn merge_roster_names(team: &mut Team, incoming: &[String]) -> usize {
    let mut seen: Vec<String> = team.extra_names.iter().map(|n| normalize_name(n)).collect();
    let mut added = 0usize;
    for name in incoming {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            continue;
        }
        let key = normalize_name(trimmed);
        if seen.iter().any(|s| *s == key) {
            continue;
        }
        team.extra_names.push(trimmed.to_string());
        seen.push(key);
        added += 1;
    }
    added
}
