use serde::{Deserialize, Serialize};

use crate::stats::{DerivedMetrics, StatLine, derive_metrics};

/// A structured roster id when known, otherwise the free-text name the data
/// source used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TeamRef {
    Id(u32),
    Name(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamStatBlock {
    pub team: TeamRef,
    pub stats: StatLine,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchHistoryEntry {
    pub date: String,
    pub team: TeamRef,
    pub delta: StatLine,
}

/// Mutated only through [`apply_match_delta`]; never deleted, collaborators
/// flip `active` instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerLedger {
    pub id: u32,
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub matches_played: u32,
    #[serde(default)]
    pub stats: StatLine,
    #[serde(default)]
    pub metrics: DerivedMetrics,
    #[serde(default)]
    pub team_breakdown: Vec<TeamStatBlock>,
    #[serde(default)]
    pub match_history: Vec<MatchHistoryEntry>,
}

fn default_active() -> bool {
    true
}

impl PlayerLedger {
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            active: true,
            matches_played: 0,
            stats: StatLine::default(),
            metrics: DerivedMetrics::default(),
            team_breakdown: Vec::new(),
            match_history: Vec::new(),
        }
    }

    /// Load paths call this so a stale persisted projection cannot leak
    /// through.
    pub fn refresh_metrics(&mut self) {
        self.metrics = derive_metrics(&self.stats);
    }
}

/// Merge one match's counting delta into the ledger, then recompute the
/// derived projection from the new totals.
///
/// Not idempotent: submitting the same match twice counts it twice. The
/// caller owns the exactly-once contract for finished matches.
pub fn apply_match_delta(ledger: &mut PlayerLedger, team: &TeamRef, delta: &StatLine, date: &str) {
    ledger.stats.merge(delta);
    ledger.matches_played += 1;

    match ledger.team_breakdown.iter_mut().find(|b| b.team == *team) {
        Some(block) => block.stats.merge(delta),
        None => ledger.team_breakdown.push(TeamStatBlock {
            team: team.clone(),
            stats: *delta,
        }),
    }

    ledger.match_history.push(MatchHistoryEntry {
        date: date.to_string(),
        team: team.clone(),
        delta: *delta,
    });

    ledger.refresh_metrics();
}
