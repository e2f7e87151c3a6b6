use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::stats::StatLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Local,
    Visitor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxScoreRow {
    pub player_name: String,
    pub side: Side,
    #[serde(default)]
    pub stats: StatLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Scheduled,
    Finished,
}

/// Immutable once finished except for explicit correction, after which
/// standings must be rebuilt by a full replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub team_a: String,
    pub team_b: String,
    pub score_a: u32,
    pub score_b: u32,
    pub status: MatchStatus,
    pub played_at: String,
    #[serde(default)]
    pub rows: Vec<BoxScoreRow>,
}

impl MatchRecord {
    /// Field-wise sum of this side's player rows; recomputed on demand,
    /// never stored.
    pub fn side_totals(&self, side: Side) -> StatLine {
        let mut totals = StatLine::default();
        for row in self.rows.iter().filter(|r| r.side == side) {
            totals.merge(&row.stats);
        }
        totals
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub team: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_diff: i64,
    pub points: u32,
}

impl StandingsRow {
    fn new(team: &str) -> Self {
        Self {
            team: team.to_string(),
            ..Self::default()
        }
    }
}

/// The rebuilt table plus diagnostics for any skipped match.
#[derive(Debug, Clone, Default)]
pub struct StandingsReplay {
    pub rows: Vec<StandingsRow>,
    pub skipped: Vec<String>,
}

const WIN_POINTS: u32 = 3;
const DRAW_POINTS: u32 = 1;

/// Rebuild the league table from scratch by replaying every finished match
/// in chronological order, never an incremental update. A match naming an
/// unknown team is skipped and recorded in the diagnostics.
pub fn replay(teams: &[String], matches: &[MatchRecord]) -> StandingsReplay {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(teams.len());
    let mut rows: Vec<StandingsRow> = Vec::with_capacity(teams.len());
    for name in teams {
        index.entry(name.as_str()).or_insert_with(|| {
            rows.push(StandingsRow::new(name));
            rows.len() - 1
        });
    }

    let mut ordered: Vec<&MatchRecord> = matches
        .iter()
        .filter(|m| m.status == MatchStatus::Finished)
        .collect();
    // RFC 3339 timestamps sort correctly as strings; stable sort keeps the
    // input order for identical dates.
    ordered.sort_by(|a, b| a.played_at.cmp(&b.played_at));

    let mut replay = StandingsReplay::default();
    for m in ordered {
        let (Some(&ia), Some(&ib)) = (index.get(m.team_a.as_str()), index.get(m.team_b.as_str()))
        else {
            let unknown: Vec<String> = [&m.team_a, &m.team_b]
                .into_iter()
                .filter(|n| !index.contains_key(n.as_str()))
                .map(|n| format!("'{n}'"))
                .collect();
            replay.skipped.push(format!(
                "skipped {} vs {} ({}): unknown team {}",
                m.team_a, m.team_b, m.played_at,
                unknown.join(", ")
            ));
            continue;
        };

        apply_side(&mut rows[ia], m.score_a, m.score_b);
        apply_side(&mut rows[ib], m.score_b, m.score_a);
    }

    // Points, then goal difference, then goals scored; name breaks full ties.
    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goal_diff.cmp(&a.goal_diff))
            .then(b.goals_for.cmp(&a.goals_for))
            .then(a.team.cmp(&b.team))
    });
    replay.rows = rows;
    replay
}

fn apply_side(row: &mut StandingsRow, goals_for: u32, goals_against: u32) {
    row.played += 1;
    row.goals_for += goals_for;
    row.goals_against += goals_against;
    match goals_for.cmp(&goals_against) {
        std::cmp::Ordering::Greater => {
            row.won += 1;
            row.points += WIN_POINTS;
        }
        std::cmp::Ordering::Less => {
            row.lost += 1;
        }
        std::cmp::Ordering::Equal => {
            row.drawn += 1;
            row.points += DRAW_POINTS;
        }
    }
    row.goal_diff = i64::from(row.goals_for) - i64::from(row.goals_against);
}
