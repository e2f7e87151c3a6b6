use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::identity::{IdentityResolver, Mention, Resolved, Team, merge_roster_names, normalize_name};
use crate::ledger::{PlayerLedger, TeamRef, apply_match_delta};
use crate::sheet::{AliasTable, IngestDefaults, SheetRow, SheetSummary, summarize};
use crate::standings::{MatchRecord, MatchStatus, Side, StandingsReplay, replay};

/// One league's ledgers, rosters and match history. All mutation goes
/// through [`ClubStore::with_league`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeagueState {
    #[serde(default)]
    pub players: Vec<PlayerLedger>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
    #[serde(default)]
    next_player_id: u32,
    #[serde(default)]
    next_team_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResultInput {
    pub team_a: String,
    pub team_b: String,
    pub score_a: u32,
    pub score_b: u32,
    pub status: MatchStatus,
    #[serde(default)]
    pub played_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct CommitReport {
    pub rows_seen: usize,
    pub cells_matched: usize,
    pub teams_created: usize,
    pub players_created: usize,
    pub players_updated: usize,
    pub names_registered: usize,
}

#[derive(Debug, Clone, Default)]
pub struct AggregateReport {
    pub players_created: usize,
    pub players_updated: usize,
}

impl LeagueState {
    /// Find the team by normalized name ("Los Tigres" and "tigres" land on
    /// the same roster), or register a new one.
    pub fn ensure_team(&mut self, name: &str) -> u32 {
        let key = normalize_name(name);
        if let Some(team) = self.teams.iter().find(|t| normalize_name(&t.name) == key) {
            return team.id;
        }
        let id = self.next_team_id;
        self.next_team_id += 1;
        self.teams.push(Team {
            id,
            name: name.trim().to_string(),
            player_ids: Vec::new(),
            extra_names: Vec::new(),
        });
        id
    }

    pub fn player_mut(&mut self, id: u32) -> Option<&mut PlayerLedger> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    fn resolver(&self) -> IdentityResolver {
        IdentityResolver::new(self.players.iter().map(|p| (p.id, p.name.as_str())))
    }

    /// Create a ledger for a previously-unseen name and attach it to the
    /// team's structured roster. Callers check the resolver first; that is
    /// what keeps one ledger per normalized full name.
    fn promote(&mut self, name: &str, team_id: u32) -> u32 {
        let id = self.next_player_id;
        self.next_player_id += 1;
        self.players.push(PlayerLedger::new(id, name.trim()));
        if let Some(team) = self.teams.iter_mut().find(|t| t.id == team_id) {
            team.player_ids.push(id);
        }
        id
    }

    /// Merge one spreadsheet summary into the ledgers, registering and
    /// promoting unknown names as needed.
    pub fn commit_summary(&mut self, summary: &SheetSummary) -> CommitReport {
        let mut report = CommitReport {
            rows_seen: summary.rows_seen,
            cells_matched: summary.cells_matched,
            ..CommitReport::default()
        };
        let mut resolver = self.resolver();

        // Deterministic apply order regardless of map iteration.
        let mut categories: Vec<&String> = summary.categories.keys().collect();
        categories.sort();

        for category in categories {
            let cat = &summary.categories[category];
            let mut player_names: Vec<&String> = cat.players.keys().collect();
            player_names.sort();

            for player_name in player_names {
                let totals = &cat.players[player_name];
                if totals.stats.is_empty() {
                    continue;
                }
                let teams_before = self.teams.len();
                let team_id = self.ensure_team(&totals.team);
                report.teams_created += self.teams.len() - teams_before;

                let mention = Mention {
                    name: player_name.as_str(),
                    player_id: None,
                    team_id: Some(team_id),
                };
                let ledger_id = match resolver.resolve(mention, &self.teams) {
                    Some(Resolved::Player(id)) => {
                        report.players_updated += 1;
                        id
                    }
                    Some(Resolved::RosterName { team_id, .. }) => {
                        // Pending free-text entry with stats to land.
                        report.players_created += 1;
                        let id = self.promote(player_name, team_id);
                        resolver.learn(id, player_name);
                        id
                    }
                    None => {
                        let Some(Resolved::RosterName { team_id, .. }) =
                            resolver.resolve_or_register(mention, &mut self.teams)
                        else {
                            continue;
                        };
                        report.names_registered += 1;
                        report.players_created += 1;
                        let id = self.promote(player_name, team_id);
                        resolver.learn(id, player_name);
                        id
                    }
                };
                if let Some(ledger) = self.player_mut(ledger_id) {
                    apply_match_delta(
                        ledger,
                        &TeamRef::Id(team_id),
                        &totals.stats,
                        &now_rfc3339(),
                    );
                }
            }
        }
        report
    }

    /// Record one match and, when it is finished, aggregate its box-score
    /// rows into the player ledgers.
    ///
    /// Exactly-once is the caller's contract: re-submitting a finished match
    /// aggregates it again.
    pub fn aggregate_match(&mut self, record: MatchRecord) -> AggregateReport {
        let mut report = AggregateReport::default();
        if record.status == MatchStatus::Finished {
            let team_a = self.ensure_team(&record.team_a);
            let team_b = self.ensure_team(&record.team_b);
            let mut resolver = self.resolver();

            for row in &record.rows {
                let team_id = match row.side {
                    Side::Local => team_a,
                    Side::Visitor => team_b,
                };
                let mention = Mention {
                    name: &row.player_name,
                    player_id: None,
                    team_id: Some(team_id),
                };
                let ledger_id = match resolver.resolve_or_register(mention, &mut self.teams) {
                    Some(Resolved::Player(id)) => {
                        report.players_updated += 1;
                        id
                    }
                    Some(Resolved::RosterName { team_id, .. }) => {
                        report.players_created += 1;
                        let id = self.promote(&row.player_name, team_id);
                        resolver.learn(id, &row.player_name);
                        id
                    }
                    None => continue,
                };
                if let Some(ledger) = self.player_mut(ledger_id) {
                    apply_match_delta(ledger, &TeamRef::Id(team_id), &row.stats, &record.played_at);
                }
            }
        }
        self.matches.push(record);
        report
    }

    /// Record a bare result (no box scores) from a collaborator.
    pub fn record_result(&mut self, input: MatchResultInput) {
        self.ensure_team(&input.team_a);
        self.ensure_team(&input.team_b);
        self.matches.push(MatchRecord {
            team_a: input.team_a,
            team_b: input.team_b,
            score_a: input.score_a,
            score_b: input.score_b,
            status: input.status,
            played_at: input.played_at,
            rows: Vec::new(),
        });
    }

    /// Correct a scoreline and return the replayed table.
    pub fn correct_match(&mut self, index: usize, score_a: u32, score_b: u32) -> Result<StandingsReplay> {
        let m = self
            .matches
            .get_mut(index)
            .with_context(|| format!("no match at index {index}"))?;
        m.score_a = score_a;
        m.score_b = score_b;
        Ok(self.standings())
    }

    pub fn standings(&self) -> StandingsReplay {
        let names: Vec<String> = self.teams.iter().map(|t| t.name.clone()).collect();
        replay(&names, &self.matches)
    }

    /// Re-seat the id counters above every id already in use, so hand-edited
    /// snapshots cannot hand out duplicates.
    pub fn reseed_counters(&mut self) {
        if let Some(max) = self.players.iter().map(|p| p.id).max() {
            self.next_player_id = self.next_player_id.max(max + 1);
        }
        if let Some(max) = self.teams.iter().map(|t| t.id).max() {
            self.next_team_id = self.next_team_id.max(max + 1);
        }
    }

    /// Additive union of free-text names into a team roster.
    pub fn merge_team_names(&mut self, team_id: u32, names: &[String]) -> usize {
        match self.teams.iter_mut().find(|t| t.id == team_id) {
            Some(team) => merge_roster_names(team, names),
            None => 0,
        }
    }
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// League states keyed by league identity, each behind its own lock so
/// concurrent commits against one league cannot interleave.
#[derive(Debug, Default)]
pub struct ClubStore {
    leagues: Mutex<HashMap<String, Arc<Mutex<LeagueState>>>>,
}

impl ClubStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn league(&self, key: &str) -> Arc<Mutex<LeagueState>> {
        let mut leagues = self.leagues.lock().unwrap_or_else(|e| e.into_inner());
        leagues.entry(key.to_string()).or_default().clone()
    }

    /// Run `f` with exclusive access to one league. The registry lock is
    /// released before `f` runs, so distinct leagues mutate in parallel.
    pub fn with_league<T>(&self, key: &str, f: impl FnOnce(&mut LeagueState) -> T) -> T {
        let league = self.league(key);
        let mut state = league.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }

    /// Pure summary, nothing persisted.
    pub fn preview_sheet(
        table: &AliasTable,
        defaults: &IngestDefaults,
        rows: &[SheetRow],
    ) -> Result<SheetSummary> {
        summarize(table, defaults, rows)
    }

    pub fn commit_sheet(
        &self,
        key: &str,
        table: &AliasTable,
        defaults: &IngestDefaults,
        rows: &[SheetRow],
    ) -> Result<CommitReport> {
        let summary = summarize(table, defaults, rows)?;
        Ok(self.with_league(key, |league| league.commit_summary(&summary)))
    }

    pub fn snapshot(&self) -> HashMap<String, LeagueState> {
        let leagues = self.leagues.lock().unwrap_or_else(|e| e.into_inner());
        leagues
            .iter()
            .map(|(key, league)| {
                let state = league.lock().unwrap_or_else(|e| e.into_inner());
                (key.clone(), state.clone())
            })
            .collect()
    }

    pub fn restore(&self, leagues: HashMap<String, LeagueState>) {
        let mut registry = self.leagues.lock().unwrap_or_else(|e| e.into_inner());
        registry.clear();
        for (key, state) in leagues {
            registry.insert(key, Arc::new(Mutex::new(state)));
        }
    }
}
