use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use clubstat_engine::persist;
use clubstat_engine::sheet::{AliasTable, IngestDefaults, SheetRow};
use clubstat_engine::standings::MatchRecord;
use clubstat_engine::store::ClubStore;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        print_usage();
        return Ok(());
    };

    match command {
        "preview" => preview(&args[1..]),
        "commit" => commit(&args[1..]),
        "match" => ingest_match(&args[1..]),
        "standings" => standings(&args[1..]),
        other => {
            print_usage();
            Err(anyhow!("unknown command '{other}'"))
        }
    }
}

fn print_usage() {
    println!("usage:");
    println!("  clubstat_engine preview <sheet.json>");
    println!("  clubstat_engine commit <sheet.json> [--league <key>] [--store <path>]");
    println!("  clubstat_engine match <match.json> [--league <key>] [--store <path>]");
    println!("  clubstat_engine standings [--league <key>] [--store <path>]");
}

fn preview(args: &[String]) -> Result<()> {
    let rows = read_sheet_rows(args)?;
    let summary =
        ClubStore::preview_sheet(AliasTable::built_in(), &IngestDefaults::from_env(), &rows)?;

    println!(
        "Preview: {} rows, {} stat cells matched",
        summary.rows_seen, summary.cells_matched
    );
    let mut categories: Vec<&String> = summary.categories.keys().collect();
    categories.sort();
    for category in categories {
        let cat = &summary.categories[category];
        println!("[{category}]");
        let mut teams: Vec<&String> = cat.teams.keys().collect();
        teams.sort();
        for team in teams {
            let s = &cat.teams[team];
            println!(
                "  team {team}: shots={} hits={} catches={} blocks={}",
                s.shots_total, s.hits, s.catches, s.blocks
            );
        }
        let mut players: Vec<&String> = cat.players.keys().collect();
        players.sort();
        for player in players {
            let p = &cat.players[player];
            println!(
                "  player {player} ({}): shots={} hits={} catches={} blocks={}",
                p.team, p.stats.shots_total, p.stats.hits, p.stats.catches, p.stats.blocks
            );
        }
    }
    Ok(())
}

fn commit(args: &[String]) -> Result<()> {
    let rows = read_sheet_rows(args)?;
    let store_path = resolve_store_path(args)?;
    let league = league_key(args);

    let store = ClubStore::new();
    persist::load_store(&store, &store_path)?;
    let report = store.commit_sheet(
        &league,
        AliasTable::built_in(),
        &IngestDefaults::from_env(),
        &rows,
    )?;
    persist::save_store(&store, &store_path)?;

    println!("Commit complete (league '{league}')");
    println!("Rows: {} ({} stat cells)", report.rows_seen, report.cells_matched);
    println!(
        "Players: {} created, {} updated ({} names registered)",
        report.players_created, report.players_updated, report.names_registered
    );
    println!("Teams created: {}", report.teams_created);
    println!("Store: {}", store_path.display());
    Ok(())
}

fn ingest_match(args: &[String]) -> Result<()> {
    let path = positional_arg(args).context("expected a match json file")?;
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("read match file {}", path.display()))?;
    let record: MatchRecord =
        serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;

    let store_path = resolve_store_path(args)?;
    let league = league_key(args);

    let store = ClubStore::new();
    persist::load_store(&store, &store_path)?;
    let report = store.with_league(&league, |state| state.aggregate_match(record));
    persist::save_store(&store, &store_path)?;

    println!("Match ingested (league '{league}')");
    println!(
        "Players: {} created, {} updated",
        report.players_created, report.players_updated
    );
    Ok(())
}

fn standings(args: &[String]) -> Result<()> {
    let store_path = resolve_store_path(args)?;
    let league = league_key(args);

    let store = ClubStore::new();
    persist::load_store(&store, &store_path)?;
    let table = store.with_league(&league, |state| state.standings());

    println!(
        "{:<24} {:>2} {:>2} {:>2} {:>2} {:>3} {:>3} {:>4} {:>3}",
        "team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts"
    );
    for row in &table.rows {
        println!(
            "{:<24} {:>2} {:>2} {:>2} {:>2} {:>3} {:>3} {:>4} {:>3}",
            row.team,
            row.played,
            row.won,
            row.drawn,
            row.lost,
            row.goals_for,
            row.goals_against,
            row.goal_diff,
            row.points
        );
    }
    if !table.skipped.is_empty() {
        println!("skipped matches: {}", table.skipped.len());
        for diag in table.skipped.iter().take(6) {
            println!("  - {diag}");
        }
    }
    Ok(())
}

fn read_sheet_rows(args: &[String]) -> Result<Vec<SheetRow>> {
    let path = positional_arg(args).context("expected a sheet json file")?;
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("read sheet file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))
}

fn positional_arg(args: &[String]) -> Option<PathBuf> {
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg == "--store" || arg == "--league" {
            skip_next = true;
            continue;
        }
        if arg.starts_with("--") {
            continue;
        }
        return Some(PathBuf::from(arg));
    }
    None
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

fn resolve_store_path(args: &[String]) -> Result<PathBuf> {
    flag_value(args, "--store")
        .map(PathBuf::from)
        .or_else(persist::default_store_path)
        .context("unable to resolve store path")
}

fn league_key(args: &[String]) -> String {
    flag_value(args, "--league")
        .or_else(|| {
            std::env::var("CLUB_LEAGUE")
                .ok()
                .filter(|v| !v.trim().is_empty())
        })
        .unwrap_or_else(|| "default".to_string())
}
