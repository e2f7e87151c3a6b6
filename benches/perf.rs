use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use clubstat_engine::sheet::{AliasTable, IngestDefaults, SheetRow, summarize};
use clubstat_engine::standings::{MatchRecord, MatchStatus, replay};
use clubstat_engine::stats::{StatLine, derive_metrics};
use serde_json::json;

fn sample_stats(seed: u32) -> StatLine {
    StatLine {
        shots_total: 10 + seed % 7,
        hits: 3 + seed % 4,
        forced_outs: seed % 3,
        assists: seed % 2,
        catch_attempts: 4 + seed % 3,
        catches: 1 + seed % 2,
        block_attempts: 2 + seed % 2,
        blocks: seed % 2,
        shots_received: 8 + seed % 5,
        times_put_out: seed % 4,
        unforced_dodges: seed % 3,
        ..StatLine::default()
    }
}

fn bench_derive_metrics(c: &mut Criterion) {
    let stats = sample_stats(5);
    c.bench_function("derive_metrics", |b| {
        b.iter(|| {
            let m = derive_metrics(black_box(&stats));
            black_box(m.power_index);
        })
    });
}

fn bench_standings_replay(c: &mut Criterion) {
    let teams: Vec<String> = (0..20).map(|i| format!("Team {i}")).collect();
    let matches: Vec<MatchRecord> = (0..2000u32)
        .map(|i| MatchRecord {
            team_a: format!("Team {}", i % 20),
            team_b: format!("Team {}", (i + 7) % 20),
            score_a: i % 5,
            score_b: (i / 3) % 4,
            status: MatchStatus::Finished,
            played_at: format!("2026-{:02}-{:02}T18:00:00Z", 1 + (i / 200) % 12, 1 + i % 28),
            rows: Vec::new(),
        })
        .collect();

    c.bench_function("standings_replay_2000", |b| {
        b.iter(|| {
            let table = replay(black_box(&teams), black_box(&matches));
            black_box(table.rows.len());
        })
    });
}

fn bench_sheet_summarize(c: &mut Criterion) {
    let rows: Vec<SheetRow> = (0..5000u32)
        .map(|i| {
            json!({
                "Category": if i % 2 == 0 { "Senior" } else { "Junior" },
                "Team": format!("Team {}", i % 12),
                "Player": format!("Player {}", i % 120),
                "Shots": i % 9,
                "Hits": (i % 9).min(4),
                "Catches": i % 3,
                "Blocks": i % 2,
                "Notes": "ignored column"
            })
            .as_object()
            .expect("row is an object")
            .clone()
        })
        .collect();
    let defaults = IngestDefaults::default();

    c.bench_function("sheet_summarize_5000", |b| {
        b.iter(|| {
            let summary = summarize(
                black_box(AliasTable::built_in()),
                black_box(&defaults),
                black_box(&rows),
            )
            .expect("summarize should succeed");
            black_box(summary.cells_matched);
        })
    });
}

fn bench_sheet_parse(c: &mut Criterion) {
    c.bench_function("sheet_rows_parse", |b| {
        b.iter(|| {
            let rows: Vec<SheetRow> =
                serde_json::from_str(black_box(SHEET_JSON)).expect("fixture should parse");
            black_box(rows.len());
        })
    });
}

criterion_group!(
    perf,
    bench_derive_metrics,
    bench_standings_replay,
    bench_sheet_summarize,
    bench_sheet_parse
);
criterion_main!(perf);

static SHEET_JSON: &str = include_str!("../tests/fixtures/sheet_rows.json");
