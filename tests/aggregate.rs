use clubstat_engine::ledger::{PlayerLedger, TeamRef, apply_match_delta};
use clubstat_engine::stats::{StatLine, derive_metrics};

fn delta(shots: u32, hits: u32, catches: u32) -> StatLine {
    StatLine {
        shots_total: shots,
        hits,
        catch_attempts: catches,
        catches,
        ..StatLine::default()
    }
}

#[test]
fn aggregation_increments_matches_played() {
    let mut ledger = PlayerLedger::new(1, "Ana Ruiz");
    let team = TeamRef::Name("Rayo".to_string());
    apply_match_delta(&mut ledger, &team, &delta(5, 2, 1), "2026-03-01T18:00:00Z");
    apply_match_delta(&mut ledger, &team, &delta(4, 1, 0), "2026-03-08T18:00:00Z");
    assert_eq!(ledger.matches_played, 2);

    apply_match_delta(&mut ledger, &team, &delta(6, 3, 2), "2026-03-15T18:00:00Z");
    assert_eq!(ledger.matches_played, 3);
    assert_eq!(ledger.stats.shots_total, 15);
    assert_eq!(ledger.stats.hits, 6);
}

#[test]
fn derived_metrics_match_a_fresh_run_on_the_new_totals() {
    let mut ledger = PlayerLedger::new(1, "Ana Ruiz");
    let team = TeamRef::Id(2);
    apply_match_delta(&mut ledger, &team, &delta(7, 3, 2), "2026-03-01T18:00:00Z");
    apply_match_delta(&mut ledger, &team, &delta(5, 4, 1), "2026-03-08T18:00:00Z");

    // No drift versus recomputing from the cumulative counts.
    assert_eq!(ledger.metrics, derive_metrics(&ledger.stats));
}

#[test]
fn team_blocks_are_summed_independently_per_team() {
    let mut ledger = PlayerLedger::new(1, "Ana Ruiz");
    let rayo = TeamRef::Name("Rayo".to_string());
    let lince = TeamRef::Name("Lince".to_string());
    apply_match_delta(&mut ledger, &rayo, &delta(5, 2, 0), "2026-03-01T18:00:00Z");
    apply_match_delta(&mut ledger, &lince, &delta(3, 1, 0), "2026-03-08T18:00:00Z");
    apply_match_delta(&mut ledger, &rayo, &delta(2, 2, 0), "2026-03-15T18:00:00Z");

    assert_eq!(ledger.team_breakdown.len(), 2);
    let rayo_block = ledger.team_breakdown.iter().find(|b| b.team == rayo).unwrap();
    assert_eq!(rayo_block.stats.shots_total, 7);
    assert_eq!(rayo_block.stats.hits, 4);
    let lince_block = ledger.team_breakdown.iter().find(|b| b.team == lince).unwrap();
    assert_eq!(lince_block.stats.shots_total, 3);

    // Cumulative totals cover both teams.
    assert_eq!(ledger.stats.shots_total, 10);
}

#[test]
fn history_keeps_the_raw_deltas_in_order() {
    let mut ledger = PlayerLedger::new(1, "Ana Ruiz");
    let team = TeamRef::Id(2);
    let first = delta(5, 2, 1);
    let second = delta(4, 1, 0);
    apply_match_delta(&mut ledger, &team, &first, "2026-03-01T18:00:00Z");
    apply_match_delta(&mut ledger, &team, &second, "2026-03-08T18:00:00Z");

    assert_eq!(ledger.match_history.len(), 2);
    assert_eq!(ledger.match_history[0].delta, first);
    assert_eq!(ledger.match_history[0].date, "2026-03-01T18:00:00Z");
    assert_eq!(ledger.match_history[1].delta, second);
}

#[test]
fn resubmitting_the_same_delta_counts_twice() {
    // The aggregator is deliberately not idempotent; exactly-once is the
    // caller's contract.
    let mut ledger = PlayerLedger::new(1, "Ana Ruiz");
    let team = TeamRef::Id(2);
    let d = delta(5, 2, 1);
    apply_match_delta(&mut ledger, &team, &d, "2026-03-01T18:00:00Z");
    apply_match_delta(&mut ledger, &team, &d, "2026-03-01T18:00:00Z");
    assert_eq!(ledger.stats.shots_total, 10);
    assert_eq!(ledger.matches_played, 2);
}

#[test]
fn refresh_metrics_discards_a_hand_edited_projection() {
    let mut ledger = PlayerLedger::new(1, "Ana Ruiz");
    ledger.stats = delta(10, 4, 0);
    ledger.metrics.hit_rate = 99.0;
    ledger.refresh_metrics();
    assert_eq!(ledger.metrics.hit_rate, 40.0);
}
