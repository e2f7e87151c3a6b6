use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatLine {
    pub shots_total: u32,
    pub hits: u32,
    pub forced_outs: u32,
    pub assists: u32,
    pub shots_received: u32,
    pub hits_received: u32,
    pub dodges: u32,
    pub unforced_dodges: u32,
    pub times_put_out: u32,
    pub catch_attempts: u32,
    pub catches: u32,
    pub block_attempts: u32,
    pub blocks: u32,
    pub line_faults: u32,
    pub catches_conceded: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
    pub sets_played: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountKey {
    ShotsTotal,
    Hits,
    ForcedOuts,
    Assists,
    ShotsReceived,
    HitsReceived,
    Dodges,
    UnforcedDodges,
    TimesPutOut,
    CatchAttempts,
    Catches,
    BlockAttempts,
    Blocks,
    LineFaults,
    CatchesConceded,
    YellowCards,
    RedCards,
    SetsPlayed,
}

impl StatLine {
    pub fn add(&mut self, key: CountKey, amount: u32) {
        let slot = match key {
            CountKey::ShotsTotal => &mut self.shots_total,
            CountKey::Hits => &mut self.hits,
            CountKey::ForcedOuts => &mut self.forced_outs,
            CountKey::Assists => &mut self.assists,
            CountKey::ShotsReceived => &mut self.shots_received,
            CountKey::HitsReceived => &mut self.hits_received,
            CountKey::Dodges => &mut self.dodges,
            CountKey::UnforcedDodges => &mut self.unforced_dodges,
            CountKey::TimesPutOut => &mut self.times_put_out,
            CountKey::CatchAttempts => &mut self.catch_attempts,
            CountKey::Catches => &mut self.catches,
            CountKey::BlockAttempts => &mut self.block_attempts,
            CountKey::Blocks => &mut self.blocks,
            CountKey::LineFaults => &mut self.line_faults,
            CountKey::CatchesConceded => &mut self.catches_conceded,
            CountKey::YellowCards => &mut self.yellow_cards,
            CountKey::RedCards => &mut self.red_cards,
            CountKey::SetsPlayed => &mut self.sets_played,
        };
        *slot = slot.saturating_add(amount);
    }

    pub fn merge(&mut self, other: &StatLine) {
        self.shots_total = self.shots_total.saturating_add(other.shots_total);
        self.hits = self.hits.saturating_add(other.hits);
        self.forced_outs = self.forced_outs.saturating_add(other.forced_outs);
        self.assists = self.assists.saturating_add(other.assists);
        self.shots_received = self.shots_received.saturating_add(other.shots_received);
        self.hits_received = self.hits_received.saturating_add(other.hits_received);
        self.dodges = self.dodges.saturating_add(other.dodges);
        self.unforced_dodges = self.unforced_dodges.saturating_add(other.unforced_dodges);
        self.times_put_out = self.times_put_out.saturating_add(other.times_put_out);
        self.catch_attempts = self.catch_attempts.saturating_add(other.catch_attempts);
        self.catches = self.catches.saturating_add(other.catches);
        self.block_attempts = self.block_attempts.saturating_add(other.block_attempts);
        self.blocks = self.blocks.saturating_add(other.blocks);
        self.line_faults = self.line_faults.saturating_add(other.line_faults);
        self.catches_conceded = self.catches_conceded.saturating_add(other.catches_conceded);
        self.yellow_cards = self.yellow_cards.saturating_add(other.yellow_cards);
        self.red_cards = self.red_cards.saturating_add(other.red_cards);
        self.sets_played = self.sets_played.saturating_add(other.sets_played);
    }

    pub fn is_empty(&self) -> bool {
        *self == StatLine::default()
    }
}

/// Projection of a StatLine: recomputed wholesale whenever counts change,
/// never incremented and never trusted as stored truth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DerivedMetrics {
    pub hit_rate: f64,
    pub catch_rate: f64,
    pub block_rate: f64,
    pub out_rate: f64,
    pub attack_index: f64,
    pub defense_index: f64,
    pub power_index: f64,
}

const HIT_WEIGHT: f64 = 2.0;
const FORCED_OUT_WEIGHT: f64 = 3.0;
const ASSIST_WEIGHT: f64 = 1.0;
const CATCH_WEIGHT: f64 = 2.0;
const BLOCK_WEIGHT: f64 = 1.5;
const UNFORCED_DODGE_WEIGHT: f64 = 1.0;
// Accuracy above this hit-rate earns a small attack bonus.
const HIT_RATE_BONUS_FLOOR: f64 = 30.0;

/// Zero denominators yield 0 rather than NaN or infinity.
pub fn derive_metrics(stats: &StatLine) -> DerivedMetrics {
    let hit_rate = pct(stats.hits, stats.shots_total);
    let catch_rate = pct(stats.catches, stats.catch_attempts);
    let block_rate = pct(stats.blocks, stats.block_attempts);
    let out_rate = pct(stats.times_put_out, stats.shots_received);

    let accuracy_bonus = if hit_rate > HIT_RATE_BONUS_FLOOR {
        (hit_rate - HIT_RATE_BONUS_FLOOR) * 0.1
    } else {
        0.0
    };
    let attack_index = f64::from(stats.hits) * HIT_WEIGHT
        + f64::from(stats.forced_outs) * FORCED_OUT_WEIGHT
        + f64::from(stats.assists) * ASSIST_WEIGHT
        + accuracy_bonus;
    let defense_index = f64::from(stats.catches) * CATCH_WEIGHT
        + f64::from(stats.blocks) * BLOCK_WEIGHT
        + f64::from(stats.unforced_dodges) * UNFORCED_DODGE_WEIGHT
        + catch_rate * 0.1
        + block_rate * 0.05;

    let attack_index = round2(attack_index);
    let defense_index = round2(defense_index);
    DerivedMetrics {
        hit_rate: round2(hit_rate),
        catch_rate: round2(catch_rate),
        block_rate: round2(block_rate),
        out_rate: round2(out_rate),
        attack_index,
        defense_index,
        // The power index is the sum of the indices as published, not of
        // their unrounded intermediates.
        power_index: round2(attack_index + defense_index),
    }
}

fn pct(num: u32, den: u32) -> f64 {
    if den == 0 {
        return 0.0;
    }
    f64::from(num) / f64::from(den) * 100.0
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pct_guards_zero_denominator() {
        assert_eq!(pct(3, 0), 0.0);
        assert_eq!(pct(0, 0), 0.0);
        assert_eq!(pct(1, 4), 25.0);
    }

    #[test]
    fn round2_works() {
        assert_eq!(round2(33.333333), 33.33);
        assert_eq!(round2(0.125), 0.13);
    }
}
