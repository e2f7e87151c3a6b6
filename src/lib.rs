//! Statistics aggregation and identity reconciliation for a sports club:
//! box-score deltas roll up into cumulative player ledgers, match results
//! replay into league standings, and free-form spreadsheet exports are
//! reconciled against inconsistently-named players and teams.

pub mod identity;
pub mod ledger;
pub mod persist;
pub mod sheet;
pub mod standings;
pub mod stats;
pub mod store;
