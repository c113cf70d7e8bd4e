//! Persistent running scoreboard, advanced at most once per target date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use wxduel_core::error::StorageError;
use wxduel_core::storage::KeyValueStore;

use crate::evaluate::Winner;

const SCOREBOARD_KEY: &str = "scoreboard";
const LAST_SCORED_KEY: &str = "last_scored_date";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub wins_a: u32,
    pub wins_b: u32,
    /// Date the running tally started.
    pub start: NaiveDate,
}

pub struct Scoreboard {
    store: Arc<dyn KeyValueStore>,
}

impl Scoreboard {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current tally. Missing or corrupt state resets to zero with the
    /// tally starting today.
    pub fn state(&self, today: NaiveDate) -> ScoreState {
        self.store.get_json(SCOREBOARD_KEY).unwrap_or(ScoreState {
            wins_a: 0,
            wins_b: 0,
            start: today,
        })
    }

    /// The most recent target date already counted, if any.
    pub fn last_scored_date(&self) -> Option<NaiveDate> {
        self.store
            .get(LAST_SCORED_KEY)
            .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
    }

    /// Count a battle outcome toward the tally.
    ///
    /// A date is only ever counted once, so re-running on the same day is
    /// a no-op, and ties advance the guard without changing the score.
    pub fn record_win(
        &self,
        winner: Winner,
        target_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<ScoreState, StorageError> {
        let mut state = self.state(today);

        if self.last_scored_date() == Some(target_date) {
            debug!(date = %target_date, "already scored, leaving tally unchanged");
            return Ok(state);
        }

        match winner {
            Winner::ModelA => state.wins_a += 1,
            Winner::ModelB => state.wins_b += 1,
            Winner::Tie => {}
        }

        self.store.set_json(SCOREBOARD_KEY, &state)?;
        self.store
            .set(LAST_SCORED_KEY, &target_date.format("%Y-%m-%d").to_string())?;
        Ok(state)
    }

    pub fn reset(&self) {
        self.store.remove(SCOREBOARD_KEY);
        self.store.remove(LAST_SCORED_KEY);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use wxduel_core::storage::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scoreboard() -> Scoreboard {
        Scoreboard::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_fresh_state_starts_today() {
        let board = scoreboard();
        let today = date(2025, 1, 10);
        let state = board.state(today);
        assert_eq!(state.wins_a, 0);
        assert_eq!(state.wins_b, 0);
        assert_eq!(state.start, today);
        assert!(board.last_scored_date().is_none());
    }

    #[test]
    fn test_record_win_increments_once_per_date() {
        let board = scoreboard();
        let today = date(2025, 1, 11);
        let target = date(2025, 1, 10);

        let state = board.record_win(Winner::ModelA, target, today).unwrap();
        assert_eq!(state.wins_a, 1);

        // Same target date again, e.g. the app ran twice today.
        let state = board.record_win(Winner::ModelA, target, today).unwrap();
        assert_eq!(state.wins_a, 1);
        assert_eq!(board.last_scored_date(), Some(target));
    }

    #[test]
    fn test_record_win_new_date_counts() {
        let board = scoreboard();
        let today = date(2025, 1, 12);

        board
            .record_win(Winner::ModelA, date(2025, 1, 10), today)
            .unwrap();
        let state = board
            .record_win(Winner::ModelB, date(2025, 1, 11), today)
            .unwrap();

        assert_eq!(state.wins_a, 1);
        assert_eq!(state.wins_b, 1);
        assert_eq!(board.last_scored_date(), Some(date(2025, 1, 11)));
    }

    #[test]
    fn test_tie_advances_guard_without_scoring() {
        let board = scoreboard();
        let today = date(2025, 1, 11);
        let target = date(2025, 1, 10);

        let state = board.record_win(Winner::Tie, target, today).unwrap();
        assert_eq!(state.wins_a, 0);
        assert_eq!(state.wins_b, 0);
        assert_eq!(board.last_scored_date(), Some(target));

        // A later non-tie result for the same date stays unscored.
        let state = board.record_win(Winner::ModelA, target, today).unwrap();
        assert_eq!(state.wins_a, 0);
    }

    #[test]
    fn test_start_date_persists_across_loads() {
        let board = scoreboard();
        let start = date(2025, 1, 11);

        board
            .record_win(Winner::ModelA, date(2025, 1, 10), start)
            .unwrap();

        let later = board.state(date(2025, 2, 1));
        assert_eq!(later.start, start);
        assert_eq!(later.wins_a, 1);
    }

    #[test]
    fn test_corrupt_state_resets() {
        let store = Arc::new(MemoryStore::new());
        store.set(SCOREBOARD_KEY, "garbage").unwrap();

        let board = Scoreboard::new(store);
        let state = board.state(date(2025, 1, 10));
        assert_eq!(state.wins_a, 0);
        assert_eq!(state.start, date(2025, 1, 10));
    }

    #[test]
    fn test_reset() {
        let board = scoreboard();
        board
            .record_win(Winner::ModelA, date(2025, 1, 10), date(2025, 1, 11))
            .unwrap();

        board.reset();
        assert_eq!(board.state(date(2025, 1, 12)).wins_a, 0);
        assert!(board.last_scored_date().is_none());
    }
}
