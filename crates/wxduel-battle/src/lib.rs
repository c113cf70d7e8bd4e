//! Forecast verification and model battles for wxduel
//!
//! Archives each day's forecast, compares archived predictions against
//! observed weather once the target dates have passed, and aggregates the
//! resulting battles into scores and accuracy trends.

pub mod archive;
pub mod evaluate;
pub mod record;
pub mod runner;
pub mod score;
pub mod trends;

pub use archive::ForecastArchive;
pub use evaluate::{
    absolute_error, evaluate_day, winner, Battle, FieldErrors, FieldWinners, Thresholds, Winner,
};
pub use record::{ForecastDay, ForecastRecord, ModelForecast};
pub use runner::{BattleReport, BattleRunner};
pub use score::{ScoreState, Scoreboard};
pub use trends::{summarize, FieldAverages, TrendSummary};
