//! Aggregate statistics over a set of evaluated battles.

use crate::evaluate::{Battle, FieldErrors, Winner};

/// Per-field mean absolute error for one model. Each field averages only
/// the battles where that field produced an error, so one model's gaps
/// don't drag the other's averages.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldAverages {
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
    pub precip: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrendSummary {
    pub total_battles: usize,
    pub wins_a: usize,
    pub wins_b: usize,
    pub ties: usize,
    pub avg_error_a: FieldAverages,
    pub avg_error_b: FieldAverages,
}

struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn new() -> Self {
        Self { sum: 0.0, count: 0 }
    }

    fn add(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

fn averages(errors: impl Iterator<Item = FieldErrors>) -> FieldAverages {
    let mut temp_max = Accumulator::new();
    let mut temp_min = Accumulator::new();
    let mut precip = Accumulator::new();

    for e in errors {
        temp_max.add(e.temp_max);
        temp_min.add(e.temp_min);
        precip.add(e.precip);
    }

    FieldAverages {
        temp_max: temp_max.mean(),
        temp_min: temp_min.mean(),
        precip: precip.mean(),
    }
}

/// Summarize win counts and average errors across battles.
pub fn summarize(battles: &[Battle]) -> TrendSummary {
    let mut summary = TrendSummary {
        total_battles: battles.len(),
        ..TrendSummary::default()
    };

    for battle in battles {
        match battle.overall {
            Winner::ModelA => summary.wins_a += 1,
            Winner::ModelB => summary.wins_b += 1,
            Winner::Tie => summary.ties += 1,
        }
    }

    summary.avg_error_a = averages(battles.iter().map(|b| b.errors_a));
    summary.avg_error_b = averages(battles.iter().map(|b| b.errors_b));
    summary
}
