//! Head-to-head scoring of an archived forecast against observations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use wxduel_meteo::ObservedDay;

use crate::record::{ForecastDay, ForecastRecord};

/// Observed precipitation above this is treated as "it rained" when the
/// forecast spoke in probabilities.
pub const RAIN_THRESHOLD_MM: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    ModelA,
    ModelB,
    Tie,
}

/// Error margins below which a field is called a tie rather than a win.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Probability percentage points.
    pub precipitation: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            temperature: 0.5,
            precipitation: 5.0,
        }
    }
}

impl Thresholds {
    pub fn new(temperature: f64, precipitation: f64) -> Self {
        Self {
            temperature,
            precipitation,
        }
    }
}

/// Absolute error, or None when either side is missing. A model that
/// forecast nothing is scored as "no data", not as infinitely wrong.
pub fn absolute_error(predicted: Option<f64>, observed: Option<f64>) -> Option<f64> {
    match (predicted, observed) {
        (Some(p), Some(o)) => Some((p - o).abs()),
        _ => None,
    }
}

/// Decide a field. Missing errors lose to present ones; two missing
/// errors tie; margins inside the threshold tie.
pub fn winner(error_a: Option<f64>, error_b: Option<f64>, threshold: f64) -> Winner {
    match (error_a, error_b) {
        (None, None) => Winner::Tie,
        (Some(_), None) => Winner::ModelA,
        (None, Some(_)) => Winner::ModelB,
        (Some(a), Some(b)) => {
            if (a - b).abs() < threshold {
                Winner::Tie
            } else if a < b {
                Winner::ModelA
            } else if b < a {
                Winner::ModelB
            } else {
                Winner::Tie
            }
        }
    }
}

/// Map observed precipitation in mm onto the probability scale the
/// forecasts use: rain means 100%, no rain means 0%.
pub fn precip_probability_equivalent(precip_mm: Option<f64>) -> Option<f64> {
    precip_mm.map(|mm| if mm > RAIN_THRESHOLD_MM { 100.0 } else { 0.0 })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldErrors {
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
    pub precip: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldWinners {
    pub temp_max: Winner,
    pub temp_min: Winner,
    pub precip: Winner,
}

/// One verified forecast day: what both models said, what actually
/// happened, and who was closer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Battle {
    pub target_date: NaiveDate,
    pub issued_date: NaiveDate,
    pub lead_days: i64,
    pub model_a: String,
    pub model_b: String,
    pub predicted_a: ForecastDay,
    pub predicted_b: ForecastDay,
    pub observed: ObservedDay,
    pub errors_a: FieldErrors,
    pub errors_b: FieldErrors,
    pub winners: FieldWinners,
    pub overall: Winner,
}

fn field_errors(predicted: &ForecastDay, observed: &ObservedDay) -> FieldErrors {
    FieldErrors {
        temp_max: absolute_error(predicted.temp_max, observed.temp_max),
        temp_min: absolute_error(predicted.temp_min, observed.temp_min),
        precip: absolute_error(
            predicted.precip,
            precip_probability_equivalent(observed.precip_sum),
        ),
    }
}

/// Best-of-three across the scored fields. Ties count for nobody, so
/// a single won field decides an otherwise tied battle.
fn overall_winner(winners: &FieldWinners) -> Winner {
    let mut a = 0;
    let mut b = 0;
    for field in [winners.temp_max, winners.temp_min, winners.precip] {
        match field {
            Winner::ModelA => a += 1,
            Winner::ModelB => b += 1,
            Winner::Tie => {}
        }
    }
    if a > b {
        Winner::ModelA
    } else if b > a {
        Winner::ModelB
    } else {
        Winner::Tie
    }
}

/// Score one day of an archived record against observations. Returns
/// None when the day index is out of range for either model.
pub fn evaluate_day(
    record: &ForecastRecord,
    day_index: usize,
    observed: &ObservedDay,
    thresholds: &Thresholds,
) -> Option<Battle> {
    let predicted_a = record.model_a.days.get(day_index)?.clone();
    let predicted_b = record.model_b.days.get(day_index)?.clone();

    let errors_a = field_errors(&predicted_a, observed);
    let errors_b = field_errors(&predicted_b, observed);

    let winners = FieldWinners {
        temp_max: winner(errors_a.temp_max, errors_b.temp_max, thresholds.temperature),
        temp_min: winner(errors_a.temp_min, errors_b.temp_min, thresholds.temperature),
        precip: winner(errors_a.precip, errors_b.precip, thresholds.precipitation),
    };
    let overall = overall_winner(&winners);

    let target_date = predicted_a.date;
    Some(Battle {
        target_date,
        issued_date: record.saved_date,
        lead_days: (target_date - record.saved_date).num_days(),
        model_a: record.model_a.name.clone(),
        model_b: record.model_b.name.clone(),
        predicted_a,
        predicted_b,
        observed: observed.clone(),
        errors_a,
        errors_b,
        winners,
        overall,
    })
}
