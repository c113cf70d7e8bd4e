//! Climate context: annual mean temperatures and warming anomalies.
//!
//! Works on the daily mean-temperature history returned by
//! [`MeteoClient::fetch_temperature_history`](crate::MeteoClient::fetch_temperature_history).

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Mean temperature for one calendar year.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualMean {
    pub year: i32,
    pub mean: f64,
}

/// Compute per-year mean temperatures from daily values.
///
/// Days with missing values are skipped; years with no data at all are
/// omitted. The result is sorted by year.
pub fn annual_means(dates: &[NaiveDate], temps: &[Option<f64>]) -> Vec<AnnualMean> {
    let mut by_year: BTreeMap<i32, (f64, u32)> = BTreeMap::new();

    for (date, temp) in dates.iter().zip(temps.iter()) {
        if let Some(t) = temp {
            let entry = by_year.entry(date.year()).or_insert((0.0, 0));
            entry.0 += t;
            entry.1 += 1;
        }
    }

    by_year
        .into_iter()
        .map(|(year, (sum, count))| AnnualMean {
            year,
            mean: sum / f64::from(count),
        })
        .collect()
}

/// Mean over a reference period, or `None` if no year falls inside it.
pub fn baseline(means: &[AnnualMean], start_year: i32, end_year: i32) -> Option<f64> {
    let reference: Vec<f64> = means
        .iter()
        .filter(|m| m.year >= start_year && m.year <= end_year)
        .map(|m| m.mean)
        .collect();

    if reference.is_empty() {
        return None;
    }
    Some(reference.iter().sum::<f64>() / reference.len() as f64)
}

/// Per-year temperature deltas against a baseline.
pub fn anomalies(means: &[AnnualMean], baseline: f64) -> Vec<(i32, f64)> {
    means.iter().map(|m| (m.year, m.mean - baseline)).collect()
}
