//! Forecast blending.
//!
//! Combines a regional payload (short horizon, both battle models) with a
//! filler payload (longer horizon, one model) into a payload covering the
//! full horizon. The non-regional model's series ride along unchanged; only
//! the regional model's fields are gap-filled.

use std::collections::HashMap;

use crate::align::align_series;
use crate::types::{DailyField, DailyPayload, WeatherModel};

/// Blend a regional payload with a longer-horizon filler payload.
///
/// The result's date axis comes from the filler, capped at `horizon`. Each
/// of the regional model's daily fields is aligned against the filler's
/// model-specific series, then its generic series. Neither input is
/// modified.
pub fn blend_payloads(
    regional: &DailyPayload,
    filler: &DailyPayload,
    regional_model: WeatherModel,
    filler_model: WeatherModel,
    horizon: usize,
) -> DailyPayload {
    let len = filler.len().min(horizon);
    let dates = filler.dates()[..len].to_vec();

    // Carry every series of the regional payload over so the other model's
    // keys survive; from_parts pads or truncates them to the new axis.
    let mut series: HashMap<String, Vec<Option<f64>>> = regional
        .series_keys()
        .filter_map(|key| {
            regional
                .series_by_key(key)
                .map(|values| (key.to_string(), values.to_vec()))
        })
        .collect();

    for field in DailyField::ALL {
        let key = field.model_key(regional_model);
        let primary = regional.series_by_key(&key).unwrap_or(&[]);
        let aligned = align_series(
            primary,
            filler.model_series(field, filler_model).unwrap_or(&[]),
            filler.generic_series(field).unwrap_or(&[]),
            filler.len(),
            horizon,
        );
        series.insert(key, aligned);
    }

    DailyPayload::from_parts(dates, series)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::types::{DailyBlock, WeatherModel};

    fn payload(time: &[&str], series: &[(&str, Vec<Option<f64>>)]) -> DailyPayload {
        DailyPayload::from_daily(DailyBlock {
            time: time.iter().map(|s| s.to_string()).collect(),
            series: series
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        })
        .unwrap()
    }

    #[test]
    fn test_blend_extends_regional_horizon() {
        let regional = payload(
            &["2025-01-01", "2025-01-02", "2025-01-03"],
            &[
                (
                    "temperature_2m_max_gem_regional",
                    vec![Some(5.0), None, None],
                ),
                (
                    "temperature_2m_max_ecmwf_ifs025",
                    vec![Some(4.5), Some(5.5), Some(6.5)],
                ),
            ],
        );
        let filler = payload(
            &["2025-01-01", "2025-01-02", "2025-01-03", "2025-01-04"],
            &[(
                "temperature_2m_max_gem_global",
                vec![Some(5.2), Some(6.0), Some(7.0), Some(8.0)],
            )],
        );

        let blended = blend_payloads(
            &regional,
            &filler,
            WeatherModel::GemRegional,
            WeatherModel::GemGlobal,
            7,
        );

        assert_eq!(blended.len(), 4);
        // Regional value kept on day 0, filler fills the rest.
        assert_eq!(
            blended
                .model_series(DailyField::TempMax, WeatherModel::GemRegional)
                .unwrap(),
            &[Some(5.0), Some(6.0), Some(7.0), Some(8.0)]
        );
        // The other model's series survives, padded to the new axis.
        assert_eq!(
            blended
                .model_series(DailyField::TempMax, WeatherModel::EcmwfIfs025)
                .unwrap(),
            &[Some(4.5), Some(5.5), Some(6.5), None]
        );
    }

    #[test]
    fn test_blend_uses_generic_filler_keys() {
        let regional = payload(
            &["2025-01-01"],
            &[("temperature_2m_max_gem_regional", vec![None])],
        );
        // Single-model responses come back with non-namespaced keys.
        let filler = payload(
            &["2025-01-01", "2025-01-02"],
            &[("temperature_2m_max", vec![Some(3.0), Some(4.0)])],
        );

        let blended = blend_payloads(
            &regional,
            &filler,
            WeatherModel::GemRegional,
            WeatherModel::GemGlobal,
            7,
        );

        assert_eq!(
            blended
                .model_series(DailyField::TempMax, WeatherModel::GemRegional)
                .unwrap(),
            &[Some(3.0), Some(4.0)]
        );
    }

    #[test]
    fn test_blend_caps_at_horizon() {
        let regional = payload(
            &["2025-01-01"],
            &[("temperature_2m_max_gem_regional", vec![Some(1.0)])],
        );
        let days: Vec<String> = (1..=10).map(|d| format!("2025-01-{:02}", d)).collect();
        let day_refs: Vec<&str> = days.iter().map(String::as_str).collect();
        let filler = payload(
            &day_refs,
            &[("temperature_2m_max_gem_global", vec![Some(2.0); 10])],
        );

        let blended = blend_payloads(
            &regional,
            &filler,
            WeatherModel::GemRegional,
            WeatherModel::GemGlobal,
            7,
        );
        assert_eq!(blended.len(), 7);
    }

    #[test]
    fn test_blend_missing_filler_field_stays_null() {
        let regional = payload(
            &["2025-01-01"],
            &[("snowfall_sum_gem_regional", vec![None])],
        );
        let filler = payload(&["2025-01-01", "2025-01-02"], &[]);

        let blended = blend_payloads(
            &regional,
            &filler,
            WeatherModel::GemRegional,
            WeatherModel::GemGlobal,
            7,
        );
        assert_eq!(
            blended
                .model_series(DailyField::SnowSum, WeatherModel::GemRegional)
                .unwrap(),
            &[None, None]
        );
    }
}
