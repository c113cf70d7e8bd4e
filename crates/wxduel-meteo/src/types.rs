use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::MeteoError;
use crate::models::ModelPair;

/// A numerical weather prediction model served by Open-Meteo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherModel {
    GemRegional,
    GemGlobal,
    EcmwfIfs025,
    GfsSeamless,
}

impl WeatherModel {
    /// Open-Meteo model identifier used in `models=` query parameters and
    /// in per-model daily keys.
    pub fn api_id(&self) -> &'static str {
        match self {
            Self::GemRegional => "gem_regional",
            Self::GemGlobal => "gem_global",
            Self::EcmwfIfs025 => "ecmwf_ifs025",
            Self::GfsSeamless => "gfs_seamless",
        }
    }

    /// Human-readable model name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::GemRegional => "GEM (Canada)",
            Self::GemGlobal => "GEM Global",
            Self::EcmwfIfs025 => "ECMWF (Euro)",
            Self::GfsSeamless => "GFS (USA)",
        }
    }
}

/// Daily forecast fields requested from Open-Meteo.
///
/// `api_name` values are an external contract: blended-series keys are
/// `<api_name>_<model_id>` and must be preserved exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DailyField {
    TempMax,
    TempMin,
    PrecipProbability,
    PrecipSum,
    SnowSum,
    WindMax,
    WindGust,
    WeatherCode,
}

impl DailyField {
    pub const ALL: [DailyField; 8] = [
        DailyField::TempMax,
        DailyField::TempMin,
        DailyField::PrecipProbability,
        DailyField::PrecipSum,
        DailyField::SnowSum,
        DailyField::WindMax,
        DailyField::WindGust,
        DailyField::WeatherCode,
    ];

    /// Open-Meteo daily variable name.
    pub fn api_name(&self) -> &'static str {
        match self {
            Self::TempMax => "temperature_2m_max",
            Self::TempMin => "temperature_2m_min",
            Self::PrecipProbability => "precipitation_probability_max",
            Self::PrecipSum => "precipitation_sum",
            Self::SnowSum => "snowfall_sum",
            Self::WindMax => "wind_speed_10m_max",
            Self::WindGust => "wind_gusts_10m_max",
            Self::WeatherCode => "weather_code",
        }
    }

    /// Key for a model-specific series (`temperature_2m_max_gem_regional`).
    pub fn model_key(&self, model: WeatherModel) -> String {
        format!("{}_{}", self.api_name(), model.api_id())
    }
}

/// Raw API response envelope. Only the daily block is of interest.
#[derive(Debug, Deserialize)]
pub(crate) struct MeteoResponse {
    pub daily: Option<DailyBlock>,
}

/// Raw daily block: a `time` array plus named value arrays.
#[derive(Debug, Deserialize)]
pub(crate) struct DailyBlock {
    pub time: Vec<String>,
    #[serde(flatten)]
    pub series: HashMap<String, Vec<Option<f64>>>,
}

/// Typed intermediate representation of a daily response.
///
/// Built immediately after deserialization so nothing downstream touches raw
/// optional JSON. Every series is padded or truncated to the length of the
/// date axis; a value array shorter than `time` is treated as null-padded.
#[derive(Debug, Clone)]
pub struct DailyPayload {
    dates: Vec<NaiveDate>,
    series: HashMap<String, Vec<Option<f64>>>,
}

impl DailyPayload {
    pub(crate) fn from_daily(block: DailyBlock) -> Result<Self, MeteoError> {
        let dates = block
            .time
            .iter()
            .map(|s| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .map_err(|e| MeteoError::Parse(format!("bad date {}: {}", s, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let len = dates.len();
        let series = block
            .series
            .into_iter()
            .map(|(key, mut values)| {
                values.resize(len, None);
                (key, values)
            })
            .collect();

        Ok(Self { dates, series })
    }

    /// Assemble a payload from already-normalized parts. Series are padded
    /// or truncated to the date axis.
    pub(crate) fn from_parts(
        dates: Vec<NaiveDate>,
        series: HashMap<String, Vec<Option<f64>>>,
    ) -> Self {
        let len = dates.len();
        let series = series
            .into_iter()
            .map(|(key, mut values)| {
                values.resize(len, None);
                (key, values)
            })
            .collect();
        Self { dates, series }
    }

    /// Number of days on the date axis.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Series stored under an exact key, if present.
    pub fn series_by_key(&self, key: &str) -> Option<&[Option<f64>]> {
        self.series.get(key).map(Vec::as_slice)
    }

    /// Model-specific series for a field (`<field>_<model>`).
    pub fn model_series(&self, field: DailyField, model: WeatherModel) -> Option<&[Option<f64>]> {
        self.series_by_key(&field.model_key(model))
    }

    /// Generic (non-namespaced) series for a field. Present when the API
    /// was queried for a single model.
    pub fn generic_series(&self, field: DailyField) -> Option<&[Option<f64>]> {
        self.series_by_key(field.api_name())
    }

    pub(crate) fn series_keys(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }
}

/// One model's aligned daily series inside a [`BlendedForecast`].
///
/// Invariant: every vector has the same length as the parent's date axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDaily {
    pub model: WeatherModel,
    pub temp_max: Vec<Option<f64>>,
    pub temp_min: Vec<Option<f64>>,
    pub precip_probability: Vec<Option<f64>>,
    pub precip_sum: Vec<Option<f64>>,
    pub snow_sum: Vec<Option<f64>>,
    pub wind_max: Vec<Option<f64>>,
    pub wind_gust: Vec<Option<f64>>,
    pub weather_code: Vec<Option<f64>>,
}

impl ModelDaily {
    fn extract(payload: &DailyPayload, model: WeatherModel, len: usize) -> Self {
        let take = |field: DailyField| -> Vec<Option<f64>> {
            let series = payload
                .model_series(field, model)
                .or_else(|| payload.generic_series(field))
                .unwrap_or(&[]);
            (0..len).map(|i| series.get(i).copied().flatten()).collect()
        };

        Self {
            model,
            temp_max: take(DailyField::TempMax),
            temp_min: take(DailyField::TempMin),
            precip_probability: take(DailyField::PrecipProbability),
            precip_sum: take(DailyField::PrecipSum),
            snow_sum: take(DailyField::SnowSum),
            wind_max: take(DailyField::WindMax),
            wind_gust: take(DailyField::WindGust),
            weather_code: take(DailyField::WeatherCode),
        }
    }

    /// Series for a field, for callers iterating over all fields.
    pub fn field(&self, field: DailyField) -> &[Option<f64>] {
        match field {
            DailyField::TempMax => &self.temp_max,
            DailyField::TempMin => &self.temp_min,
            DailyField::PrecipProbability => &self.precip_probability,
            DailyField::PrecipSum => &self.precip_sum,
            DailyField::SnowSum => &self.snow_sum,
            DailyField::WindMax => &self.wind_max,
            DailyField::WindGust => &self.wind_gust,
            DailyField::WeatherCode => &self.weather_code,
        }
    }
}

/// Two models' forecasts on a shared date axis, capped to the horizon.
#[derive(Debug, Clone)]
pub struct BlendedForecast {
    pub dates: Vec<NaiveDate>,
    pub model_a: ModelDaily,
    pub model_b: ModelDaily,
}

impl BlendedForecast {
    /// Extract both models' series from a payload, truncated to the shorter
    /// of the payload's date axis and the configured horizon.
    pub fn from_payload(payload: &DailyPayload, pair: &ModelPair, horizon: usize) -> Self {
        let len = payload.len().min(horizon);
        Self {
            dates: payload.dates()[..len].to_vec(),
            model_a: ModelDaily::extract(payload, pair.primary, len),
            model_b: ModelDaily::extract(payload, pair.secondary, len),
        }
    }

    /// Number of forecast days actually covered.
    pub fn horizon(&self) -> usize {
        self.dates.len()
    }
}

/// Observed weather for a single past date, from the archive API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservedDay {
    pub date: NaiveDate,
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
    pub precip_sum: Option<f64>,
}
