//! Persisted forecast snapshots.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use wxduel_meteo::{BlendedForecast, ModelDaily};

/// One day of a model's prediction, reduced to the verified fields.
///
/// `precip` is the forecast precipitation probability in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
    pub precip: Option<f64>,
}

/// One model's full prediction inside a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelForecast {
    pub name: String,
    pub days: Vec<ForecastDay>,
}

/// A forecast snapshot saved on the day it was fetched, verified later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub saved_date: NaiveDate,
    pub latitude: f64,
    pub longitude: f64,
    pub model_a: ModelForecast,
    pub model_b: ModelForecast,
}

impl ForecastRecord {
    /// Reduce a blended forecast to the snapshot kept for verification.
    pub fn from_blended(
        forecast: &BlendedForecast,
        saved_date: NaiveDate,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            saved_date,
            latitude,
            longitude,
            model_a: Self::model_forecast(&forecast.dates, &forecast.model_a),
            model_b: Self::model_forecast(&forecast.dates, &forecast.model_b),
        }
    }

    fn model_forecast(dates: &[NaiveDate], model: &ModelDaily) -> ModelForecast {
        let days = dates
            .iter()
            .enumerate()
            .map(|(i, date)| ForecastDay {
                date: *date,
                temp_max: model.temp_max.get(i).copied().flatten(),
                temp_min: model.temp_min.get(i).copied().flatten(),
                precip: model.precip_probability.get(i).copied().flatten(),
            })
            .collect();

        ModelForecast {
            name: model.model.display_name().to_string(),
            days,
        }
    }
}
