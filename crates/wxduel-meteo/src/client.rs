//! Open-Meteo API client.

use chrono::NaiveDate;
use std::time::Duration;
use tracing::instrument;

use wxduel_core::config::ForecastConfig;

use crate::blend::blend_payloads;
use crate::error::MeteoError;
use crate::models::ModelPair;
use crate::types::{BlendedForecast, DailyField, DailyPayload, MeteoResponse, ObservedDay};

const OBSERVED_FIELDS: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum";

pub struct MeteoClient {
    client: reqwest::Client,
    forecast_base: String,
    archive_base: String,
    forecast_timeout: Duration,
    archive_timeout: Duration,
    horizon: usize,
}

impl MeteoClient {
    pub fn new(config: &ForecastConfig) -> Result<Self, MeteoError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            forecast_base: config.forecast_url.clone(),
            archive_base: config.archive_url.clone(),
            forecast_timeout: Duration::from_secs(config.forecast_timeout_secs),
            archive_timeout: Duration::from_secs(config.archive_timeout_secs),
            horizon: config.horizon_days,
        })
    }

    #[cfg(test)]
    pub fn new_with_base_urls(forecast_base: &str, archive_base: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            forecast_base: forecast_base.to_string(),
            archive_base: archive_base.to_string(),
            forecast_timeout: Duration::from_secs(5),
            archive_timeout: Duration::from_secs(5),
            horizon: 7,
        }
    }

    fn daily_fields_param() -> String {
        DailyField::ALL
            .iter()
            .map(DailyField::api_name)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Fetch the blended forecast for both models of a pair.
    ///
    /// When the primary is a short-range regional model, each model in the
    /// fill chain is tried in order to extend the horizon; a filler failure
    /// degrades to the next filler and finally to the unblended regional
    /// payload. A failure of the primary fetch itself is an error.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_forecast(
        &self,
        lat: f64,
        lon: f64,
        pair: &ModelPair,
    ) -> Result<BlendedForecast, MeteoError> {
        let models = format!("{},{}", pair.primary.api_id(), pair.secondary.api_id());
        let mut payload = self.fetch_daily_models(lat, lon, &models).await?;

        for filler_model in pair.horizon_fill_chain() {
            match self.fetch_daily_models(lat, lon, filler_model.api_id()).await {
                Ok(filler) => {
                    payload =
                        blend_payloads(&payload, &filler, pair.primary, filler_model, self.horizon);
                    break;
                }
                Err(e) => {
                    tracing::warn!(
                        "Horizon fill with {} failed: {}",
                        filler_model.api_id(),
                        e
                    );
                }
            }
        }

        Ok(BlendedForecast::from_payload(&payload, pair, self.horizon))
    }

    /// Fetch observed weather for a single past date.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_observed(
        &self,
        lat: f64,
        lon: f64,
        date: NaiveDate,
    ) -> Result<ObservedDay, MeteoError> {
        let day = date.format("%Y-%m-%d").to_string();
        let response = self
            .client
            .get(&self.archive_base)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("start_date", day.clone()),
                ("end_date", day),
                ("daily", OBSERVED_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .timeout(self.archive_timeout)
            .send()
            .await?;

        let payload = self.payload_from(response).await?;
        let first = |field: DailyField| {
            payload
                .generic_series(field)
                .and_then(|s| s.first().copied())
                .flatten()
        };

        Ok(ObservedDay {
            date,
            temp_max: first(DailyField::TempMax),
            temp_min: first(DailyField::TempMin),
            precip_sum: first(DailyField::PrecipSum),
        })
    }

    /// Fetch daily mean temperatures over a range of years, for climate
    /// context. Large but cacheable; uses the longer archive timeout.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_temperature_history(
        &self,
        lat: f64,
        lon: f64,
        start_year: i32,
        end_year: i32,
    ) -> Result<DailyPayload, MeteoError> {
        let response = self
            .client
            .get(&self.archive_base)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("start_date", format!("{}-01-01", start_year)),
                ("end_date", format!("{}-12-31", end_year)),
                ("daily", "temperature_2m_mean".to_string()),
                ("timezone", "auto".to_string()),
            ])
            .timeout(self.archive_timeout)
            .send()
            .await?;

        self.payload_from(response).await
    }

    async fn fetch_daily_models(
        &self,
        lat: f64,
        lon: f64,
        models: &str,
    ) -> Result<DailyPayload, MeteoError> {
        let response = self
            .client
            .get(&self.forecast_base)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("daily", Self::daily_fields_param()),
                ("models", models.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .timeout(self.forecast_timeout)
            .send()
            .await?;

        self.payload_from(response).await
    }

    async fn payload_from(&self, response: reqwest::Response) -> Result<DailyPayload, MeteoError> {
        let resp: MeteoResponse = self.handle_response(response).await?;
        let daily = resp.daily.ok_or(MeteoError::MissingDaily)?;
        DailyPayload::from_daily(daily)
    }

    /// Helper to handle API responses and errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, MeteoError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| MeteoError::Parse(format!("JSON parse error: {}", e)))
        } else if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            Err(MeteoError::RateLimited(retry_after))
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(MeteoError::Api(format!("{}: {}", status, text)))
        }
    }
}
