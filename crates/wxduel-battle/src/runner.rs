//! Drives evaluation of every verifiable archived forecast day.

use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, instrument, warn};

use wxduel_core::cache::ExpiringCache;
use wxduel_core::clock::Clock;
use wxduel_meteo::{MeteoClient, ObservedDay};

use crate::archive::ForecastArchive;
use crate::evaluate::{evaluate_day, Battle, Thresholds};

const OBSERVATION_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// All battles produced by a run, plus whether the run was cut short by
/// API rate limiting. A rate-limited report still carries the battles
/// evaluated before the limit hit.
#[derive(Debug, Default)]
pub struct BattleReport {
    pub battles: Vec<Battle>,
    pub rate_limited: bool,
}

pub struct BattleRunner<'a> {
    client: &'a MeteoClient,
    archive: &'a ForecastArchive,
    clock: &'a dyn Clock,
    thresholds: Thresholds,
    observations: ExpiringCache<String, ObservedDay>,
}

impl<'a> BattleRunner<'a> {
    pub fn new(
        client: &'a MeteoClient,
        archive: &'a ForecastArchive,
        clock: &'a dyn Clock,
        thresholds: Thresholds,
    ) -> Self {
        Self {
            client,
            archive,
            clock,
            thresholds,
            observations: ExpiringCache::new(OBSERVATION_TTL),
        }
    }

    /// Evaluate every verifiable day of every archived record.
    ///
    /// Observation fetch failures skip the affected day; a rate-limit
    /// response aborts the remaining fetches and flags the report.
    /// Battles come back sorted by target date, most recent first.
    #[instrument(skip(self))]
    pub async fn evaluate_all(&self) -> BattleReport {
        let today = self.clock.today();
        let mut report = BattleReport::default();

        'records: for record in self.archive.history() {
            let indices = ForecastArchive::verifiable_days(&record, today);
            if indices.is_empty() {
                continue;
            }
            debug!(
                saved = %record.saved_date,
                days = indices.len(),
                "evaluating archived forecast"
            );

            for index in indices {
                let Some(target) = record.model_a.days.get(index).map(|d| d.date) else {
                    continue;
                };

                let observed = match self
                    .observed(record.latitude, record.longitude, target)
                    .await
                {
                    Ok(observed) => observed,
                    Err(e) if e.is_rate_limited() => {
                        warn!("observation fetch rate limited, stopping early");
                        report.rate_limited = true;
                        break 'records;
                    }
                    Err(e) => {
                        warn!(date = %target, error = %e, "skipping day, observation unavailable");
                        continue;
                    }
                };

                if let Some(battle) = evaluate_day(&record, index, &observed, &self.thresholds) {
                    report.battles.push(battle);
                }
            }
        }

        report
            .battles
            .sort_by(|a, b| b.target_date.cmp(&a.target_date));
        report
    }

    async fn observed(
        &self,
        lat: f64,
        lon: f64,
        date: NaiveDate,
    ) -> Result<ObservedDay, wxduel_meteo::MeteoError> {
        let key = format!("{:.3}:{:.3}:{}", lat, lon, date);
        if let Some(cached) = self.observations.get(&key) {
            return Ok(cached);
        }

        let observed = self.client.fetch_observed(lat, lon, date).await?;
        self.observations.insert(key, observed.clone());
        Ok(observed)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::evaluate::Winner;
    use crate::record::{ForecastDay, ForecastRecord, ModelForecast};
    use chrono::Days;
    use std::sync::Arc;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use wxduel_core::clock::FixedClock;
    use wxduel_core::config::ForecastConfig;
    use wxduel_core::storage::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn client_for(server: &MockServer) -> MeteoClient {
        let config = ForecastConfig {
            forecast_url: server.uri(),
            archive_url: server.uri(),
            ..ForecastConfig::default()
        };
        MeteoClient::new(&config).unwrap()
    }

    fn record_saved(saved: NaiveDate) -> ForecastRecord {
        let days = |offsets: &[(f64, f64, f64)]| -> Vec<ForecastDay> {
            offsets
                .iter()
                .enumerate()
                .map(|(i, (tmax, tmin, precip))| ForecastDay {
                    date: saved + Days::new(i as u64),
                    temp_max: Some(*tmax),
                    temp_min: Some(*tmin),
                    precip: Some(*precip),
                })
                .collect()
        };

        ForecastRecord {
            saved_date: saved,
            latitude: 45.42,
            longitude: -75.69,
            model_a: ModelForecast {
                name: "GEM (Canada)".into(),
                days: days(&[(10.0, -2.0, 10.0), (11.0, -1.0, 20.0)]),
            },
            model_b: ModelForecast {
                name: "ECMWF (Euro)".into(),
                days: days(&[(14.0, -6.0, 80.0), (15.0, -5.0, 90.0)]),
            },
        }
    }

    fn observed_body(tmax: f64, tmin: f64, precip: f64) -> serde_json::Value {
        serde_json::json!({
            "daily": {
                "time": ["2025-01-10"],
                "temperature_2m_max": [tmax],
                "temperature_2m_min": [tmin],
                "precipitation_sum": [precip]
            }
        })
    }

    #[tokio::test]
    async fn test_evaluate_all_produces_battles() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(observed_body(10.5, -2.5, 0.0)))
            .mount(&server)
            .await;

        let saved = date(2025, 1, 10);
        let store = Arc::new(MemoryStore::new());
        let archive = ForecastArchive::new(store, 31);
        archive.save(record_saved(saved)).unwrap();

        let client = client_for(&server);
        let clock = FixedClock::on_date(saved + Days::new(2));
        let runner = BattleRunner::new(&client, &archive, &clock, Thresholds::default());

        let report = runner.evaluate_all().await;
        assert!(!report.rate_limited);
        assert_eq!(report.battles.len(), 2);
        // Sorted by target date, most recent first.
        assert_eq!(report.battles[0].target_date, saved + Days::new(1));
        assert_eq!(report.battles[1].target_date, saved);
        assert_eq!(report.battles[1].overall, Winner::ModelA);
    }

    #[tokio::test]
    async fn test_evaluate_all_nothing_verifiable_same_day() {
        let server = MockServer::start().await;
        let saved = date(2025, 1, 10);
        let store = Arc::new(MemoryStore::new());
        let archive = ForecastArchive::new(store, 31);
        archive.save(record_saved(saved)).unwrap();

        let client = client_for(&server);
        let clock = FixedClock::on_date(saved);
        let runner = BattleRunner::new(&client, &archive, &clock, Thresholds::default());

        let report = runner.evaluate_all().await;
        assert!(report.battles.is_empty());
        assert!(!report.rate_limited);
        // No observation requests were made.
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_evaluate_all_rate_limit_stops_early() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let saved = date(2025, 1, 10);
        let store = Arc::new(MemoryStore::new());
        let archive = ForecastArchive::new(store, 31);
        archive.save(record_saved(saved)).unwrap();
        archive.save(record_saved(saved - Days::new(1))).unwrap();

        let client = client_for(&server);
        let clock = FixedClock::on_date(saved + Days::new(2));
        let runner = BattleRunner::new(&client, &archive, &clock, Thresholds::default());

        let report = runner.evaluate_all().await;
        assert!(report.rate_limited);
        assert!(report.battles.is_empty());
        // First 429 short-circuits, later records never fetched.
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_evaluate_all_skips_failed_day() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("start_date", "2025-01-10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(observed_body(10.5, -2.5, 0.0)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("start_date", "2025-01-11"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let saved = date(2025, 1, 10);
        let store = Arc::new(MemoryStore::new());
        let archive = ForecastArchive::new(store, 31);
        archive.save(record_saved(saved)).unwrap();

        let client = client_for(&server);
        let clock = FixedClock::on_date(saved + Days::new(2));
        let runner = BattleRunner::new(&client, &archive, &clock, Thresholds::default());

        let report = runner.evaluate_all().await;
        assert!(!report.rate_limited);
        assert_eq!(report.battles.len(), 1);
        assert_eq!(report.battles[0].target_date, saved);
    }

    #[tokio::test]
    async fn test_observations_cached_across_records() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(observed_body(10.5, -2.5, 0.0)))
            .mount(&server)
            .await;

        let saved = date(2025, 1, 10);
        let store = Arc::new(MemoryStore::new());
        let archive = ForecastArchive::new(store, 31);
        // Two records whose forecasts overlap on 2025-01-10 and 2025-01-11.
        archive.save(record_saved(saved)).unwrap();
        archive.save(record_saved(saved - Days::new(1))).unwrap();

        let client = client_for(&server);
        let clock = FixedClock::on_date(saved + Days::new(2));
        let runner = BattleRunner::new(&client, &archive, &clock, Thresholds::default());

        let report = runner.evaluate_all().await;
        assert_eq!(report.battles.len(), 4);
        // 2025-01-09..=2025-01-11 is three distinct target dates.
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }
}
