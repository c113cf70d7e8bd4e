//! Open-Meteo client and forecast pipeline for wxduel
//!
//! Fetches daily forecasts for a pair of weather models, blends a
//! short-horizon regional model with a global model into a full-horizon
//! series, and retrieves observed weather for verification.

pub mod align;
pub mod blend;
pub mod client;
pub mod climate;
pub mod error;
pub mod models;
pub mod types;

pub use align::{align, align_series, FORECAST_HORIZON_DAYS};
pub use blend::blend_payloads;
pub use client::MeteoClient;
pub use error::MeteoError;
pub use models::{is_canadian, ModelPair};
pub use types::{BlendedForecast, DailyField, DailyPayload, ModelDaily, ObservedDay, WeatherModel};
