//! Model pair selection by location.
//!
//! Canadian locations duel the regional GEM model against ECMWF; everywhere
//! else ECMWF faces GFS. GEM Regional only covers the first few days, so it
//! carries a fill chain of longer-horizon models for blending.

use crate::types::WeatherModel;

/// Rough bounding box for Canada.
pub fn is_canadian(lat: f64, lon: f64) -> bool {
    lat > 41.0 && lat < 83.0 && lon > -141.0 && lon < -52.0
}

/// The two models battling for a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelPair {
    pub primary: WeatherModel,
    pub secondary: WeatherModel,
}

impl ModelPair {
    pub fn for_location(lat: f64, lon: f64) -> Self {
        if is_canadian(lat, lon) {
            Self {
                primary: WeatherModel::GemRegional,
                secondary: WeatherModel::EcmwfIfs025,
            }
        } else {
            Self {
                primary: WeatherModel::EcmwfIfs025,
                secondary: WeatherModel::GfsSeamless,
            }
        }
    }

    /// Models to try, in order, for filling the horizon when the primary is
    /// a short-range regional model. Empty when no filling is needed.
    pub fn horizon_fill_chain(&self) -> Vec<WeatherModel> {
        if self.primary == WeatherModel::GemRegional {
            vec![WeatherModel::GemGlobal, self.secondary]
        } else {
            Vec::new()
        }
    }
}
