//! Daily series alignment.
//!
//! Regional models are more accurate for near-term days but only report a
//! few days out; global models cover the full horizon with less local
//! accuracy. Alignment keeps the regional value wherever one exists and
//! fills the rest from the global model, so the result is both accurate
//! early and complete to the horizon.

/// Forecast horizon enforced across the application.
pub const FORECAST_HORIZON_DAYS: usize = 7;

/// Merge a primary (regional) series with a secondary (global) one.
///
/// The output has length `min(secondary_len, horizon)`. At each position the
/// primary value wins if present; otherwise the secondary model-specific
/// value, then the secondary generic value. A position covered by neither
/// stays `None` — missing data propagates as unknown, never as an error.
///
/// Inputs are never mutated; the result is a fresh vector.
pub fn align_series(
    primary: &[Option<f64>],
    model_specific: &[Option<f64>],
    generic: &[Option<f64>],
    secondary_len: usize,
    horizon: usize,
) -> Vec<Option<f64>> {
    let len = secondary_len.min(horizon);
    (0..len)
        .map(|i| {
            primary
                .get(i)
                .copied()
                .flatten()
                .or_else(|| model_specific.get(i).copied().flatten())
                .or_else(|| generic.get(i).copied().flatten())
        })
        .collect()
}

/// Two-series convenience form: the secondary acts as both the
/// model-specific and the generic fallback.
pub fn align(primary: &[Option<f64>], secondary: &[Option<f64>]) -> Vec<Option<f64>> {
    align_series(primary, secondary, &[], secondary.len(), FORECAST_HORIZON_DAYS)
}
