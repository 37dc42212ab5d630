//! Logistic-kernel smoothed ball probabilities and bandwidth selection.

use std::f64::consts::PI;

/// Convert a bandwidth (kernel standard deviation) to a logistic scale.
pub(crate) fn logistic_scale(bandwidth: f64) -> f64 {
    bandwidth * 3f64.sqrt() / PI
}

/// Smoothed fraction of `values` within `radius`: mean of `sigmoid((radius - v) / scale)`.
pub(crate) fn mass_within(values: &[f64], radius: f64, scale: f64) -> f64 {
    let total: f64 = values
        .iter()
        .map(|&v| 1.0 / (1.0 + (-(radius - v) / scale).exp()))
        .sum();
    total / values.len() as f64
}

/// Silverman's rule of thumb: `0.9 * min(sd, IQR / 1.34) * n^(-1/5)`.
///
/// Falls back to `sd` when the IQR is zero. Returns `None` when the row has
/// no spread at all.
pub(crate) fn silverman_bandwidth(row: &[f64]) -> Option<f64> {
    let n = row.len();
    if n < 2 {
        return None;
    }
    let mean = row.iter().sum::<f64>() / n as f64;
    let var = row.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let sd = var.sqrt();

    let sorted = crate::ecdf::sorted(row);
    let iqr = quantile(&sorted, 0.75) - quantile(&sorted, 0.25);
    let spread = if iqr > 0.0 { sd.min(iqr / 1.34) } else { sd };

    let h = 0.9 * spread * (n as f64).powf(-0.2);
    (h > 0.0 && h.is_finite()).then_some(h)
}

/// Linear-interpolation quantile of sorted data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
