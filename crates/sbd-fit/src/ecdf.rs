//! Empirical ball probabilities.

/// Return a sorted copy of `row` for repeated mass queries.
pub(crate) fn sorted(row: &[f64]) -> Vec<f64> {
    let mut values = row.to_vec();
    values.sort_by(f64::total_cmp);
    values
}

/// Fraction of `sorted` values at or below `radius`.
pub(crate) fn mass_within(sorted: &[f64], radius: f64) -> f64 {
    let inside = sorted.partition_point(|&v| v <= radius);
    inside as f64 / sorted.len() as f64
}
