use anyhow::{bail, Result};
use serde::Serialize;

/// Upper bound on the number of histogram bins a step may produce
const MAX_BINS: usize = 10_000;

/// One histogram bin covering `[start, end)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Bin values with a fixed width.
///
/// Bins are anchored at the largest multiple of `step` not above the minimum
/// and run contiguously to the bin holding the maximum, empty bins included.
/// Every value lands in exactly one bin.
pub fn bin_fixed_step(values: &[f64], step: f64) -> Result<Vec<Bin>> {
    if !step.is_finite() || step <= 0.0 {
        bail!("Bin step must be a positive number, got {}", step);
    }

    let Some((min, max)) = crate::data::min_max(values.iter().copied()) else {
        return Ok(Vec::new());
    };

    let anchor = (min / step).floor() * step;
    let bin_index = |v: f64| -> usize {
        // Nudge values sitting on an edge past float rounding (0.3 / 0.1 = 2.999...)
        ((v - anchor) / step + 1e-9).floor().max(0.0) as usize
    };

    let bin_count = bin_index(max) + 1;
    if bin_count > MAX_BINS {
        bail!(
            "Bin step {} yields {} bins (limit is {})",
            step,
            bin_count,
            MAX_BINS
        );
    }

    let mut counts = vec![0usize; bin_count];
    for &v in values {
        counts[bin_index(v)] += 1;
    }

    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let start = anchor + i as f64 * step;
            Bin {
                start,
                end: start + step,
                count,
            }
        })
        .collect())
}

/// Ordinary least squares fit `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit a line through the points. None with fewer than two points or when
/// every x is the same.
pub fn linear_regression(points: &[(f64, f64)]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let sum_x: f64 = points.iter().map(|(x, _)| x).sum();
    let sum_y: f64 = points.iter().map(|(_, y)| y).sum();
    let sum_xx: f64 = points.iter().map(|(x, _)| x * x).sum();
    let sum_xy: f64 = points.iter().map(|(x, y)| x * y).sum();

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator.abs() < f64::EPSILON {
        return None;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    Some(LinearFit { slope, intercept })
}

/// Trend line endpoints over the observed x extent
pub fn regression_line(points: &[(f64, f64)]) -> Option<Vec<(f64, f64)>> {
    let fit = linear_regression(points)?;
    let (min_x, max_x) = crate::data::min_max(points.iter().map(|(x, _)| *x))?;
    Some(vec![(min_x, fit.predict(min_x)), (max_x, fit.predict(max_x))])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_counts_sum_to_input() {
        let values = vec![80.2, 81.0, 81.9, 85.5, 90.0, 90.0, 99.9];
        let bins = bin_fixed_step(&values, 1.0).unwrap();
        let total: usize = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, values.len());
        assert_eq!(bins[0].start, 80.0);
        assert_eq!(bins.last().unwrap().end, 100.0);
    }

    #[test]
    fn test_bin_edges_are_half_open() {
        let bins = bin_fixed_step(&[0.0, 15.0, 29.0, 30.0], 15.0).unwrap();
        let counts: Vec<usize> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 2, 1]);
        assert_eq!(bins[2].start, 30.0);
    }

    #[test]
    fn test_bin_float_edges() {
        let bins = bin_fixed_step(&[0.1, 0.3], 0.1).unwrap();
        let total: usize = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, 2);
        assert_eq!(bins.len(), 3);
        assert_eq!(bins[2].count, 1);
    }

    #[test]
    fn test_bin_anchor_for_large_steps() {
        let bins = bin_fixed_step(&[12_345.0, 48_000.0], 10_000.0).unwrap();
        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].start, 10_000.0);
        assert_eq!(bins[3].count, 1);
    }

    #[test]
    fn test_bin_empty_and_invalid() {
        assert!(bin_fixed_step(&[], 5.0).unwrap().is_empty());
        assert!(bin_fixed_step(&[1.0], 0.0).is_err());
        assert!(bin_fixed_step(&[0.0, 1.0e9], 1.0).is_err());
    }

    #[test]
    fn test_linear_regression_exact() {
        let points = vec![(1.0, 3.0), (2.0, 5.0), (3.0, 7.0)];
        let fit = linear_regression(&points).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!((fit.intercept - 1.0).abs() < 1e-9);

        let line = regression_line(&points).unwrap();
        assert_eq!(line.len(), 2);
        assert!((line[1].1 - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_regression_degenerate() {
        assert!(linear_regression(&[(1.0, 2.0)]).is_none());
        assert!(linear_regression(&[(4.0, 1.0), (4.0, 9.0)]).is_none());
        assert!(regression_line(&[]).is_none());
    }
}
