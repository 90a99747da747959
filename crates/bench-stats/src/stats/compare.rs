//! Old-versus-new comparison of two group statistics

use serde::{Deserialize, Serialize};

use super::summary::Statistic;
use super::utest::mann_whitney_u;
use crate::config::ThresholdsConfig;

/// Statistically qualified difference between an old and a new group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// (new - old) / old * 100. `None` when the old central value is zero.
    pub delta_pct: Option<f64>,
    /// Two-sided Mann-Whitney p-value. `None` when either side has too few
    /// accepted samples.
    pub p_value: Option<f64>,
    /// Accepted samples on the old side
    pub n_old: usize,
    /// Accepted samples on the new side
    pub n_new: usize,
    /// p-value at or below the significance threshold
    pub significant: bool,
}

impl Comparison {
    /// Compare two groups from their statistics and accepted values.
    ///
    /// # Examples
    ///
    /// ```
    /// use bench_stats::config::ThresholdsConfig;
    /// use bench_stats::stats::{Comparison, Statistic};
    ///
    /// let old_values = [49_000.0, 49_500.0, 50_000.0];
    /// let new_values = [31_500.0, 32_000.0, 32_500.0];
    /// let old = Statistic::from_accepted(&old_values, 0).unwrap();
    /// let new = Statistic::from_accepted(&new_values, 0).unwrap();
    ///
    /// let cmp = Comparison::compute(&old, &new, &old_values, &new_values, &ThresholdsConfig::default());
    /// assert!((cmp.delta_pct.unwrap() + 35.35).abs() < 0.01);
    /// assert!(cmp.significant);
    /// ```
    pub fn compute(
        old: &Statistic,
        new: &Statistic,
        old_values: &[f64],
        new_values: &[f64],
        thresholds: &ThresholdsConfig,
    ) -> Self {
        let delta_pct = delta_percent(old.central, new.central);

        let enough = old_values.len() >= thresholds.min_samples
            && new_values.len() >= thresholds.min_samples;
        let p_value = if enough {
            mann_whitney_u(old_values, new_values).map(|r| r.p_value)
        } else {
            None
        };

        Comparison {
            delta_pct,
            p_value,
            n_old: old_values.len(),
            n_new: new_values.len(),
            significant: p_value.is_some_and(|p| p <= thresholds.alpha),
        }
    }

    /// A p-value could be computed
    pub fn is_reliable(&self) -> bool {
        self.p_value.is_some()
    }
}

/// Percentage change from `old` to `new`, `None` when it is not a finite number.
///
/// ```
/// use bench_stats::stats::compare::delta_percent;
///
/// assert_eq!(delta_percent(50.0, 25.0), Some(-50.0));
/// assert_eq!(delta_percent(0.0, 25.0), None);
/// ```
pub fn delta_percent(old: f64, new: f64) -> Option<f64> {
    if old == 0.0 {
        return None;
    }
    let delta = (new - old) / old * 100.0;
    delta.is_finite().then_some(delta)
}

/// Geometric mean of the positive values, `None` when there are none.
pub fn geometric_mean(values: &[f64]) -> Option<f64> {
    let logs: Vec<f64> = values.iter().filter(|&&v| v > 0.0).map(|v| v.ln()).collect();
    if logs.is_empty() {
        return None;
    }
    Some((logs.iter().sum::<f64>() / logs.len() as f64).exp())
}
