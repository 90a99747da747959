//! Mann-Whitney U test
//!
//! Rank-based two-sample test that assumes nothing about the shape of the
//! timing distributions. Tied values get mid-ranks and the variance of U is
//! tie-corrected. The p-value comes from the normal approximation of U,
//! two-sided, without continuity correction.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Outcome of a two-sample U test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UTestResult {
    /// The smaller of U(old) and U(new)
    pub u: f64,
    /// Standard score of U(old)
    pub z: f64,
    /// Two-sided p-value
    pub p_value: f64,
    pub n_old: usize,
    pub n_new: usize,
}

/// Run the test on two sample sets.
///
/// Returns `None` when either side has fewer than two samples, since no
/// meaningful p-value exists then.
///
/// # Examples
///
/// ```
/// use bench_stats::stats::utest::mann_whitney_u;
///
/// let old = [49.0, 49.5, 50.0];
/// let new = [31.5, 32.0, 32.5];
/// let result = mann_whitney_u(&old, &new).unwrap();
/// assert_eq!(result.u, 0.0);
/// assert!(result.p_value < 0.05);
///
/// assert!(mann_whitney_u(&old, &[32.0]).is_none());
/// ```
pub fn mann_whitney_u(old: &[f64], new: &[f64]) -> Option<UTestResult> {
    let n1 = old.len();
    let n2 = new.len();
    if n1 < 2 || n2 < 2 {
        return None;
    }

    // (value, from_old)
    let mut pooled: Vec<(f64, bool)> = old
        .iter()
        .map(|&v| (v, true))
        .chain(new.iter().map(|&v| (v, false)))
        .collect();
    pooled.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    let n = pooled.len();
    let mut rank_sum_old = 0.0;
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && pooled[j].0 == pooled[i].0 {
            j += 1;
        }
        // Positions i..j share the mid-rank of ranks i+1..=j
        let ties = (j - i) as f64;
        let mid_rank = (i + 1 + j) as f64 / 2.0;
        for &(_, from_old) in &pooled[i..j] {
            if from_old {
                rank_sum_old += mid_rank;
            }
        }
        tie_term += ties * ties * ties - ties;
        i = j;
    }

    let n1f = n1 as f64;
    let n2f = n2 as f64;
    let nf = n as f64;

    let u_old = rank_sum_old - n1f * (n1f + 1.0) / 2.0;
    let u_new = n1f * n2f - u_old;
    let mean = n1f * n2f / 2.0;
    let variance = n1f * n2f / 12.0 * ((nf + 1.0) - tie_term / (nf * (nf - 1.0)));

    let (z, p_value) = if variance <= 0.0 {
        // Every value tied: the samples are indistinguishable
        (0.0, 1.0)
    } else {
        let z = (u_old - mean) / variance.sqrt();
        let p = 2.0 * (1.0 - normal_cdf(z.abs()));
        (z, p.clamp(0.0, 1.0))
    };

    Some(UTestResult {
        u: u_old.min(u_new),
        z,
        p_value,
        n_old: n1,
        n_new: n2,
    })
}

/// Standard normal cumulative distribution function
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

// Abramowitz & Stegun 7.1.26, absolute error below 1.5e-7
fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}
