//! Two-component 1-D Gaussian mixture fitting by Expectation-Maximization.
//!
//! The fit is a pure function: seeds go in, refined components come out.
//! Nothing is mutated in place, so re-running on the same samples with the
//! same seeds reproduces the same result bit for bit.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Lower bound on the fitted standard deviation. Widths are integer pixel
/// counts, so a component must not collapse onto a single sample.
const MIN_SIGMA: f64 = 0.4;

/// A 1-D normal distribution.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Gaussian {
    pub mean: f64,
    pub sigma: f64,
}

impl Gaussian {
    pub fn new(mean: f64, sigma: f64) -> Self {
        Self {
            mean,
            sigma: sigma.max(MIN_SIGMA),
        }
    }

    /// Probability density at `x`.
    pub fn density(&self, x: f64) -> f64 {
        let z = (x - self.mean) / self.sigma;
        (-0.5 * z * z).exp() / (self.sigma * (2.0 * PI).sqrt())
    }
}

/// Result of a two-component mixture fit.
#[derive(Clone, Copy, Debug)]
pub struct MixtureFit {
    /// Mixture weights, sum to 1.
    pub weights: [f64; 2],
    /// Refined components, in seed order.
    pub components: [Gaussian; 2],
}

/// Fit two Gaussian components to the samples, starting from the seeds.
///
/// Runs at most `max_iters` EM rounds, stopping early once both means move
/// by less than 1e-6 in one round. With fewer than two samples the seeds are
/// returned unchanged with equal weights.
pub fn fit_two_gaussians(samples: &[f64], seeds: [Gaussian; 2], max_iters: usize) -> MixtureFit {
    let n = samples.len();
    if n < 2 {
        return MixtureFit {
            weights: [0.5, 0.5],
            components: seeds,
        };
    }

    let mut weights = [0.5f64, 0.5f64];
    let mut comps = seeds;
    let mut resp = vec![[0.0f64; 2]; n];

    for _ in 0..max_iters {
        // E-step: responsibilities.
        for (r, &x) in resp.iter_mut().zip(samples) {
            let p0 = weights[0] * comps[0].density(x);
            let p1 = weights[1] * comps[1].density(x);
            let sum = p0 + p1;
            if sum > 0.0 {
                *r = [p0 / sum, p1 / sum];
            } else {
                // Sample far from both components: split evenly.
                *r = [0.5, 0.5];
            }
        }

        // M-step: weights, means, sigmas.
        let mut moved = 0.0f64;
        for k in 0..2 {
            let total: f64 = resp.iter().map(|r| r[k]).sum();
            if total <= 0.0 {
                continue;
            }

            let mean = resp
                .iter()
                .zip(samples)
                .map(|(r, &x)| r[k] * x)
                .sum::<f64>()
                / total;
            let var = resp
                .iter()
                .zip(samples)
                .map(|(r, &x)| r[k] * (x - mean) * (x - mean))
                .sum::<f64>()
                / total;

            moved = moved.max((mean - comps[k].mean).abs());
            comps[k] = Gaussian::new(mean, var.sqrt());
            weights[k] = total / n as f64;
        }

        if moved < 1e-6 {
            break;
        }
    }

    MixtureFit {
        weights,
        components: comps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples_from(pairs: &[(i32, usize)]) -> Vec<f64> {
        let mut out = Vec::new();
        for &(w, c) in pairs {
            out.extend(std::iter::repeat(w as f64).take(c));
        }
        out
    }

    #[test]
    fn separates_two_clear_modes() {
        let samples = samples_from(&[(3, 20), (4, 30), (8, 25), (9, 15)]);
        let fit = fit_two_gaussians(
            &samples,
            [Gaussian::new(5.0, 1.0), Gaussian::new(9.0, 1.0)],
            50,
        );
        let [thin, thick] = fit.components;
        assert!(thin.mean < 5.0, "thin mean {}", thin.mean);
        assert!(thick.mean > 7.5, "thick mean {}", thick.mean);
        assert!(thick.mean - thin.mean > 4.0);
    }

    #[test]
    fn merged_modes_stay_close() {
        let samples = samples_from(&[(5, 10), (6, 12), (7, 9)]);
        let fit = fit_two_gaussians(
            &samples,
            [Gaussian::new(5.0, 1.0), Gaussian::new(9.0, 1.0)],
            50,
        );
        let [thin, thick] = fit.components;
        assert!((thick.mean - thin.mean).abs() < 2.0);
    }

    #[test]
    fn fit_is_deterministic() {
        let samples = samples_from(&[(3, 5), (8, 5)]);
        let seeds = [Gaussian::new(5.0, 1.0), Gaussian::new(9.0, 1.0)];
        let a = fit_two_gaussians(&samples, seeds, 30);
        let b = fit_two_gaussians(&samples, seeds, 30);
        assert_eq!(a.components[0].mean.to_bits(), b.components[0].mean.to_bits());
        assert_eq!(a.components[1].mean.to_bits(), b.components[1].mean.to_bits());
    }

    #[test]
    fn degenerate_input_returns_seeds() {
        let seeds = [Gaussian::new(5.0, 1.0), Gaussian::new(9.0, 1.0)];
        let fit = fit_two_gaussians(&[4.0], seeds, 30);
        assert_eq!(fit.components[0].mean, 5.0);
        assert_eq!(fit.components[1].mean, 9.0);
    }
}
