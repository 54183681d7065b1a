// Copyright 2024 Vladimir Kharchev

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at

//     http://www.apache.org/licenses/LICENSE-2.0

// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Kolmogorov–Smirnov goodness of fit of a resolved distribution to the sample.
//!
//! The p-value is estimated with a parametric bootstrap run by [`MonteCarlo`]: datasets of the
//! sample's size are drawn from the resolved distribution and their distance to it is compared
//! with the observed one. When the parameters were themselves fitted to the sample, each simulated
//! dataset is refitted before measuring the distance (a Lilliefors-style test), so the p-value
//! accounts for the estimation.
use crate::catalog::Family;
use crate::error::ResolveError;
use crate::monte_carlo::{MonteCarlo, Replicate};
use crate::params::ParameterVector;
use crate::standard::LocScale;

/// Largest distance between the empirical CDF of `sorted` and `cdf`. `sorted` must be in
/// increasing order and non-empty.
fn ks_sorted(sorted: &[f64], cdf: impl Fn(f64) -> f64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let n = sorted.len() as f64;
    sorted
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let fx = cdf(x);
            #[allow(clippy::cast_precision_loss)]
            let i = i as f64;
            f64::max((i + 1.0) / n - fx, fx - i / n)
        })
        .fold(0.0, f64::max)
}

/// The Kolmogorov–Smirnov distance between `samples` and `distr`. `0.0` for an empty sample.
#[must_use]
pub fn ks_statistic(samples: &[f64], distr: &LocScale) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    ks_sorted(&sorted, |x| distr.cdf(x))
}

/// Datasets drawn from a fixed distribution, measured against that distribution.
struct KsReplicate {
    distr: LocScale,
    samples: Box<[f64]>,
}

impl Replicate for KsReplicate {
    fn generate(&mut self, rng: &mut impl rand::Rng) {
        self.samples.fill_with(|| self.distr.sample(rng));
        self.samples.sort_by(f64::total_cmp);
    }

    fn evaluate(&self) -> f64 {
        ks_sorted(&self.samples, |x| self.distr.cdf(x))
    }
}

/// Datasets drawn from a fixed distribution, measured against the family refitted to them.
struct RefitReplicate {
    family: Family,
    inner: KsReplicate,
}

impl Replicate for RefitReplicate {
    fn generate(&mut self, rng: &mut impl rand::Rng) {
        self.inner.generate(rng);
    }

    fn evaluate(&self) -> f64 {
        let refitted = self
            .family
            .fit(&self.inner.samples)
            .and_then(|values| ParameterVector::from_tuple(self.family, &values))
            .ok()
            .and_then(|params| LocScale::new(self.family, &params));
        match refitted {
            Some(distr) => ks_sorted(&self.inner.samples, |x| distr.cdf(x)),
            None => f64::NAN,
        }
    }
}

/// The outcome of [`goodness_of_fit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoodnessOfFit {
    /// Kolmogorov–Smirnov distance between the sample and the distribution.
    pub statistic: f64,
    /// Estimated probability of a distance at least as large, `None` if no bootstrap replicate
    /// could be evaluated.
    pub pvalue: Option<f64>,
}

/// Measures how well `params` describe `samples`.
///
/// `refit` should be set when `params` were fitted to `samples`. `iterations` bootstrap datasets
/// are simulated from a generator seeded with `seed`.
///
/// # Errors
///
/// - [`ResolveError::NoData`] if `samples` is empty.
/// - [`ResolveError::FitFailed`] if `params` do not describe a valid distribution.
pub fn goodness_of_fit(
    family: Family,
    params: &ParameterVector,
    samples: &[f64],
    refit: bool,
    iterations: usize,
    seed: u64,
) -> Result<GoodnessOfFit, ResolveError> {
    if samples.is_empty() {
        return Err(ResolveError::NoData);
    }
    let distr = LocScale::new(family, params).ok_or_else(|| {
        ResolveError::FitFailed(format!("invalid {family} parameters {:?}", params.to_vec()))
    })?;
    let statistic = ks_statistic(samples, &distr);

    let inner = KsReplicate {
        distr,
        samples: vec![0.0; samples.len()].into_boxed_slice(),
    };
    let pvalue = if refit {
        let mut simulation = MonteCarlo::with_seed(RefitReplicate { family, inner }, seed);
        simulation.iterations = iterations;
        simulation.simulate_pvalue(statistic)
    } else {
        let mut simulation = MonteCarlo::with_seed(inner, seed);
        simulation.iterations = iterations;
        simulation.simulate_pvalue(statistic)
    };
    tracing::debug!(
        distribution = %family,
        statistic,
        pvalue = ?pvalue,
        refit,
        iterations,
        "goodness of fit"
    );
    Ok(GoodnessOfFit { statistic, pvalue })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_distr::Distribution;

    use super::*;

    fn standard_normal() -> (Family, ParameterVector) {
        let family = Family::Normal;
        (
            family,
            ParameterVector::new(family, vec![], 0.0, 1.0).unwrap(),
        )
    }

    #[test]
    fn single_point_at_median() {
        let (family, params) = standard_normal();
        let distr = LocScale::new(family, &params).unwrap();
        assert_relative_eq!(ks_statistic(&[0.0], &distr), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn statistic_of_uniform_grid() {
        let params = ParameterVector::new(Family::Uniform, vec![], 0.0, 1.0).unwrap();
        let distr = LocScale::new(Family::Uniform, &params).unwrap();
        // Points at the midpoints of four equal bins are 1/8 away from the CDF.
        assert_relative_eq!(
            ks_statistic(&[0.875, 0.125, 0.625, 0.375], &distr),
            0.125,
            epsilon = 1e-12
        );
    }

    #[test]
    fn matching_sample_is_not_rejected() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let normal = rand_distr::Normal::new(0.0, 1.0).unwrap();
        let samples: Vec<f64> = (0..200).map(|_| normal.sample(&mut rng)).collect();
        let (family, params) = standard_normal();
        let gof = goodness_of_fit(family, &params, &samples, false, 500, 11).unwrap();
        assert!(gof.pvalue.unwrap() > 0.01, "{gof:?}");
    }

    #[test]
    fn shifted_sample_is_rejected() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(5);
        let normal = rand_distr::Normal::new(3.0, 1.0).unwrap();
        let samples: Vec<f64> = (0..200).map(|_| normal.sample(&mut rng)).collect();
        let (family, params) = standard_normal();
        let gof = goodness_of_fit(family, &params, &samples, false, 500, 11).unwrap();
        assert!(gof.statistic > 0.5);
        assert_eq!(gof.pvalue, Some(0.0));
    }

    #[test]
    fn refit_bootstrap_runs() {
        let samples = [1.0, 2.0, 2.0, 3.0, 3.0, 3.0, 4.0, 4.0, 5.0];
        let family = Family::Normal;
        let params = ParameterVector::from_tuple(family, &family.fit(&samples).unwrap()).unwrap();
        let gof = goodness_of_fit(family, &params, &samples, true, 200, 1).unwrap();
        let pvalue = gof.pvalue.unwrap();
        assert!((0.0..=1.0).contains(&pvalue));
    }

    #[test]
    fn empty_sample_has_no_data() {
        let (family, params) = standard_normal();
        assert_eq!(
            goodness_of_fit(family, &params, &[], false, 10, 1),
            Err(ResolveError::NoData)
        );
    }
}
