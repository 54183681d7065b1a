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

//! Maximum-likelihood fits of the supported families.
//!
//! [`Family::fit`] turns a dataset into the tuple `(shape..., loc, scale)`. Families whose
//! estimates have a closed form are fitted directly; the others are fitted by minimising the
//! negative log-likelihood with [`NelderMead`], starting from moment-based estimates that place
//! every observation strictly inside the support. The Pareto likelihood peaks on the edge of its
//! support, so it is profiled down to a one-dimensional search instead.
use statrs::function::gamma::gamma;
use statrs::statistics::Statistics;

use crate::catalog::Family;
use crate::error::ResolveError;
use crate::minimize::NelderMead;
use crate::params::ParameterVector;
use crate::standard::LocScale;

/// Log-encoded parameters are confined to `[-MAX_LOG_PARAMETER, MAX_LOG_PARAMETER]`.
const MAX_LOG_PARAMETER: f64 = 30.0;

/// Summary statistics used to start the fits.
struct Moments {
    mean: f64,
    /// Population standard deviation.
    std_dev: f64,
    skewness: f64,
    min: f64,
    max: f64,
}

impl Moments {
    fn of(samples: &[f64]) -> Self {
        let mean = Statistics::mean(samples);
        let std_dev = Statistics::population_std_dev(samples);
        #[allow(clippy::cast_precision_loss)]
        let n = samples.len() as f64;
        let skewness = if std_dev > 0.0 {
            samples
                .iter()
                .map(|x| ((x - mean) / std_dev).powi(3))
                .sum::<f64>()
                / n
        } else {
            0.0
        };
        Self {
            mean,
            std_dev,
            skewness,
            min: Statistics::min(samples),
            max: Statistics::max(samples),
        }
    }

    fn range(&self) -> f64 {
        self.max - self.min
    }

    /// A location strictly below the smallest observation.
    fn below_min(&self, candidate: f64) -> f64 {
        if candidate < self.min {
            candidate
        } else {
            self.min - 0.1 * self.std_dev
        }
    }
}

/// The Pareto parameters that maximise the likelihood once `loc` is fixed at
/// `min - exp(log_gap)`.
///
/// The likelihood grows with `scale` up to the point where the smallest observation sits on the
/// edge of the support, so `scale = min - loc` and the shape follows in closed form. Returns
/// `None` if `log_gap` is outside the search range.
fn pareto_profile(samples: &[f64], min: f64, log_gap: f64) -> Option<Vec<f64>> {
    if log_gap.abs() > MAX_LOG_PARAMETER {
        return None;
    }
    let loc = min - log_gap.exp();
    let scale = min - loc;
    let log_sum: f64 = samples.iter().map(|x| ((x - loc) / scale).ln()).sum();
    #[allow(clippy::cast_precision_loss)]
    let n = samples.len() as f64;
    (log_sum > 0.0 && scale > 0.0).then(|| vec![n / log_sum, loc, scale])
}

/// Maximum-likelihood Pareto fit: a search over `ln(min - loc)` of the profile likelihood.
fn fit_pareto(samples: &[f64], moments: &Moments) -> Result<Vec<f64>, ResolveError> {
    let nll_at = |log_gap: f64| {
        pareto_profile(samples, moments.min, log_gap)
            .and_then(|values| ParameterVector::from_tuple(Family::Pareto, &values).ok())
            .map_or(f64::INFINITY, |params| {
                negative_log_likelihood(Family::Pareto, &params, samples)
            })
    };
    let start = [moments.std_dev.ln()];
    let minimum = NelderMead::for_dimension(1).minimize(|theta: &[f64]| nll_at(theta[0]), &start);
    tracing::debug!(
        family = %Family::Pareto,
        iterations = minimum.iterations,
        converged = minimum.converged,
        nll = minimum.value,
        "profile likelihood search finished"
    );
    if !minimum.value.is_finite() {
        return Err(ResolveError::FitFailed(
            "no Pareto parameters give the sample a finite likelihood".to_owned(),
        ));
    }
    pareto_profile(samples, moments.min, minimum.point[0]).ok_or_else(|| {
        ResolveError::FitFailed("Pareto profile search left its range".to_owned())
    })
}

fn median(samples: &[f64]) -> f64 {
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// The negative log-likelihood of `samples` under `family` with `params`.
///
/// Returns `+∞` if the parameters do not describe a valid distribution or some observation has
/// zero density.
#[must_use]
pub fn negative_log_likelihood(family: Family, params: &ParameterVector, samples: &[f64]) -> f64 {
    let Some(distr) = LocScale::new(family, params) else {
        return f64::INFINITY;
    };
    let mut total = 0.0;
    for &x in samples {
        let ln_density = distr.ln_density(x);
        if !ln_density.is_finite() {
            return f64::INFINITY;
        }
        total -= ln_density;
    }
    total
}

impl Family {
    /// Estimates the parameters of `self` from `samples` by maximum likelihood.
    ///
    /// The result is ordered `(shape..., loc, scale)` and has `self.shape_count() + 2` values.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::NoData`] if `samples` is empty.
    /// - [`ResolveError::FitFailed`] if the sample contains non-finite values, has no spread, or
    ///   no parameters with a finite likelihood were found.
    pub fn fit(self, samples: &[f64]) -> Result<Vec<f64>, ResolveError> {
        if samples.is_empty() {
            return Err(ResolveError::NoData);
        }
        if samples.iter().any(|x| !x.is_finite()) {
            return Err(ResolveError::FitFailed(
                "sample contains non-finite values".to_owned(),
            ));
        }
        let moments = Moments::of(samples);
        if moments.std_dev <= 0.0 {
            return Err(ResolveError::FitFailed("sample has no spread".to_owned()));
        }

        let values = match self {
            Family::Normal => vec![moments.mean, moments.std_dev],
            Family::Exponential => vec![moments.min, moments.mean - moments.min],
            Family::Uniform => vec![moments.min, moments.range()],
            Family::Laplace => {
                let loc = median(samples);
                let scale = Statistics::mean(samples.iter().map(|x| (x - loc).abs()));
                vec![loc, scale]
            }
            Family::Pareto => fit_pareto(samples, &moments)?,
            _ => self.fit_likelihood(samples, &moments)?,
        };

        let scale = values.last().copied().unwrap_or(f64::NAN);
        if values.iter().any(|v| !v.is_finite()) || scale <= 0.0 {
            tracing::warn!(family = %self, params = ?values, "fit produced unusable parameters");
            return Err(ResolveError::FitFailed(format!(
                "{self} fit produced unusable parameters {values:?}"
            )));
        }
        tracing::debug!(family = %self, n = samples.len(), params = ?values, "fitted distribution");
        Ok(values)
    }

    fn fit_likelihood(self, samples: &[f64], moments: &Moments) -> Result<Vec<f64>, ResolveError> {
        let start = self.starting_values(samples, moments);
        let encoded = self.encode(&start);
        let objective = |theta: &[f64]| {
            if self.beyond_search_range(theta) {
                return f64::INFINITY;
            }
            ParameterVector::from_tuple(self, &self.decode(theta))
                .map_or(f64::INFINITY, |params| {
                    negative_log_likelihood(self, &params, samples)
                })
        };
        let minimum = NelderMead::for_dimension(encoded.len()).minimize(objective, &encoded);
        tracing::debug!(
            family = %self,
            iterations = minimum.iterations,
            converged = minimum.converged,
            nll = minimum.value,
            "likelihood search finished"
        );
        if !minimum.value.is_finite() {
            return Err(ResolveError::FitFailed(format!(
                "no {self} parameters give the sample a finite likelihood"
            )));
        }
        Ok(self.decode(&minimum.point))
    }

    /// Moment-based estimates `(shape..., loc, scale)` under which every observation has a
    /// positive density.
    fn starting_values(self, samples: &[f64], m: &Moments) -> Vec<f64> {
        match self {
            Family::Gamma => {
                let k = if m.skewness > 0.0 {
                    (4.0 / (m.skewness * m.skewness)).clamp(0.5, 50.0)
                } else {
                    50.0
                };
                let scale = m.std_dev / k.sqrt();
                vec![k, m.below_min(m.mean - k * scale), scale]
            }
            Family::ChiSquare => {
                let df = if m.skewness > 0.0 {
                    (8.0 / (m.skewness * m.skewness)).clamp(1.0, 100.0)
                } else {
                    100.0
                };
                let scale = m.std_dev / (2.0 * df).sqrt();
                vec![df, m.below_min(m.mean - df * scale), scale]
            }
            Family::Weibull => {
                let loc = m.below_min(m.min);
                let shifted_mean = m.mean - loc;
                let k = (m.std_dev / shifted_mean).powf(-1.086).clamp(0.2, 20.0);
                vec![k, loc, shifted_mean / gamma(1.0 + 1.0 / k)]
            }
            Family::Lognormal => {
                let loc = m.below_min(m.min);
                let logs: Vec<f64> = samples.iter().map(|x| (x - loc).ln()).collect();
                let sigma = Statistics::population_std_dev(&logs).max(0.05);
                vec![sigma, loc, Statistics::mean(&logs).exp()]
            }
            Family::Beta => {
                let loc = m.min - 0.05 * m.range();
                let scale = 1.1 * m.range();
                let mean = (m.mean - loc) / scale;
                let var = (m.std_dev / scale).powi(2);
                let common = mean * (1.0 - mean) / var - 1.0;
                let (a, b) = if common > 0.0 {
                    (mean * common, (1.0 - mean) * common)
                } else {
                    (1.0, 1.0)
                };
                vec![a.clamp(0.05, 100.0), b.clamp(0.05, 100.0), loc, scale]
            }
            Family::Triangular => {
                let loc = m.min - 0.05 * m.range();
                let scale = 1.1 * m.range();
                // mean = (low + high + mode) / 3
                let mode = 3.0 * m.mean - loc - (loc + scale);
                let c = ((mode - loc) / scale).clamp(0.05, 0.95);
                vec![c, loc, scale]
            }
            // not searched
            Family::Normal
            | Family::Exponential
            | Family::Uniform
            | Family::Laplace
            | Family::Pareto => vec![m.mean, m.std_dev],
        }
    }

    /// Maps `(shape..., loc, scale)` to the unconstrained search space.
    ///
    /// Positive parameters are searched on a log scale. The triangular mode fraction is searched
    /// directly; values outside `[0, 1]` are rejected by the likelihood.
    fn encode(self, values: &[f64]) -> Vec<f64> {
        let shapes = self.shape_count();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| match i {
                i if i == shapes => v,
                i if i < shapes && self == Family::Triangular => v,
                _ => v.ln(),
            })
            .collect()
    }

    /// Whether a log-encoded component of `theta` is too large for its exponent to be usable.
    fn beyond_search_range(self, theta: &[f64]) -> bool {
        let shapes = self.shape_count();
        theta.iter().enumerate().any(|(i, t)| {
            let log_encoded = i > shapes || (i < shapes && self != Family::Triangular);
            log_encoded && t.abs() > MAX_LOG_PARAMETER
        })
    }

    /// Inverse of [`Family::encode`].
    fn decode(self, theta: &[f64]) -> Vec<f64> {
        let shapes = self.shape_count();
        theta
            .iter()
            .enumerate()
            .map(|(i, &t)| match i {
                i if i == shapes => t,
                i if i < shapes && self == Family::Triangular => t,
                _ => t.exp(),
            })
            .collect()
    }
}
