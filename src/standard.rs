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

//! Standardised forms of the supported families and their location-scale extensions.
//!
//! Every family is evaluated as `f((x - loc) / scale) / scale`, where `f` is the density of the
//! standardised `statrs` distribution listed in [`Standard`].
use rand::distributions::Distribution;
use rand::Rng;
use statrs::distribution::{
    Beta, ChiSquared, Continuous, ContinuousCDF, Exp, Gamma, Laplace, LogNormal, Normal, Pareto,
    Triangular, Uniform, Weibull,
};

use crate::catalog::Family;
use crate::params::ParameterVector;

/// A family with its shape parameters applied, at location 0 and scale 1.
#[derive(Debug, Clone)]
pub enum Standard {
    /// `Normal(0, 1)`
    Normal(Normal),
    /// `Gamma(k, rate = 1)`
    Gamma(Gamma),
    /// `Weibull(k, 1)`
    Weibull(Weibull),
    /// `Exp(1)`
    Exponential(Exp),
    /// `LogNormal(0, σ)`
    Lognormal(LogNormal),
    /// `Beta(a, b)`
    Beta(Beta),
    /// `Uniform(0, 1)`
    Uniform(Uniform),
    /// `Triangular(0, 1, c)`
    Triangular(Triangular),
    /// `ChiSquared(df)`
    ChiSquare(ChiSquared),
    /// `Pareto(1, b)`
    Pareto(Pareto),
    /// `Laplace(0, 1)`
    Laplace(Laplace),
}

macro_rules! dispatch {
    ($self:expr, $d:ident => $body:expr) => {
        match $self {
            Standard::Normal($d) => $body,
            Standard::Gamma($d) => $body,
            Standard::Weibull($d) => $body,
            Standard::Exponential($d) => $body,
            Standard::Lognormal($d) => $body,
            Standard::Beta($d) => $body,
            Standard::Uniform($d) => $body,
            Standard::Triangular($d) => $body,
            Standard::ChiSquare($d) => $body,
            Standard::Pareto($d) => $body,
            Standard::Laplace($d) => $body,
        }
    };
}

impl Standard {
    /// Builds the standardised distribution of `family` with the given shape parameters.
    ///
    /// Returns `None` if the number of shape parameters is wrong or `statrs` rejects their values.
    #[must_use]
    pub fn new(family: Family, shape: &[f64]) -> Option<Self> {
        let standard = match (family, shape) {
            (Family::Normal, []) => Standard::Normal(Normal::new(0.0, 1.0).ok()?),
            (Family::Gamma, &[k]) => Standard::Gamma(Gamma::new(k, 1.0).ok()?),
            (Family::Weibull, &[k]) => Standard::Weibull(Weibull::new(k, 1.0).ok()?),
            (Family::Exponential, []) => Standard::Exponential(Exp::new(1.0).ok()?),
            (Family::Lognormal, &[sigma]) => Standard::Lognormal(LogNormal::new(0.0, sigma).ok()?),
            (Family::Beta, &[a, b]) => Standard::Beta(Beta::new(a, b).ok()?),
            (Family::Uniform, []) => Standard::Uniform(Uniform::new(0.0, 1.0).ok()?),
            (Family::Triangular, &[c]) => {
                Standard::Triangular(Triangular::new(0.0, 1.0, c).ok()?)
            }
            (Family::ChiSquare, &[df]) => Standard::ChiSquare(ChiSquared::new(df).ok()?),
            (Family::Pareto, &[b]) => Standard::Pareto(Pareto::new(1.0, b).ok()?),
            (Family::Laplace, []) => Standard::Laplace(Laplace::new(0.0, 1.0).ok()?),
            _ => return None,
        };
        Some(standard)
    }

    /// The closed interval outside of which the density is zero.
    #[must_use]
    pub fn support(&self) -> (f64, f64) {
        match self {
            Standard::Normal(_) | Standard::Laplace(_) => (f64::NEG_INFINITY, f64::INFINITY),
            Standard::Gamma(_)
            | Standard::Weibull(_)
            | Standard::Exponential(_)
            | Standard::Lognormal(_)
            | Standard::ChiSquare(_) => (0.0, f64::INFINITY),
            Standard::Beta(_) | Standard::Uniform(_) | Standard::Triangular(_) => (0.0, 1.0),
            Standard::Pareto(_) => (1.0, f64::INFINITY),
        }
    }

    /// Whether `z` lies in the support.
    #[must_use]
    pub fn contains(&self, z: f64) -> bool {
        let (low, high) = self.support();
        low <= z && z <= high
    }

    /// The density at `z`, as computed by `statrs`.
    #[must_use]
    pub fn pdf(&self, z: f64) -> f64 {
        dispatch!(self, d => d.pdf(z))
    }

    /// The logarithm of the density at `z`.
    #[must_use]
    pub fn ln_pdf(&self, z: f64) -> f64 {
        dispatch!(self, d => d.ln_pdf(z))
    }

    /// The cumulative distribution function at `z`.
    #[must_use]
    pub fn cdf(&self, z: f64) -> f64 {
        if z.is_nan() {
            return f64::NAN;
        }
        let (low, high) = self.support();
        if z <= low {
            return 0.0;
        }
        if z >= high {
            return 1.0;
        }
        dispatch!(self, d => d.cdf(z))
    }

    /// Draws one value.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        dispatch!(self, d => d.sample(rng))
    }
}

/// A fully parameterised distribution: a [`Standard`] form shifted by `loc` and stretched by `scale`.
#[derive(Debug, Clone)]
pub struct LocScale {
    standard: Standard,
    loc: f64,
    scale: f64,
}

impl LocScale {
    /// Builds the distribution described by `params` for `family`.
    ///
    /// Returns `None` if the shape parameters are rejected, or if `loc` is not finite or `scale`
    /// is not a finite positive number.
    #[must_use]
    pub fn new(family: Family, params: &ParameterVector) -> Option<Self> {
        let (loc, scale) = (params.loc(), params.scale());
        if !loc.is_finite() || !scale.is_finite() || scale <= 0.0 {
            return None;
        }
        let standard = Standard::new(family, params.shape())?;
        Some(Self {
            standard,
            loc,
            scale,
        })
    }

    fn standardize(&self, x: f64) -> f64 {
        (x - self.loc) / self.scale
    }

    /// The density at `x`.
    ///
    /// Outside the support the density is exactly `0.0`. Inside the support a non-finite value
    /// (a pole at the edge of the support) is reported as `NaN`.
    #[must_use]
    pub fn density(&self, x: f64) -> f64 {
        let z = self.standardize(x);
        if !self.standard.contains(z) {
            return 0.0;
        }
        let value = self.standard.pdf(z) / self.scale;
        if value.is_finite() {
            value
        } else {
            f64::NAN
        }
    }

    /// The log-density at `x`; `-∞` outside the support.
    #[must_use]
    pub fn ln_density(&self, x: f64) -> f64 {
        let z = self.standardize(x);
        if !self.standard.contains(z) {
            return f64::NEG_INFINITY;
        }
        self.standard.ln_pdf(z) - self.scale.ln()
    }

    /// The cumulative distribution function at `x`.
    #[must_use]
    pub fn cdf(&self, x: f64) -> f64 {
        self.standard.cdf(self.standardize(x))
    }

    /// Draws one value.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.loc + self.scale * self.standard.sample(rng)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::SeedableRng;

    use super::*;

    fn located(family: Family, shape: &[f64], loc: f64, scale: f64) -> LocScale {
        let params = ParameterVector::new(family, shape.to_vec(), loc, scale).unwrap();
        LocScale::new(family, &params).unwrap()
    }

    #[test]
    fn every_family_builds_from_its_defaults() {
        for family in Family::ALL {
            let shape: Vec<f64> = family.slots().shape.iter().map(|s| s.default).collect();
            assert!(Standard::new(family, &shape).is_some(), "{family}");
        }
    }

    #[test]
    fn wrong_shape_count_is_rejected() {
        assert!(Standard::new(Family::Normal, &[1.0]).is_none());
        assert!(Standard::new(Family::Beta, &[1.0]).is_none());
        assert!(Standard::new(Family::Gamma, &[-1.0]).is_none());
    }

    #[test]
    fn normal_density_is_shifted_and_scaled() {
        let d = located(Family::Normal, &[], 2.0, 0.5);
        let peak = 1.0 / (2.0 * std::f64::consts::PI).sqrt() / 0.5;
        assert_relative_eq!(d.density(2.0), peak, epsilon = 1e-12);
        assert_relative_eq!(d.cdf(2.0), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn density_is_zero_outside_support() {
        let d = located(Family::Exponential, &[], 1.0, 2.0);
        assert_eq!(d.density(0.5), 0.0);
        assert_eq!(d.ln_density(0.5), f64::NEG_INFINITY);
        assert_relative_eq!(d.density(1.0), 0.5, epsilon = 1e-12);

        let p = located(Family::Pareto, &[2.0], 0.0, 1.0);
        assert_eq!(p.density(0.99), 0.0);
        assert!(p.density(1.5) > 0.0);
    }

    #[test]
    fn pole_is_reported_as_nan() {
        let d = located(Family::Gamma, &[0.5], 0.0, 1.0);
        assert!(d.density(0.0).is_nan());
        assert!(d.density(1.0).is_finite());
    }

    #[test]
    fn uniform_density_is_flat() {
        let d = located(Family::Uniform, &[], -1.0, 4.0);
        assert_relative_eq!(d.density(0.0), 0.25, epsilon = 1e-12);
        assert_relative_eq!(d.density(2.9), 0.25, epsilon = 1e-12);
        assert_eq!(d.density(3.5), 0.0);
    }

    #[test]
    fn samples_land_in_support() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let d = located(Family::Beta, &[2.0, 3.0], 1.0, 2.0);
        for _ in 0..1000 {
            let x = d.sample(&mut rng);
            assert!((1.0..=3.0).contains(&x));
        }
    }

    #[test]
    fn non_positive_scale_is_rejected() {
        let params = ParameterVector::new(Family::Normal, vec![], 0.0, 0.0).unwrap();
        assert!(LocScale::new(Family::Normal, &params).is_none());
    }
}
