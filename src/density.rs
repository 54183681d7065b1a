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

//! Evaluation of a resolved distribution's density over a fixed grid.
use crate::catalog::DistributionSpec;
use crate::params::ParameterVector;
use crate::standard::LocScale;

/// Evenly spaced evaluation points, both endpoints included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    /// Number of points.
    pub points: usize,
    /// First point.
    pub start: f64,
    /// Last point.
    pub end: f64,
}

impl Grid {
    /// The default value of `self.points`
    pub const DEFAULT_POINTS: usize = 400;
    /// The default value of `self.start`
    pub const DEFAULT_START: f64 = -10.0;
    /// The default value of `self.end`
    pub const DEFAULT_END: f64 = 10.0;

    /// The grid points in increasing order.
    #[must_use]
    pub fn xs(&self) -> Vec<f64> {
        match self.points {
            0 => Vec::new(),
            1 => vec![self.start],
            n => {
                #[allow(clippy::cast_precision_loss)]
                let step = (self.end - self.start) / (n - 1) as f64;
                #[allow(clippy::cast_precision_loss)]
                let mut xs: Vec<f64> = (0..n).map(|i| self.start + i as f64 * step).collect();
                xs[n - 1] = self.end;
                xs
            }
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            points: Self::DEFAULT_POINTS,
            start: Self::DEFAULT_START,
            end: Self::DEFAULT_END,
        }
    }
}

/// A density curve: `(x, density)` pairs in increasing `x`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Curve {
    /// The evaluated points.
    pub points: Vec<(f64, f64)>,
}

impl Curve {
    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the curve has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The point with the largest finite density, if any.
    #[must_use]
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .copied()
            .filter(|(_, y)| y.is_finite())
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Area under the curve by the trapezoidal rule, skipping segments with a `NaN` end.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (w[1].0 - w[0].0) * (w[0].1 + w[1].1) / 2.0)
            .filter(|a| a.is_finite())
            .sum()
    }
}

/// Evaluates the density over the default [`Grid`]: 400 points from -10 to 10.
#[must_use]
pub fn evaluate(spec: &DistributionSpec, params: &ParameterVector) -> Curve {
    evaluate_on(&Grid::default(), spec, params)
}

/// Evaluates the density at every point of `grid`.
///
/// Never fails: if the parameters do not describe a valid distribution every density is `NaN`.
#[must_use]
pub fn evaluate_on(grid: &Grid, spec: &DistributionSpec, params: &ParameterVector) -> Curve {
    let xs = grid.xs();
    let points = match LocScale::new(spec.family, params) {
        Some(distr) => xs.into_iter().map(|x| (x, distr.density(x))).collect(),
        None => {
            tracing::warn!(
                distribution = spec.name(),
                params = ?params.to_vec(),
                "parameters do not describe a valid distribution; plotting NaN"
            );
            xs.into_iter().map(|x| (x, f64::NAN)).collect()
        }
    };
    tracing::debug!(distribution = spec.name(), points = grid.points, "evaluated density");
    Curve { points }
}
