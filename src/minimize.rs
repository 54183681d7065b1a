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

//! Derivative-free minimisation with the Nelder–Mead simplex method.
//!
//! Used by the likelihood fits of the families whose maximum-likelihood estimates have no closed
//! form. The objective may return `+∞` (or `NaN`, treated the same way) for infeasible points, as
//! long as the starting point is feasible.
use std::cmp::Ordering;

/// Settings of the simplex search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NelderMead {
    /// Upper bound on the number of iterations.
    pub max_iterations: usize,
    /// The search stops once every vertex is within this distance of the best one, coordinate-wise...
    pub xatol: f64,
    /// ...and every objective value is within this distance of the best one.
    pub fatol: f64,
}

/// The best point found by [`NelderMead::minimize`].
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    /// Location of the minimum.
    pub point: Vec<f64>,
    /// Objective value at [`Minimum::point`].
    pub value: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the tolerances were met before the iteration limit.
    pub converged: bool,
}

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

struct Vertex {
    point: Vec<f64>,
    value: f64,
}

/// `base + coef * (base - other)`
fn extrapolate(base: &[f64], other: &[f64], coef: f64) -> Vec<f64> {
    base.iter()
        .zip(other)
        .map(|(b, o)| b + coef * (b - o))
        .collect()
}

impl NelderMead {
    /// The default tolerance on both the simplex size and the objective spread.
    pub const DEFAULT_TOLERANCE: f64 = 1e-8;
    /// Iterations allowed per dimension by [`NelderMead::for_dimension`].
    pub const ITERATIONS_PER_DIMENSION: usize = 200;

    /// The default settings for a search in `dim` dimensions.
    #[must_use]
    pub fn for_dimension(dim: usize) -> Self {
        Self {
            max_iterations: Self::ITERATIONS_PER_DIMENSION * dim.max(1),
            xatol: Self::DEFAULT_TOLERANCE,
            fatol: Self::DEFAULT_TOLERANCE,
        }
    }

    /// Minimises `objective` starting from `start`.
    pub fn minimize<F>(&self, mut objective: F, start: &[f64]) -> Minimum
    where
        F: FnMut(&[f64]) -> f64,
    {
        let mut eval = |point: &[f64]| {
            let value = objective(point);
            if value.is_nan() {
                f64::INFINITY
            } else {
                value
            }
        };

        let n = start.len();
        let mut simplex: Vec<Vertex> = Vec::with_capacity(n + 1);
        simplex.push(Vertex {
            point: start.to_vec(),
            value: eval(start),
        });
        for i in 0..n {
            let mut point = start.to_vec();
            point[i] = if point[i].abs() < f64::EPSILON {
                0.000_25
            } else {
                point[i] * 1.05
            };
            let value = eval(&point);
            simplex.push(Vertex { point, value });
        }

        let mut iterations = 0;
        let mut converged = n == 0;
        while !converged && iterations < self.max_iterations {
            simplex.sort_by(|a, b| a.value.total_cmp(&b.value));
            if self.has_converged(&simplex) {
                converged = true;
                break;
            }
            iterations += 1;

            #[allow(clippy::cast_precision_loss)]
            let centroid: Vec<f64> = (0..n)
                .map(|j| simplex[..n].iter().map(|v| v.point[j]).sum::<f64>() / n as f64)
                .collect();
            let best = simplex[0].value;
            let second_worst = simplex[n - 1].value;
            let worst = simplex[n].value;

            let reflected = extrapolate(&centroid, &simplex[n].point, REFLECTION);
            let reflected_value = eval(&reflected);

            if reflected_value < best {
                let expanded = extrapolate(&centroid, &simplex[n].point, EXPANSION);
                let expanded_value = eval(&expanded);
                simplex[n] = if expanded_value < reflected_value {
                    Vertex {
                        point: expanded,
                        value: expanded_value,
                    }
                } else {
                    Vertex {
                        point: reflected,
                        value: reflected_value,
                    }
                };
                continue;
            }
            if reflected_value < second_worst {
                simplex[n] = Vertex {
                    point: reflected,
                    value: reflected_value,
                };
                continue;
            }

            let contracted = if reflected_value < worst {
                // outside contraction
                extrapolate(&centroid, &simplex[n].point, CONTRACTION * REFLECTION)
            } else {
                extrapolate(&centroid, &simplex[n].point, -CONTRACTION)
            };
            let contracted_value = eval(&contracted);
            if contracted_value < reflected_value.min(worst) {
                simplex[n] = Vertex {
                    point: contracted,
                    value: contracted_value,
                };
                continue;
            }

            let anchor = simplex[0].point.clone();
            for vertex in &mut simplex[1..] {
                vertex.point = extrapolate(&anchor, &vertex.point, -SHRINK);
                vertex.value = eval(&vertex.point);
            }
        }

        let best = simplex
            .into_iter()
            .min_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal))
            .map_or_else(
                || (start.to_vec(), f64::INFINITY),
                |v| (v.point, v.value),
            );
        Minimum {
            point: best.0,
            value: best.1,
            iterations,
            converged,
        }
    }

    /// `simplex` must be sorted by value.
    fn has_converged(&self, simplex: &[Vertex]) -> bool {
        let best = &simplex[0];
        if !best.value.is_finite() {
            // Nothing feasible to improve on.
            return simplex.iter().all(|v| v.value.is_infinite());
        }
        let value_spread = simplex
            .iter()
            .map(|v| (v.value - best.value).abs())
            .fold(0.0, f64::max);
        let point_spread = simplex
            .iter()
            .flat_map(|v| v.point.iter().zip(&best.point).map(|(a, b)| (a - b).abs()))
            .fold(0.0, f64::max);
        value_spread <= self.fatol && point_spread <= self.xatol
    }
}
