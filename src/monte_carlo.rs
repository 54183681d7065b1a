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

//! Contains the [`MonteCarlo`] struct and the [`Replicate`] trait it drives.
//!

use rand::SeedableRng;

/// One simulated dataset and the statistic computed from it.
pub trait Replicate {
    /// Replaces the dataset with a freshly simulated one.
    fn generate(&mut self, rng: &mut impl rand::Rng);

    /// Computes the statistic of the current dataset. `NaN` marks a replicate that could not be
    /// evaluated; such replicates are left out of the results.
    fn evaluate(&self) -> f64;
}

/// A struct to keep track of the fraction of the values at least as large as the observed one.
struct TailRatio {
    /// Number of values not smaller than the observed one
    above: usize,
    /// Number of values counted
    total: usize,
}

impl TailRatio {
    /// Returns the initial `TailRatio`
    fn new() -> TailRatio {
        TailRatio { above: 0, total: 0 }
    }

    /// Counts `statistic`; `NaN` is skipped.
    fn update(&mut self, statistic: f64, observed: f64) {
        if statistic.is_nan() {
            return;
        }
        if statistic >= observed {
            self.above += 1;
        }
        self.total += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    /// Gives the ratio so far, `None` if nothing was counted.
    fn ratio(&self) -> Option<f64> {
        (self.total > 0).then(|| self.above as f64 / self.total as f64)
    }
}

/// The state of a Monte-Carlo simulation.
///
/// [`MonteCarlo<R>`] repeatedly calls [`Replicate::generate`] and [`Replicate::evaluate`] on `R`
/// and summarises the statistics returned by [`Replicate::evaluate`].
pub struct MonteCarlo<R> {
    /// Number of iterations of the Monte-Carlo simulation.
    pub iterations: usize,
    replicate: R,
    /// The random generator used by `replicate.generate`
    rng: rand::rngs::StdRng,
}

impl<R: Replicate> MonteCarlo<R> {
    /// Returns the statistic calculated from one iteration of a Monte-Carlo simulation.
    fn simulate_iteration(&mut self) -> f64 {
        self.replicate.generate(&mut self.rng);
        self.replicate.evaluate()
    }

    /// Runs the simulation and returns the fraction of evaluated iterations whose statistic is at
    /// least `observed`, i.e. the upper-tail p-value of `observed`.
    ///
    /// Returns `None` if no iteration produced a statistic.
    pub fn simulate_pvalue(mut self, observed: f64) -> Option<f64> {
        let mut ratio = TailRatio::new();
        for _ in 0..self.iterations {
            let statistic = self.simulate_iteration();
            ratio.update(statistic, observed);
        }
        ratio.ratio()
    }
}

impl<R> MonteCarlo<R> {
    /// The default value of `self.iterations`
    pub const DEFAULT_ITERATIONS: usize = 1_000;

    /// Constructs a reproducible simulation of `replicate`.
    pub fn with_seed(replicate: R, seed: u64) -> Self {
        Self {
            iterations: Self::DEFAULT_ITERATIONS,
            replicate,
            rng: rand::rngs::StdRng::seed_from_u64(seed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A uniform draw from `[0, 1)`.
    struct Unit(f64);

    impl Replicate for Unit {
        fn generate(&mut self, rng: &mut impl rand::Rng) {
            self.0 = rng.gen();
        }

        fn evaluate(&self) -> f64 {
            self.0
        }
    }

    /// Every other replicate fails.
    struct Flaky(u32);

    impl Replicate for Flaky {
        fn generate(&mut self, _rng: &mut impl rand::Rng) {
            self.0 += 1;
        }

        fn evaluate(&self) -> f64 {
            if self.0 % 2 == 0 {
                f64::NAN
            } else {
                1.0
            }
        }
    }

    #[test]
    fn uniform_tail_probability() {
        let mut simulation = MonteCarlo::with_seed(Unit(0.0), 42);
        simulation.iterations = 10_000;
        let pvalue = simulation.simulate_pvalue(0.75).unwrap();
        assert!((pvalue - 0.25).abs() < 0.03, "{pvalue}");
    }

    #[test]
    fn same_seed_same_result() {
        let run = || MonteCarlo::with_seed(Unit(0.0), 7).simulate_pvalue(0.5);
        assert_eq!(run(), run());
    }

    #[test]
    fn failed_replicates_are_skipped() {
        let mut simulation = MonteCarlo::with_seed(Flaky(0), 1);
        simulation.iterations = 10;
        assert_eq!(simulation.simulate_pvalue(0.5), Some(1.0));
    }

    #[test]
    fn no_iterations_no_pvalue() {
        let mut simulation = MonteCarlo::with_seed(Unit(0.0), 1);
        simulation.iterations = 0;
        assert_eq!(simulation.simulate_pvalue(0.5), None);
    }
}
