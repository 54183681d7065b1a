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

//! The fixed table of supported distribution families and the slider bounds of their parameters.
//!
//! The table is built at compile time and never changes. Selecting a family is done through the
//! closed [`Family`] enum; [`get`] only exists to turn a user-facing name into a [`Family`].
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownDistribution;

/// One of the eleven supported parametric families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Normal (Gaussian) distribution.
    Normal,
    /// Gamma distribution with shape `k`.
    Gamma,
    /// Weibull (minimum) distribution with shape `k`.
    Weibull,
    /// Exponential distribution.
    Exponential,
    /// Log-normal distribution with shape `σ`.
    Lognormal,
    /// Beta distribution with shapes `a` and `b`.
    Beta,
    /// Continuous uniform distribution.
    Uniform,
    /// Triangular distribution with the mode at fraction `c` of the support.
    Triangular,
    /// Chi-squared distribution with the given degrees of freedom.
    ChiSquare,
    /// Pareto distribution with shape `b`.
    Pareto,
    /// Laplace (double exponential) distribution.
    Laplace,
}

/// Bounds and default of a single parameter slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderSpec {
    /// Label shown next to the slider.
    pub label: &'static str,
    /// Smallest selectable value.
    pub min: f64,
    /// Largest selectable value.
    pub max: f64,
    /// Initial value.
    pub default: f64,
}

impl SliderSpec {
    const fn new(label: &'static str, min: f64, max: f64, default: f64) -> Self {
        Self {
            label,
            min,
            max,
            default,
        }
    }

    /// Returns `value` moved into `[self.min, self.max]`. `NaN` becomes the default.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }
}

/// The parameter slots of a family: shape parameters first, then location and scale.
#[derive(Debug, PartialEq)]
pub struct ParamSlots {
    /// Shape parameters in the order the density expects them.
    pub shape: &'static [SliderSpec],
    /// Location parameter.
    pub loc: SliderSpec,
    /// Scale parameter.
    pub scale: SliderSpec,
}

const LOC: SliderSpec = SliderSpec::new("loc", -5.0, 5.0, 0.0);
const SCALE: SliderSpec = SliderSpec::new("scale", 0.1, 5.0, 1.0);

static NORMAL: ParamSlots = ParamSlots {
    shape: &[],
    loc: SliderSpec::new("Mean (μ)", -10.0, 10.0, 0.0),
    scale: SliderSpec::new("Std Dev (σ)", 0.1, 5.0, 1.0),
};

static GAMMA: ParamSlots = ParamSlots {
    shape: &[SliderSpec::new("Shape (k)", 0.1, 10.0, 2.0)],
    loc: LOC,
    scale: SliderSpec::new("Scale (θ)", 0.1, 5.0, 1.0),
};

static WEIBULL: ParamSlots = ParamSlots {
    shape: &[SliderSpec::new("Shape (k)", 0.1, 5.0, 1.5)],
    loc: LOC,
    scale: SliderSpec::new("Scale (λ)", 0.1, 5.0, 1.0),
};

static EXPONENTIAL: ParamSlots = ParamSlots {
    shape: &[],
    loc: LOC,
    scale: SliderSpec::new("Scale", 0.1, 5.0, 1.0),
};

static LOGNORMAL: ParamSlots = ParamSlots {
    shape: &[SliderSpec::new("Shape (σ)", 0.1, 2.0, 0.5)],
    loc: LOC,
    scale: SliderSpec::new("Scale", 0.1, 5.0, 1.0),
};

static BETA: ParamSlots = ParamSlots {
    shape: &[
        SliderSpec::new("Alpha (a)", 0.1, 5.0, 2.0),
        SliderSpec::new("Beta (b)", 0.1, 5.0, 2.0),
    ],
    loc: SliderSpec::new("loc", -2.0, 2.0, 0.0),
    scale: SCALE,
};

static UNIFORM: ParamSlots = ParamSlots {
    shape: &[],
    loc: LOC,
    scale: SliderSpec::new("Width", 0.1, 10.0, 5.0),
};

static TRIANGULAR: ParamSlots = ParamSlots {
    shape: &[SliderSpec::new("Shape (c) 0→1", 0.0, 1.0, 0.5)],
    loc: LOC,
    scale: SliderSpec::new("scale", 0.1, 10.0, 5.0),
};

static CHI_SQUARE: ParamSlots = ParamSlots {
    shape: &[SliderSpec::new("Degrees of Freedom", 1.0, 10.0, 3.0)],
    loc: LOC,
    scale: SCALE,
};

static PARETO: ParamSlots = ParamSlots {
    shape: &[SliderSpec::new("Shape (b)", 0.5, 5.0, 2.5)],
    loc: LOC,
    scale: SCALE,
};

static LAPLACE: ParamSlots = ParamSlots {
    shape: &[],
    loc: SliderSpec::new("Mean", -5.0, 5.0, 0.0),
    scale: SliderSpec::new("Diversity (b)", 0.1, 5.0, 1.0),
};

impl Family {
    /// Every supported family, in the order they are offered to the user.
    pub const ALL: [Family; 11] = [
        Family::Normal,
        Family::Gamma,
        Family::Weibull,
        Family::Exponential,
        Family::Lognormal,
        Family::Beta,
        Family::Uniform,
        Family::Triangular,
        Family::ChiSquare,
        Family::Pareto,
        Family::Laplace,
    ];

    /// The user-facing name of the family.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Family::Normal => "Normal",
            Family::Gamma => "Gamma",
            Family::Weibull => "Weibull",
            Family::Exponential => "Exponential",
            Family::Lognormal => "Lognormal",
            Family::Beta => "Beta",
            Family::Uniform => "Uniform",
            Family::Triangular => "Triangular",
            Family::ChiSquare => "Chi-Square",
            Family::Pareto => "Pareto",
            Family::Laplace => "Laplace",
        }
    }

    /// The parameter slots of the family.
    #[must_use]
    pub fn slots(self) -> &'static ParamSlots {
        match self {
            Family::Normal => &NORMAL,
            Family::Gamma => &GAMMA,
            Family::Weibull => &WEIBULL,
            Family::Exponential => &EXPONENTIAL,
            Family::Lognormal => &LOGNORMAL,
            Family::Beta => &BETA,
            Family::Uniform => &UNIFORM,
            Family::Triangular => &TRIANGULAR,
            Family::ChiSquare => &CHI_SQUARE,
            Family::Pareto => &PARETO,
            Family::Laplace => &LAPLACE,
        }
    }

    /// Number of shape parameters.
    #[must_use]
    pub fn shape_count(self) -> usize {
        self.slots().shape.len()
    }

    /// The catalog entry of the family.
    #[must_use]
    pub fn spec(self) -> DistributionSpec {
        DistributionSpec {
            family: self,
            slots: self.slots(),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Family {
    type Err = UnknownDistribution;

    /// Accepts the display names case-insensitively, ignoring spaces, dashes and underscores.
    /// `chi2` is accepted for [`Family::ChiSquare`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let family = match key.as_str() {
            "normal" => Family::Normal,
            "gamma" => Family::Gamma,
            "weibull" => Family::Weibull,
            "exponential" => Family::Exponential,
            "lognormal" => Family::Lognormal,
            "beta" => Family::Beta,
            "uniform" => Family::Uniform,
            "triangular" => Family::Triangular,
            "chisquare" | "chisquared" | "chi2" => Family::ChiSquare,
            "pareto" => Family::Pareto,
            "laplace" => Family::Laplace,
            _ => return Err(UnknownDistribution(s.to_owned())),
        };
        Ok(family)
    }
}

/// A catalog entry: the family together with the description of its parameter slots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistributionSpec {
    /// The family providing the fit and the density.
    pub family: Family,
    /// Slider descriptors of the parameters.
    pub slots: &'static ParamSlots,
}

impl DistributionSpec {
    /// The user-facing name of the distribution.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.family.name()
    }

    /// Number of shape parameters.
    #[must_use]
    pub fn shape_count(&self) -> usize {
        self.slots.shape.len()
    }

    /// Length of a full parameter vector: shape parameters plus location and scale.
    #[must_use]
    pub fn param_count(&self) -> usize {
        self.shape_count() + 2
    }
}

/// Looks up a distribution by its user-facing name.
///
/// # Errors
///
/// Returns [`UnknownDistribution`] if `name` is not one of the supported families.
pub fn get(name: &str) -> Result<DistributionSpec, UnknownDistribution> {
    name.parse::<Family>().map(Family::spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_counts_match_table() {
        let expected = [
            ("Normal", 0),
            ("Gamma", 1),
            ("Weibull", 1),
            ("Exponential", 0),
            ("Lognormal", 1),
            ("Beta", 2),
            ("Uniform", 0),
            ("Triangular", 1),
            ("Chi-Square", 1),
            ("Pareto", 1),
            ("Laplace", 0),
        ];
        for (name, count) in expected {
            let spec = get(name).unwrap();
            assert_eq!(spec.shape_count(), count, "{name}");
            assert_eq!(spec.param_count(), count + 2, "{name}");
        }
    }

    #[test]
    fn names_round_trip() {
        for family in Family::ALL {
            assert_eq!(family.name().parse::<Family>().unwrap(), family);
            assert_eq!(get(&family.to_string()).unwrap().family, family);
        }
    }

    #[test]
    fn lookup_is_lenient_about_spelling() {
        assert_eq!(get("chi2").unwrap().family, Family::ChiSquare);
        assert_eq!(get("chi square").unwrap().family, Family::ChiSquare);
        assert_eq!(get("LOGNORMAL").unwrap().family, Family::Lognormal);
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert_eq!(
            get("Cauchy").unwrap_err(),
            UnknownDistribution("Cauchy".to_owned())
        );
    }

    #[test]
    fn beta_has_two_bounded_shapes() {
        let slots = Family::Beta.slots();
        assert_eq!(slots.shape[0].label, "Alpha (a)");
        assert_eq!(slots.shape[1].label, "Beta (b)");
        for slot in slots.shape {
            assert_eq!((slot.min, slot.max), (0.1, 5.0));
        }
    }

    #[test]
    fn defaults_lie_within_bounds() {
        for family in Family::ALL {
            let slots = family.slots();
            for slot in slots.shape.iter().chain([&slots.loc, &slots.scale]) {
                assert!(slot.min <= slot.default && slot.default <= slot.max);
                assert!(slot.min < slot.max);
            }
            assert!(slots.scale.min > 0.0);
        }
    }

    #[test]
    fn clamp_respects_bounds() {
        let scale = Family::Normal.slots().scale;
        assert_eq!(scale.clamp(-1.0), 0.1);
        assert_eq!(scale.clamp(9.0), 5.0);
        assert_eq!(scale.clamp(2.5), 2.5);
        assert_eq!(scale.clamp(f64::NAN), 1.0);
    }
}
