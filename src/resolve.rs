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

//! Turning either slider positions or a data sample into concrete distribution parameters.
use crate::catalog::DistributionSpec;
use crate::error::ResolveError;
use crate::params::ParameterVector;
use crate::source::Sample;
use crate::standard::LocScale;

/// Identifies one parameter slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The shape parameter with this zero-based index.
    Shape(usize),
    /// Location.
    Loc,
    /// Scale.
    Scale,
}

/// Current slider positions for one distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct Sliders {
    shape: Vec<f64>,
    loc: f64,
    scale: f64,
}

impl Sliders {
    /// Every slider at its default position.
    #[must_use]
    pub fn defaults(spec: &DistributionSpec) -> Self {
        Self {
            shape: spec.slots.shape.iter().map(|s| s.default).collect(),
            loc: spec.slots.loc.default,
            scale: spec.slots.scale.default,
        }
    }

    /// Moves a slider, clamping `value` into its bounds. Returns the value actually set, or `None`
    /// if `spec` has no such slot.
    pub fn set(&mut self, spec: &DistributionSpec, slot: Slot, value: f64) -> Option<f64> {
        let (target, bounds) = match slot {
            Slot::Shape(i) => (self.shape.get_mut(i)?, spec.slots.shape.get(i)?),
            Slot::Loc => (&mut self.loc, &spec.slots.loc),
            Slot::Scale => (&mut self.scale, &spec.slots.scale),
        };
        *target = bounds.clamp(value);
        Some(*target)
    }

    /// The position of a slider.
    #[must_use]
    pub fn get(&self, slot: Slot) -> Option<f64> {
        match slot {
            Slot::Shape(i) => self.shape.get(i).copied(),
            Slot::Loc => Some(self.loc),
            Slot::Scale => Some(self.scale),
        }
    }
}

/// How the parameters are obtained.
#[derive(Debug, Clone, Copy)]
pub enum Mode<'a> {
    /// Read from the sliders.
    Manual(&'a Sliders),
    /// Fitted to the sample, if there is one.
    Automatic(Option<&'a Sample>),
}

/// Resolved parameters and whether a curve should be drawn for them.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// The parameters in evaluation order.
    pub params: ParameterVector,
    /// Whether the curve should be shown: the parameters describe a valid distribution.
    pub displayable: bool,
}

impl Resolved {
    /// Wraps `params` of `spec`, marking them displayable if they build a distribution.
    #[must_use]
    pub fn new(spec: &DistributionSpec, params: ParameterVector) -> Self {
        let displayable = LocScale::new(spec.family, &params).is_some();
        if !displayable {
            tracing::warn!(
                distribution = spec.name(),
                params = ?params.to_vec(),
                "parameters are not displayable"
            );
        }
        Self {
            params,
            displayable,
        }
    }
}

/// Produces the parameter vector of `spec` from the sliders or from a fit to the sample.
///
/// Manual resolution always succeeds: every slider is clamped into the bounds of `spec`, and
/// missing shape sliders take their default.
///
/// # Errors
///
/// In [`Mode::Automatic`]:
/// - [`ResolveError::NoData`] if there is no sample or it is empty.
/// - [`ResolveError::MalformedFit`] if the fit does not return one value per slot.
/// - [`ResolveError::FitFailed`] if no usable parameters fit the sample.
pub fn resolve(spec: &DistributionSpec, mode: Mode<'_>) -> Result<Resolved, ResolveError> {
    let params = match mode {
        Mode::Manual(sliders) => {
            let slots = spec.slots;
            let shape = slots
                .shape
                .iter()
                .enumerate()
                .map(|(i, s)| s.clamp(sliders.shape.get(i).copied().unwrap_or(s.default)))
                .collect();
            ParameterVector::new(
                spec.family,
                shape,
                slots.loc.clamp(sliders.loc),
                slots.scale.clamp(sliders.scale),
            )?
        }
        Mode::Automatic(sample) => {
            let sample = sample.filter(|s| !s.is_empty()).ok_or_else(|| {
                tracing::warn!(distribution = spec.name(), "no data for automatic fitting");
                ResolveError::NoData
            })?;
            let fitted = spec.family.fit(sample.values())?;
            ParameterVector::from_tuple(spec.family, &fitted)?
        }
    };
    Ok(Resolved::new(spec, params))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::catalog::{Family, SliderSpec};
    use crate::source::ManualEntry;

    #[test]
    fn manual_mode_uses_slider_values() {
        let spec = Family::Beta.spec();
        let mut sliders = Sliders::defaults(&spec);
        sliders.set(&spec, Slot::Shape(1), 3.5);
        sliders.set(&spec, Slot::Loc, -1.0);
        let resolved = resolve(&spec, Mode::Manual(&sliders)).unwrap();
        assert!(resolved.displayable);
        assert_eq!(resolved.params.to_vec(), vec![2.0, 3.5, -1.0, 1.0]);
    }

    #[test]
    fn manual_mode_is_idempotent() {
        let spec = Family::Weibull.spec();
        let sliders = Sliders::defaults(&spec);
        assert_eq!(
            resolve(&spec, Mode::Manual(&sliders)),
            resolve(&spec, Mode::Manual(&sliders))
        );
    }

    #[test]
    fn sliders_are_clamped() {
        let spec = Family::Normal.spec();
        let mut sliders = Sliders::defaults(&spec);
        assert_eq!(sliders.set(&spec, Slot::Scale, 0.0), Some(0.1));
        assert_eq!(sliders.set(&spec, Slot::Loc, 50.0), Some(10.0));
        assert_eq!(sliders.set(&spec, Slot::Shape(0), 1.0), None);
        assert_eq!(sliders.get(Slot::Scale), Some(0.1));
    }

    #[test]
    fn sliders_of_another_family_are_adapted() {
        let normal = Family::Normal.spec();
        let gamma = Family::Gamma.spec();
        let mut sliders = Sliders::defaults(&normal);
        sliders.set(&normal, Slot::Loc, -8.0);
        let resolved = resolve(&gamma, Mode::Manual(&sliders)).unwrap();
        assert_eq!(resolved.params.to_vec(), vec![2.0, -5.0, 1.0]);
    }

    #[test]
    fn automatic_mode_without_data() {
        let spec = Family::Gamma.spec();
        assert_eq!(
            resolve(&spec, Mode::Automatic(None)),
            Err(ResolveError::NoData)
        );
        let empty = ManualEntry::new();
        assert_eq!(
            resolve(&spec, Mode::Automatic(Some(empty.sample()))),
            Err(ResolveError::NoData)
        );
    }

    #[test]
    fn invalid_parameters_are_not_displayable() {
        let spec = Family::Normal.spec();
        let zero_scale = ParameterVector::new(Family::Normal, vec![], 0.0, 0.0).unwrap();
        assert!(!Resolved::new(&spec, zero_scale).displayable);

        let spec = Family::Gamma.spec();
        let negative_shape = ParameterVector::new(Family::Gamma, vec![-1.0], 0.0, 1.0).unwrap();
        assert!(!Resolved::new(&spec, negative_shape).displayable);

        let valid = ParameterVector::new(Family::Gamma, vec![2.0], 0.0, 1.0).unwrap();
        assert!(Resolved::new(&spec, valid).displayable);
    }

    #[test]
    fn slider_extremes_stay_displayable() {
        for family in Family::ALL {
            let spec = family.spec();
            let slots = spec.slots;
            let picks: [fn(&SliderSpec) -> f64; 2] = [|s| s.min, |s| s.max];
            for pick in picks {
                let sliders = Sliders {
                    shape: slots.shape.iter().map(pick).collect(),
                    loc: pick(&slots.loc),
                    scale: pick(&slots.scale),
                };
                let resolved = resolve(&spec, Mode::Manual(&sliders)).unwrap();
                assert!(resolved.displayable, "{family}");
            }
        }
    }

    #[test]
    fn automatic_normal_fit() {
        let mut entry = ManualEntry::new();
        for text in ["1", "2", "2", "3", "3", "3", "4", "4", "5"] {
            entry.append(text).unwrap();
        }
        let spec = Family::Normal.spec();
        let resolved = resolve(&spec, Mode::Automatic(Some(entry.sample()))).unwrap();
        assert!(resolved.displayable);
        assert!(resolved.params.shape().is_empty());
        assert_relative_eq!(resolved.params.loc(), 3.0, epsilon = 1e-10);
        assert_relative_eq!(resolved.params.scale(), 1.154_700_538, epsilon = 1e-8);
    }
}
