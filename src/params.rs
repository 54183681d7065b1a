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

//! The resolved parameters of a distribution, kept in the order the density expects them.
use crate::catalog::Family;
use crate::error::ResolveError;

/// Shape parameters, location and scale of a distribution.
///
/// The length of [`ParameterVector::shape`] always equals the number of shape slots of the family
/// the vector was built for, so [`ParameterVector::to_vec`] always has `shape_count + 2` entries in
/// the order `(shape..., loc, scale)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterVector {
    shape: Vec<f64>,
    loc: f64,
    scale: f64,
}

impl ParameterVector {
    /// Assembles a parameter vector for `family`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MalformedFit`] if `shape` does not have one value per shape slot.
    pub fn new(family: Family, shape: Vec<f64>, loc: f64, scale: f64) -> Result<Self, ResolveError> {
        let expected = family.shape_count();
        if shape.len() != expected {
            return Err(ResolveError::MalformedFit {
                expected: expected + 2,
                got: shape.len() + 2,
            });
        }
        Ok(Self { shape, loc, scale })
    }

    /// Splits a fitted tuple `(shape..., loc, scale)` into its named parts.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MalformedFit`] if the tuple has fewer than two values or its length
    /// does not match the family.
    pub fn from_tuple(family: Family, values: &[f64]) -> Result<Self, ResolveError> {
        let expected = family.shape_count() + 2;
        match values {
            [shape @ .., loc, scale] if values.len() == expected => {
                Self::new(family, shape.to_vec(), *loc, *scale)
            }
            _ => Err(ResolveError::MalformedFit {
                expected,
                got: values.len(),
            }),
        }
    }

    /// Shape parameters in slot order.
    #[must_use]
    pub fn shape(&self) -> &[f64] {
        &self.shape
    }

    /// Location.
    #[must_use]
    pub fn loc(&self) -> f64 {
        self.loc
    }

    /// Scale.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Number of values, shape parameters included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shape.len() + 2
    }

    /// Always `false`: location and scale are always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The values in evaluation order `(shape..., loc, scale)`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        let mut values = self.shape.clone();
        values.push(self.loc);
        values.push(self.scale);
        values
    }
}
