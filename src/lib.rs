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

//! Fit a parametric probability distribution to a sample and draw its density.
//!
//! Distviz covers the computation behind an interactive distribution viewer: a sample is collected
//! from typed values or an uploaded table, one of eleven families is chosen from the [`catalog`],
//! its parameters are either fitted by maximum likelihood or read from sliders, and the density is
//! evaluated over a fixed grid of 400 points spanning `[-10, 10]`.
//!
//! # Examples
//!
//! Fitting a normal distribution to a handful of values:
//! ```
//! use distviz::catalog::Family;
//! use distviz::resolve::{resolve, Mode};
//! use distviz::source::ManualEntry;
//!
//! let mut entry = ManualEntry::new();
//! for text in ["1", "2", "2", "3", "3", "3", "4", "4", "5"] {
//!     entry.append(text).unwrap();
//! }
//!
//! let spec = Family::Normal.spec();
//! let resolved = resolve(&spec, Mode::Automatic(Some(entry.sample()))).unwrap();
//! // The maximum-likelihood estimates are the mean and the population standard deviation.
//! assert!((resolved.params.loc() - 3.0).abs() < 1e-9);
//! assert!((resolved.params.scale() - 1.1547).abs() < 1e-4);
//! ```
//!
//! Setting the parameters by hand and evaluating the curve:
//! ```
//! use distviz::catalog;
//! use distviz::density::evaluate;
//! use distviz::resolve::{resolve, Mode, Sliders, Slot};
//!
//! let spec = catalog::get("Gamma").unwrap();
//! let mut sliders = Sliders::defaults(&spec);
//! sliders.set(&spec, Slot::Shape(0), 3.0);
//!
//! let resolved = resolve(&spec, Mode::Manual(&sliders)).unwrap();
//! let curve = evaluate(&spec, &resolved.params);
//! assert_eq!(curve.len(), 400);
//! // Gamma has no mass left of its location.
//! assert!(curve.points.iter().filter(|(x, _)| *x < 0.0).all(|(_, y)| *y == 0.0));
//! ```
//!
//! The same flow, driven through a [`session::Session`] the way an interactive front end does:
//! ```
//! use distviz::catalog::Family;
//! use distviz::session::{Panel, Session};
//!
//! let mut session = Session::new();
//! session.select(Family::Laplace);
//! for text in ["-1.5", "0.2", "0.1", "2.0", "-0.3"] {
//!     session.add_value(text).unwrap();
//! }
//! match session.render().panel {
//!     Panel::Plot { title, .. } => assert_eq!(title, "Laplace Distribution"),
//!     Panel::ErrorDetected => unreachable!(),
//! }
//! ```
#![deny(clippy::pedantic)]
#![deny(missing_docs)]

pub mod catalog;
pub mod density;
pub mod error;
pub mod fitting;
pub mod gof;
pub mod minimize;
pub mod monte_carlo;
pub mod params;
pub mod render;
pub mod resolve;
pub mod session;
pub mod source;
pub mod standard;

pub use catalog::{DistributionSpec, Family};
pub use error::{LoadError, ParseError, ResolveError, UnknownDistribution};
pub use params::ParameterVector;
