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

//! The state of one interactive session and the handlers of every user action.
//!
//! Every handler updates the state in place; [`Session::render`] then recomputes everything that
//! is shown from scratch. Nothing is cached between renders.
use std::io::Read;
use std::path::Path;

use crate::catalog::{DistributionSpec, Family};
use crate::density::{evaluate_on, Curve, Grid};
use crate::error::{LoadError, ParseError, ResolveError};
use crate::gof::{goodness_of_fit, GoodnessOfFit};
use crate::monte_carlo::MonteCarlo;
use crate::resolve::{resolve, Mode, Resolved, Sliders, Slot};
use crate::source::{self, ManualEntry, Sample};

/// Which data source is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Values typed in one by one.
    ManualEntry,
    /// The first column of an uploaded table.
    Upload,
}

/// A message shown next to the panels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Something worth pointing out that does not stop the curve from being drawn.
    Warning(String),
    /// The curve could not be drawn.
    Error(String),
}

/// The right-hand panel.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    /// A density curve.
    Plot {
        /// `"<name> Distribution"`
        title: String,
        /// The parameters the curve was drawn with.
        params: Vec<f64>,
        /// The evaluated density.
        curve: Curve,
    },
    /// Nothing to draw.
    ErrorDetected,
}

/// Everything shown after an interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    /// The active source.
    pub input: InputMode,
    /// The active sample, if there is one.
    pub sample: Option<Sample>,
    /// Warnings and errors raised while rendering.
    pub notices: Vec<Notice>,
    /// The plot, or the error panel.
    pub panel: Panel,
}

/// The session state: data, selected distribution, mode and slider positions.
#[derive(Debug, Clone)]
pub struct Session {
    input: InputMode,
    entry: ManualEntry,
    upload: Option<Sample>,
    spec: DistributionSpec,
    manual: bool,
    sliders: Sliders,
    /// Points at which the density is evaluated.
    pub grid: Grid,
    /// Bootstrap datasets simulated by [`Session::goodness_of_fit`].
    pub gof_iterations: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A fresh session: manual entry with no values, Normal distribution, automatic fitting.
    #[must_use]
    pub fn new() -> Self {
        let spec = Family::Normal.spec();
        Self {
            input: InputMode::ManualEntry,
            entry: ManualEntry::new(),
            upload: None,
            spec,
            manual: false,
            sliders: Sliders::defaults(&spec),
            grid: Grid::default(),
            gof_iterations: MonteCarlo::<()>::DEFAULT_ITERATIONS,
        }
    }

    /// The active source.
    #[must_use]
    pub fn input_mode(&self) -> InputMode {
        self.input
    }

    /// Switches the active source. Manually entered values are kept.
    pub fn set_input_mode(&mut self, input: InputMode) {
        self.input = input;
    }

    /// Parses `text` and appends it to the manually entered values.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if `text` is not a number; the values are unchanged then.
    pub fn add_value(&mut self, text: &str) -> Result<f64, ParseError> {
        self.entry.append(text)
    }

    /// Replaces the uploaded sample with the first column of the table at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the table cannot be loaded; the uploaded sample is cleared then.
    pub fn upload(&mut self, path: impl AsRef<Path>) -> Result<usize, LoadError> {
        self.store_upload(source::load(path))
    }

    /// Like [`Session::upload`], reading the table from `reader`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the table cannot be loaded; the uploaded sample is cleared then.
    pub fn upload_reader(&mut self, reader: impl Read) -> Result<usize, LoadError> {
        self.store_upload(source::load_reader(reader))
    }

    fn store_upload(&mut self, loaded: Result<Sample, LoadError>) -> Result<usize, LoadError> {
        self.upload = None;
        let sample = loaded?;
        let len = sample.len();
        self.upload = Some(sample);
        Ok(len)
    }

    /// The sample of the active source, if there is one.
    #[must_use]
    pub fn active_sample(&self) -> Option<&Sample> {
        match self.input {
            InputMode::ManualEntry => Some(self.entry.sample()),
            InputMode::Upload => self.upload.as_ref(),
        }
    }

    /// The selected distribution.
    #[must_use]
    pub fn spec(&self) -> DistributionSpec {
        self.spec
    }

    /// Selects a distribution. The sliders return to its defaults.
    pub fn select(&mut self, family: Family) {
        self.spec = family.spec();
        self.sliders = Sliders::defaults(&self.spec);
    }

    /// Whether parameters come from the sliders rather than from a fit.
    #[must_use]
    pub fn is_manual(&self) -> bool {
        self.manual
    }

    /// Toggles manual calibration.
    pub fn set_manual(&mut self, manual: bool) {
        self.manual = manual;
    }

    /// Current slider positions.
    #[must_use]
    pub fn sliders(&self) -> &Sliders {
        &self.sliders
    }

    /// Moves a slider of the selected distribution. Returns the clamped value, or `None` if the
    /// distribution has no such slot.
    pub fn set_slider(&mut self, slot: Slot, value: f64) -> Option<f64> {
        self.sliders.set(&self.spec, slot, value)
    }

    /// Resolves the parameters for the current state.
    ///
    /// # Errors
    ///
    /// See [`resolve`].
    pub fn resolve(&self) -> Result<Resolved, ResolveError> {
        let mode = if self.manual {
            Mode::Manual(&self.sliders)
        } else {
            Mode::Automatic(self.active_sample())
        };
        resolve(&self.spec, mode)
    }

    /// Recomputes everything that is shown.
    #[must_use]
    pub fn render(&self) -> View {
        let mut notices = Vec::new();
        let panel = self.panel(self.resolve(), &mut notices);
        View {
            input: self.input,
            sample: self.active_sample().cloned(),
            notices,
            panel,
        }
    }

    fn panel(
        &self,
        resolved: Result<Resolved, ResolveError>,
        notices: &mut Vec<Notice>,
    ) -> Panel {
        match resolved {
            Ok(resolved) if resolved.displayable => Panel::Plot {
                title: format!("{} Distribution", self.spec.name()),
                params: resolved.params.to_vec(),
                curve: evaluate_on(&self.grid, &self.spec, &resolved.params),
            },
            Ok(resolved) => {
                notices.push(Notice::Error(format!(
                    "{:?} do not describe a valid {} distribution",
                    resolved.params.to_vec(),
                    self.spec.name()
                )));
                Panel::ErrorDetected
            }
            Err(ResolveError::NoData) => {
                let message = match self.input {
                    InputMode::Upload if self.upload.is_none() => {
                        "Please upload data for automatic fitting."
                    }
                    _ => "Please upload valid numeric data for automatic fitting.",
                };
                notices.push(Notice::Warning(message.to_owned()));
                Panel::ErrorDetected
            }
            Err(err) => {
                tracing::warn!(error = %err, "render failed");
                notices.push(Notice::Error(err.to_string()));
                Panel::ErrorDetected
            }
        }
    }

    /// Measures how well the current parameters describe the active sample.
    ///
    /// # Errors
    ///
    /// [`ResolveError::NoData`] if there is no sample, otherwise whatever [`Session::resolve`]
    /// reports.
    pub fn goodness_of_fit(&self, seed: u64) -> Result<GoodnessOfFit, ResolveError> {
        let sample = self
            .active_sample()
            .filter(|s| !s.is_empty())
            .ok_or(ResolveError::NoData)?;
        let resolved = self.resolve()?;
        goodness_of_fit(
            self.spec.family,
            &resolved.params,
            sample.values(),
            !self.manual,
            self.gof_iterations,
            seed,
        )
    }
}
