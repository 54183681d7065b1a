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

//! Sources of the data sample: values typed in one at a time, or the first column of an uploaded
//! table.
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{LoadError, ParseError};

/// Where a sample came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Entered value by value.
    Manual,
    /// Read from an uploaded table.
    Upload,
}

/// An ordered sequence of observations tagged with its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    values: Vec<f64>,
    origin: Origin,
}

impl Sample {
    /// An empty manually entered sample.
    #[must_use]
    pub fn manual() -> Self {
        Self {
            values: Vec::new(),
            origin: Origin::Manual,
        }
    }

    /// The observations in entry order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Where the observations came from.
    #[must_use]
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Parses a manually entered number, surrounding whitespace allowed.
///
/// # Errors
///
/// Returns [`ParseError`] if `text` is not a floating-point number.
pub fn parse_value(text: &str) -> Result<f64, ParseError> {
    text.trim().parse::<f64>().map_err(|_| ParseError {
        input: text.to_owned(),
    })
}

/// A sample that grows one typed value at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualEntry {
    sample: Sample,
}

impl Default for ManualEntry {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualEntry {
    /// Starts with no values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sample: Sample::manual(),
        }
    }

    /// Parses `text` and appends it. On error the sample is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if `text` is not a number.
    pub fn append(&mut self, text: &str) -> Result<f64, ParseError> {
        let value = parse_value(text)?;
        self.sample.values.push(value);
        Ok(value)
    }

    /// The values entered so far.
    #[must_use]
    pub fn sample(&self) -> &Sample {
        &self.sample
    }
}

/// Reads the first column of the comma-separated table at `path`.
///
/// # Errors
///
/// See [`load_reader`]; additionally [`LoadError::Io`] if the file cannot be opened.
pub fn load(path: impl AsRef<Path>) -> Result<Sample, LoadError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let sample = load_reader(file)?;
    tracing::info!(path = %path.display(), values = sample.len(), "loaded sample");
    Ok(sample)
}

/// Reads the first column of a comma-separated table. The first row is a header and is skipped.
///
/// # Errors
///
/// - [`LoadError::Csv`] if the table is malformed.
/// - [`LoadError::Empty`] if there are no data rows.
/// - [`LoadError::NonNumeric`] if any first-column cell is not a number. Nothing is loaded then.
pub fn load_reader(reader: impl Read) -> Result<Sample, LoadError> {
    let mut table = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut values = Vec::new();
    for (index, record) in table.records().enumerate() {
        let record = record?;
        let cell = record.get(0).unwrap_or_default();
        let value = cell.parse::<f64>().map_err(|_| LoadError::NonNumeric {
            row: index + 1,
            value: cell.to_owned(),
        })?;
        values.push(value);
    }
    if values.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok(Sample {
        values,
        origin: Origin::Upload,
    })
}
