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

//! Errors reported by the data sources, the catalog and the parameter resolver.
//!
//! None of them is fatal to the process: every error describes a single interaction that the
//! user can retry with corrected input.

/// A manually entered value could not be parsed as a number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("please enter a valid number (got {input:?})")]
pub struct ParseError {
    /// The rejected text.
    pub input: String,
}

/// An uploaded table could not be turned into a sample.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("cannot read uploaded file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a well-formed delimited table.
    #[error("malformed table: {0}")]
    Csv(#[from] csv::Error),

    /// The table has no data rows.
    #[error("uploaded table has no data rows")]
    Empty,

    /// A cell of the first column is not a number.
    #[error("row {row}: first column value {value:?} is not numeric")]
    NonNumeric {
        /// One-based index of the data row (the header is not counted).
        row: usize,
        /// The offending cell.
        value: String,
    },
}

/// Parameters could not be resolved for the selected distribution.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    /// Automatic fitting was requested without any data.
    #[error("no data available for automatic fitting")]
    NoData,

    /// The fit produced a tuple that does not match the family's parameter slots.
    #[error("fit returned {got} values, expected {expected}")]
    MalformedFit {
        /// Number of shape slots plus location and scale.
        expected: usize,
        /// Number of values actually returned.
        got: usize,
    },

    /// The fit could not produce usable parameters for this sample.
    #[error("fit failed: {0}")]
    FitFailed(String),
}

/// A distribution name outside the supported set was requested.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown distribution {0:?}")]
pub struct UnknownDistribution(pub String);
