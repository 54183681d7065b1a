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

//! Text renderings of the sample and the density curve.
use std::fmt::Write as _;
use std::io;

use crate::density::Curve;
use crate::source::Sample;

/// The sample as a bracketed list, e.g. `[1.0, 2.5]`.
#[must_use]
pub fn echo(sample: &Sample) -> String {
    format!("{:?}", sample.values())
}

/// One line describing the curve's peak and the area under it, or why there is no peak.
#[must_use]
pub fn summary(curve: &Curve) -> String {
    let mut line = String::new();
    match curve.peak() {
        Some((x, y)) => {
            let _ = write!(
                line,
                "peak density {y:.4} at x = {x:.3}, area {:.3}",
                curve.area()
            );
        }
        None => line.push_str("no finite density on the grid"),
    }
    let undefined = curve.points.iter().filter(|(_, y)| y.is_nan()).count();
    if undefined > 0 {
        let _ = write!(line, " ({undefined} undefined points)");
    }
    line
}

/// Writes the curve as a two-column `x,density` table with a header row.
///
/// # Errors
///
/// Returns the I/O error of `writer`.
pub fn write_curve_csv(curve: &Curve, writer: impl io::Write) -> io::Result<()> {
    let mut table = csv::Writer::from_writer(writer);
    table.write_record(["x", "density"])?;
    for (x, y) in &curve.points {
        table.write_record([x.to_string(), y.to_string()])?;
    }
    table.flush()
}
