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

//! Line-oriented front end: every command is one user interaction, and the view is recomputed
//! after each of them.
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};

use distviz::catalog::Family;
use distviz::render;
use distviz::resolve::Slot;
use distviz::session::{InputMode, Notice, Panel, Session, View};
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
commands:
  add <number>        append a value to the manual data
  input manual|upload choose the data source
  load <path.csv>     upload a table; its first column is the sample
  dist <name>         choose the distribution (see `list`)
  list                list the distributions
  manual on|off       set parameters with sliders instead of fitting
  set <slot> <value>  move a slider: loc, scale, or the shape number (1, 2)
  sliders             show the sliders of the distribution
  show                show the current view
  export <path.csv>   write the density curve
  gof [iterations]    Kolmogorov-Smirnov goodness of fit
  help                this text
  quit                leave";

fn print_view(out: &mut impl Write, session: &Session, view: &View) -> io::Result<()> {
    let mode = match view.input {
        InputMode::ManualEntry => "Data Input",
        InputMode::Upload => "Data Upload",
    };
    writeln!(out, "Selected mode: {mode}")?;
    match &view.sample {
        Some(sample) => writeln!(out, "Current data array: {}", render::echo(sample))?,
        None => writeln!(out, "Current data array: none")?,
    }
    writeln!(out, "Manual Calibration Chosen: {}", session.is_manual())?;
    for notice in &view.notices {
        match notice {
            Notice::Warning(message) => writeln!(out, "warning: {message}")?,
            Notice::Error(message) => writeln!(out, "error: {message}")?,
        }
    }
    match &view.panel {
        Panel::Plot {
            title,
            params,
            curve,
        } => writeln!(
            out,
            "{title} {params:?}: {}",
            render::summary(curve)
        ),
        Panel::ErrorDetected => writeln!(out, "Error Detected"),
    }
}

fn print_sliders(out: &mut impl Write, session: &Session) -> io::Result<()> {
    let spec = session.spec();
    let sliders = session.sliders();
    let shapes = spec
        .slots
        .shape
        .iter()
        .enumerate()
        .map(|(i, bounds)| ((i + 1).to_string(), Slot::Shape(i), bounds));
    let loc_scale = [
        ("loc".to_owned(), Slot::Loc, &spec.slots.loc),
        ("scale".to_owned(), Slot::Scale, &spec.slots.scale),
    ];
    for (name, slot, bounds) in shapes.chain(loc_scale) {
        writeln!(
            out,
            "  {name:>5}  {:<22} {:>6.2}  [{}, {}]",
            bounds.label,
            sliders.get(slot).unwrap_or(bounds.default),
            bounds.min,
            bounds.max
        )?;
    }
    Ok(())
}

fn parse_slot(text: &str) -> Option<Slot> {
    match text {
        "loc" => Some(Slot::Loc),
        "scale" => Some(Slot::Scale),
        index => index
            .parse::<usize>()
            .ok()
            .filter(|&i| i >= 1)
            .map(|i| Slot::Shape(i - 1)),
    }
}

/// Applies one command. Returns `false` when the session should end.
#[allow(clippy::too_many_lines)]
fn execute(out: &mut impl Write, session: &mut Session, line: &str) -> io::Result<bool> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(true);
    };
    let rest: Vec<&str> = words.collect();
    match (command, rest.as_slice()) {
        ("quit" | "exit", _) => return Ok(false),
        ("help", _) => {
            writeln!(out, "{HELP}")?;
            return Ok(true);
        }
        ("list", _) => {
            for family in Family::ALL {
                writeln!(out, "  {family}")?;
            }
            return Ok(true);
        }
        ("sliders", _) => {
            print_sliders(out, session)?;
            return Ok(true);
        }
        ("add", [text]) => match session.add_value(text) {
            Ok(value) => writeln!(out, "Added {value}")?,
            Err(err) => writeln!(out, "error: {err}")?,
        },
        ("input", ["manual"]) => session.set_input_mode(InputMode::ManualEntry),
        ("input", ["upload"]) => session.set_input_mode(InputMode::Upload),
        ("load", [path]) => match session.upload(path) {
            Ok(count) => writeln!(out, "Loaded {count} values")?,
            Err(err) => writeln!(out, "error: {err}")?,
        },
        ("dist", [_, ..]) => match rest.join(" ").parse::<Family>() {
            Ok(family) => session.select(family),
            Err(err) => writeln!(out, "error: {err}")?,
        },
        ("manual", ["on"]) => session.set_manual(true),
        ("manual", ["off"]) => session.set_manual(false),
        ("set", [slot, value]) => {
            let target = parse_slot(slot);
            let value = value.parse::<f64>();
            match (target, value) {
                (Some(target), Ok(value)) => match session.set_slider(target, value) {
                    Some(set) => writeln!(out, "{slot} = {set}")?,
                    None => writeln!(out, "error: {} has no slider {slot}", session.spec().name())?,
                },
                _ => writeln!(out, "error: usage: set <slot> <value>")?,
            }
        }
        ("show", _) => {}
        ("export", [path]) => {
            match session.render().panel {
                Panel::Plot { curve, .. } => {
                    let written = File::create(path)
                        .and_then(|file| render::write_curve_csv(&curve, BufWriter::new(file)));
                    match written {
                        Ok(()) => writeln!(out, "Wrote {} points to {path}", curve.len())?,
                        Err(err) => writeln!(out, "error: {err}")?,
                    }
                }
                Panel::ErrorDetected => writeln!(out, "error: nothing to export")?,
            }
            return Ok(true);
        }
        ("gof", args) => {
            if let Some(iterations) = args.first().and_then(|s| s.parse().ok()) {
                session.gof_iterations = iterations;
            }
            match session.goodness_of_fit(rand::random()) {
                Ok(gof) => match gof.pvalue {
                    Some(pvalue) => writeln!(
                        out,
                        "KS statistic {:.4}, p-value {pvalue:.3} ({} iterations)",
                        gof.statistic, session.gof_iterations
                    )?,
                    None => writeln!(out, "KS statistic {:.4}, p-value unavailable", gof.statistic)?,
                },
                Err(err) => writeln!(out, "error: {err}")?,
            }
            return Ok(true);
        }
        _ => {
            writeln!(out, "unknown command {line:?}; try `help`")?;
            return Ok(true);
        }
    }
    print_view(out, session, &session.render())?;
    Ok(true)
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut session = Session::new();
    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    writeln!(out, "Interactive Data Distribution Visualizer (type `help`)")?;
    print_view(&mut out, &session, &session.render())?;
    for line in stdin.lock().lines() {
        if !execute(&mut out, &mut session, line?.trim())? {
            break;
        }
        out.flush()?;
    }
    Ok(())
}
