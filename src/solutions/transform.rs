// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Derive the two plotted quantities (and their errors) from one antenna's raw
//! solutions.
//!
//! Flagged samples are dropped before anything is derived, so every output
//! series is aligned index-for-index with the unflagged coordinates. Phases are
//! unwrapped over the unflagged sequence before being converted to degrees.

use marlu::{c32, c64};
use ndarray::prelude::*;

use super::{DisplayMode, SolutionsError, TableKind};
use crate::{
    constants::{PI, TAU},
    io::read::{AntennaSolutions, SolutionValues},
};

/// The plottable series for a single antenna. `y2_err` is only available for
/// some table kinds and display modes.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct DerivedSeries {
    pub(crate) x: Vec<f64>,
    pub(crate) y1: Vec<f64>,
    pub(crate) y1_err: Vec<f64>,
    pub(crate) y2: Vec<f64>,
    pub(crate) y2_err: Option<Vec<f64>>,
}

impl DerivedSeries {
    pub(crate) fn len(&self) -> usize {
        self.x.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Produce the derived series for one antenna's solutions at correlation index
/// `corr`.
pub(crate) fn transform(
    kind: TableKind,
    mode: DisplayMode,
    sols: &AntennaSolutions,
    corr: usize,
) -> Result<DerivedSeries, SolutionsError> {
    kind.check_mode(mode)?;

    let dim = sols.values.dim();
    for (array, got) in [("PARAMERR", sols.errors.dim()), ("FLAG", sols.flags.dim())] {
        if got != dim {
            return Err(SolutionsError::ShapeMismatch {
                array,
                got,
                expected: dim,
            });
        }
    }
    let (num_rows, _, num_corrs) = dim;
    if num_rows > 0 && corr >= num_corrs {
        return Err(SolutionsError::BadCorrelation { corr, num_corrs });
    }

    match (kind, &sols.values) {
        (TableKind::Gain, SolutionValues::Complex(values)) => {
            Ok(gain(mode, sols, values.view(), corr))
        }
        (TableKind::Bandpass, SolutionValues::Complex(values)) => {
            Ok(bandpass(mode, sols, values.view(), corr))
        }
        (TableKind::Delay, SolutionValues::Real(values)) => {
            if num_rows > 0 && num_corrs != 2 {
                return Err(SolutionsError::DelayNotPaired(num_corrs));
            }
            Ok(delay(sols, values.view(), corr))
        }
        (kind, values) => Err(SolutionsError::WrongParamColumn {
            kind,
            expected: kind.param_column(),
            found: values.column(),
        }),
    }
}

/// Gains: one solution per row (time), always at the first channel.
fn gain(
    mode: DisplayMode,
    sols: &AntennaSolutions,
    values: ArrayView3<c32>,
    corr: usize,
) -> DerivedSeries {
    let t0 = sols.times.first().copied().unwrap_or_default();
    let unflagged = (0..values.len_of(Axis(0)))
        .filter(|&i_row| !sols.flags[(i_row, 0, corr)])
        .collect::<Vec<_>>();

    let x = unflagged.iter().map(|&i_row| sols.times[i_row] - t0).collect();
    let (y1, y2) = split_complex(
        mode,
        unflagged
            .iter()
            .map(|&i_row| to_c64(values[(i_row, 0, corr)])),
    );
    let y1_err = unflagged
        .iter()
        .map(|&i_row| f64::from(sols.errors[(i_row, 0, corr)]).abs())
        .collect();

    DerivedSeries {
        x,
        y1,
        y1_err,
        y2,
        y2_err: None,
    }
}

/// Bandpasses: one solution per channel, taken from the first row (time).
fn bandpass(
    mode: DisplayMode,
    sols: &AntennaSolutions,
    values: ArrayView3<c32>,
    corr: usize,
) -> DerivedSeries {
    if values.len_of(Axis(0)) == 0 {
        return DerivedSeries {
            y2_err: match mode {
                DisplayMode::AmplitudePhase => Some(vec![]),
                DisplayMode::RealImaginary => None,
            },
            ..Default::default()
        };
    }

    let unflagged = (0..values.len_of(Axis(1)))
        .filter(|&i_chan| !sols.flags[(0, i_chan, corr)])
        .collect::<Vec<_>>();

    let x = unflagged.iter().map(|&i_chan| i_chan as f64).collect();
    let (y1, y2) = split_complex(
        mode,
        unflagged
            .iter()
            .map(|&i_chan| to_c64(values[(0, i_chan, corr)])),
    );
    let errors = unflagged
        .iter()
        .map(|&i_chan| f64::from(sols.errors[(0, i_chan, corr)]))
        .collect::<Vec<_>>();
    let y1_err = errors.iter().map(|e| e.abs()).collect();
    // Only amp-phase plots get a phase error series for bandpasses.
    let y2_err = match mode {
        DisplayMode::AmplitudePhase => {
            let err_phases = errors
                .iter()
                .map(|&e| c64::new(e, 0.0).arg())
                .collect::<Vec<_>>();
            Some(to_degrees(unwrap_phases(&err_phases)))
        }
        DisplayMode::RealImaginary => None,
    };

    DerivedSeries {
        x,
        y1,
        y1_err,
        y2,
        y2_err,
    }
}

/// Delays: the requested correlation on the upper panel, the other one of the
/// pair on the lower. A row is only used if both correlations are unflagged.
fn delay(sols: &AntennaSolutions, values: ArrayView3<f32>, corr: usize) -> DerivedSeries {
    // Without rows, `corr` was never checked against the pair.
    if values.len_of(Axis(0)) == 0 {
        return DerivedSeries {
            y2_err: Some(vec![]),
            ..Default::default()
        };
    }
    let other = 1 - corr;
    let unflagged = (0..values.len_of(Axis(0)))
        .filter(|&i_row| !sols.flags[(i_row, 0, corr)] && !sols.flags[(i_row, 0, other)])
        .collect::<Vec<_>>();

    let x = unflagged
        .iter()
        .map(|&i_row| f64::from(sols.antenna1[i_row]))
        .collect();
    let y1 = unflagged
        .iter()
        .map(|&i_row| f64::from(values[(i_row, 0, corr)]))
        .collect();
    let y2 = unflagged
        .iter()
        .map(|&i_row| f64::from(values[(i_row, 0, other)]))
        .collect();
    let errors: Vec<f64> = unflagged
        .iter()
        .map(|&i_row| f64::from(sols.errors[(i_row, 0, corr)]))
        .collect();

    DerivedSeries {
        x,
        y1,
        y1_err: errors.clone(),
        y2,
        y2_err: Some(errors),
    }
}

/// Split complex values into (amplitude, unwrapped phase in degrees) or (real,
/// imag), depending on the display mode.
fn split_complex<I>(mode: DisplayMode, values: I) -> (Vec<f64>, Vec<f64>)
where
    I: Iterator<Item = c64>,
{
    match mode {
        DisplayMode::AmplitudePhase => {
            let (amps, phases): (Vec<f64>, Vec<f64>) = values.map(|v| (v.norm(), v.arg())).unzip();
            (amps, to_degrees(unwrap_phases(&phases)))
        }
        DisplayMode::RealImaginary => values.map(|v| (v.re, v.im)).unzip(),
    }
}

/// Remove jumps of more than pi between adjacent phases [radians] by adding
/// multiples of 2pi, so the sequence varies continuously.
pub(crate) fn unwrap_phases(phases: &[f64]) -> Vec<f64> {
    let mut unwrapped = Vec::with_capacity(phases.len());
    let mut correction = 0.0;
    for (i, &phase) in phases.iter().enumerate() {
        if i > 0 {
            let diff = phase - phases[i - 1];
            if diff.abs() >= PI {
                let mut wrapped = (diff + PI).rem_euclid(TAU) - PI;
                // Keep the sign of the original jump when it's exactly pi.
                if wrapped == -PI && diff > 0.0 {
                    wrapped = PI;
                }
                correction += wrapped - diff;
            }
        }
        unwrapped.push(phase + correction);
    }
    unwrapped
}

fn to_degrees(radians: Vec<f64>) -> Vec<f64> {
    radians.into_iter().map(f64::to_degrees).collect()
}

#[inline]
fn to_c64(c: c32) -> c64 {
    c64::new(f64::from(c.re), f64::from(c.im))
}
