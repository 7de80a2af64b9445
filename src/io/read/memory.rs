// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! An in-memory calibration table, so that plotting can be tested without
//! casacore tables on disk.

use std::collections::HashMap;

use marlu::c32;
use ndarray::prelude::*;
use vec1::Vec1;

use super::{AntennaSolutions, CalTableContext, CalTableRead, CalTableReadError, SolutionValues};

pub(crate) struct MemoryCalTable {
    name: String,
    context: CalTableContext,
    solutions: HashMap<(usize, usize), AntennaSolutions>,
}

impl MemoryCalTable {
    /// Build a table out of per-(antenna, field) solutions. All solutions must
    /// have the same cell shape.
    pub(crate) fn new(
        name: &str,
        solutions: Vec<(usize, AntennaSolutions)>,
        antenna_names: Option<Vec<String>>,
    ) -> MemoryCalTable {
        let antennas = solutions
            .iter()
            .map(|(_, s)| s.antenna)
            .collect::<std::collections::BTreeSet<_>>();
        let fields = solutions
            .iter()
            .map(|(f, _)| *f)
            .collect::<std::collections::BTreeSet<_>>();
        let (_, num_chans, num_corrs) = solutions
            .iter()
            .map(|(_, s)| s.values.dim())
            .find(|d| d.0 > 0)
            .unwrap_or((0, 1, 2));
        let num_rows = solutions.iter().map(|(_, s)| s.times.len()).sum();
        let first_time = solutions
            .iter()
            .flat_map(|(_, s)| s.times.first().copied())
            .next()
            .unwrap_or_default();

        MemoryCalTable {
            name: name.to_string(),
            context: CalTableContext {
                antennas: Vec1::try_from_vec(antennas.into_iter().collect()).unwrap(),
                fields: Vec1::try_from_vec(fields.into_iter().collect()).unwrap(),
                num_rows,
                num_chans,
                num_corrs,
                first_time,
                antenna_names: antenna_names.map(|n| Vec1::try_from_vec(n).unwrap()),
            },
            solutions: solutions
                .into_iter()
                .map(|(field, s)| ((s.antenna, field), s))
                .collect(),
        }
    }
}

impl CalTableRead for MemoryCalTable {
    fn get_table_name(&self) -> &str {
        &self.name
    }

    fn get_context(&self) -> &CalTableContext {
        &self.context
    }

    fn read_antenna(
        &self,
        antenna: usize,
        field: usize,
    ) -> Result<AntennaSolutions, CalTableReadError> {
        if !self.context.antennas.contains(&antenna) {
            return Err(CalTableReadError::UnknownAntenna { antenna });
        }
        Ok(self
            .solutions
            .get(&(antenna, field))
            .cloned()
            .unwrap_or_else(|| AntennaSolutions {
                antenna,
                times: vec![],
                antenna1: vec![],
                values: SolutionValues::Complex(Array3::default((
                    0,
                    self.context.num_chans,
                    self.context.num_corrs,
                ))),
                errors: Array3::zeros((0, self.context.num_chans, self.context.num_corrs)),
                flags: Array3::from_elem(
                    (0, self.context.num_chans, self.context.num_corrs),
                    false,
                ),
            }))
    }
}

/// Gain solutions with one row per time, a single channel and two
/// correlations. Both correlations get the same value; flags apply to both.
pub(crate) fn gain_solutions(
    antenna: usize,
    times: &[f64],
    values: &[c32],
    flags: &[bool],
) -> AntennaSolutions {
    let n = values.len();
    let values = Array3::from_shape_fn((n, 1, 2), |(i, _, _)| values[i]);
    AntennaSolutions {
        antenna,
        times: times.to_vec(),
        antenna1: vec![antenna as i32; n],
        errors: values.mapv(|v| v.norm() * 0.1),
        values: SolutionValues::Complex(values),
        flags: Array3::from_shape_fn((n, 1, 2), |(i, _, _)| flags[i]),
    }
}

/// Bandpass solutions with a single row (time), one value per channel and two
/// correlations.
pub(crate) fn bandpass_solutions(
    antenna: usize,
    values: &[c32],
    errors: &[f32],
    flags: &[bool],
) -> AntennaSolutions {
    let n = values.len();
    AntennaSolutions {
        antenna,
        times: vec![4.8e9],
        antenna1: vec![antenna as i32],
        values: SolutionValues::Complex(Array3::from_shape_fn((1, n, 2), |(_, c, _)| values[c])),
        errors: Array3::from_shape_fn((1, n, 2), |(_, c, _)| errors[c]),
        flags: Array3::from_shape_fn((1, n, 2), |(_, c, _)| flags[c]),
    }
}

/// Delay solutions with one row per time, a single channel and the two
/// correlations given as pairs.
pub(crate) fn delay_solutions(
    antenna: usize,
    delays: &[[f32; 2]],
    flags: &[[bool; 2]],
) -> AntennaSolutions {
    let n = delays.len();
    AntennaSolutions {
        antenna,
        times: (0..n).map(|i| 4.8e9 + 60.0 * i as f64).collect(),
        antenna1: vec![antenna as i32; n],
        values: SolutionValues::Real(Array3::from_shape_fn((n, 1, 2), |(i, _, c)| delays[i][c])),
        errors: Array3::from_elem((n, 1, 2), 0.5),
        flags: Array3::from_shape_fn((n, 1, 2), |(i, _, c)| flags[i][c]),
    }
}
