// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to read calibration tables.
//!
//! Plotting code only ever talks to a [`CalTableRead`] trait object; it asks
//! for the table's metadata once and then queries solutions one antenna (and
//! field) at a time.

mod casa;
mod error;
#[cfg(test)]
pub(crate) mod memory;

pub(crate) use casa::{read_antenna_names, CasaCalTable, CasaReadError};
pub(crate) use error::CalTableReadError;

use marlu::c32;
use ndarray::prelude::*;
use vec1::Vec1;

/// Metadata on a calibration table.
#[derive(Debug, Clone)]
pub(crate) struct CalTableContext {
    /// The unique antenna numbers (`ANTENNA1`) in the table, ascending.
    pub(crate) antennas: Vec1<usize>,

    /// The unique field IDs in the table, ascending.
    pub(crate) fields: Vec1<usize>,

    /// The total number of rows in the main table.
    pub(crate) num_rows: usize,

    /// The number of channels in each solution cell.
    pub(crate) num_chans: usize,

    /// The number of correlations in each solution cell.
    pub(crate) num_corrs: usize,

    /// The `TIME` of the first row [MJD seconds, UTC].
    pub(crate) first_time: f64,

    /// Antenna names, indexed by antenna number, if the table has an `ANTENNA`
    /// subtable.
    pub(crate) antenna_names: Option<Vec1<String>>,
}

/// Solution values as stored in the table; complex (`CPARAM`) for gains and
/// bandpasses, real (`FPARAM`) for delays. Dimensions are (row, channel,
/// correlation).
#[derive(Debug, Clone)]
pub(crate) enum SolutionValues {
    Complex(Array3<c32>),
    Real(Array3<f32>),
}

impl SolutionValues {
    pub(crate) fn dim(&self) -> (usize, usize, usize) {
        match self {
            SolutionValues::Complex(a) => a.dim(),
            SolutionValues::Real(a) => a.dim(),
        }
    }

    /// The column these values came from.
    pub(crate) fn column(&self) -> &'static str {
        match self {
            SolutionValues::Complex(_) => "CPARAM",
            SolutionValues::Real(_) => "FPARAM",
        }
    }
}

/// The result of querying a table for a single antenna and field. All arrays
/// are (row, channel, correlation); the vectors have one element per row.
#[derive(Debug, Clone)]
pub(crate) struct AntennaSolutions {
    /// The antenna number these solutions belong to.
    pub(crate) antenna: usize,

    /// `TIME` for each row [seconds].
    pub(crate) times: Vec<f64>,

    /// `ANTENNA1` for each row.
    pub(crate) antenna1: Vec<i32>,

    pub(crate) values: SolutionValues,

    /// `PARAMERR`.
    pub(crate) errors: Array3<f32>,

    /// `FLAG`. `true` means the sample is invalid.
    pub(crate) flags: Array3<bool>,
}

pub(crate) trait CalTableRead {
    /// A name for the table, used in messages and output filenames.
    fn get_table_name(&self) -> &str;

    fn get_context(&self) -> &CalTableContext;

    /// Get all of the solutions for an antenna in the specified field. An
    /// antenna with no rows for the field yields empty arrays, not an error.
    fn read_antenna(
        &self,
        antenna: usize,
        field: usize,
    ) -> Result<AntennaSolutions, CalTableReadError>;
}
