// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with interacting with CASA tables.

use std::path::PathBuf;

use marlu::rubbl_casatables;
use thiserror::Error;

use crate::solutions::TableKind;

#[derive(Error, Debug)]
pub(crate) enum CasaReadError {
    #[error("Supplied table path {0} does not exist or is not readable!")]
    BadFile(PathBuf),

    #[error("The main table of the calibration table contains no rows!")]
    MainTableEmpty,

    #[error("The antenna table contains no rows!")]
    AntennaTableEmpty,

    #[error("The calibration table has no {column} column, which is required for {kind} tables")]
    MissingColumn {
        column: &'static str,
        kind: TableKind,
    },

    #[error("Found a negative value ({value}) in the {column} column; these must be positive")]
    NegativeIndex { column: &'static str, value: i32 },

    #[error("The {array_type} cell in row {row_index} has shape {got:?}, but {expected:?} was expected")]
    BadCellShape {
        array_type: &'static str,
        row_index: u64,
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("Error when trying to interface with the table: {0}")]
    Table(#[from] rubbl_casatables::TableError),

    #[error("Error from casacore: {0}")]
    Casacore(#[from] rubbl_casatables::CasacoreError),

    #[error("Couldn't stack table cells: {0}")]
    Shape(#[from] ndarray::ShapeError),
}
