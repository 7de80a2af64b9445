// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

use super::{DisplayMode, TableKind, CAL_TABLE_KINDS};

#[derive(Error, Debug)]
pub(crate) enum SolutionsError {
    #[error("Couldn't determine the kind of calibration table '{0}'; the name must end with one of '.{}' (optionally followed by a version number)", CAL_TABLE_KINDS.replace(", ", "', '."))]
    UnrecognisedTable(String),

    #[error("Delay (K) tables have no complex values to plot; '{0}' is unavailable, only 'ap' is supported")]
    DelayNotComplex(DisplayMode),

    #[error("Correlation index {corr} was requested, but the table only has {num_corrs} correlation(s)")]
    BadCorrelation { corr: usize, num_corrs: usize },

    #[error("Delay tables must have exactly 2 correlations to plot one against the other, but this one has {0}")]
    DelayNotPaired(usize),

    #[error("A {kind} table needs its solutions from the {expected} column, but they were read from {found}")]
    WrongParamColumn {
        kind: TableKind,
        expected: &'static str,
        found: &'static str,
    },

    #[error("The {array} array has shape {got:?}, but the solutions have shape {expected:?}")]
    ShapeMismatch {
        array: &'static str,
        got: (usize, usize, usize),
        expected: (usize, usize, usize),
    },
}
