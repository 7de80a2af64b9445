// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all calplot-related errors. This should be the *only* error
//! enum that is publicly visible.

use thiserror::Error;

use super::plot::PlotArgsError;
use crate::{
    io::{
        read::{CalTableReadError, CasaReadError},
        GlobError,
    },
    params::PlotError,
    plot::{AxisExtentError, DrawError},
    solutions::SolutionsError,
};

/// The *only* publicly visible error from calplot. Each variant is a broad
/// category; the wrapped string is the message shown to the user.
#[derive(Error, Debug)]
pub enum CalplotError {
    /// Bad plotting options, or options that can't work with the table.
    #[error("{0}\n\nSee 'calplot plot --help' for the available options.")]
    Plot(String),

    /// A calibration table that couldn't be read, or whose contents aren't
    /// what's expected for its kind.
    #[error("{0}\n\nIf the table itself looks fine, 'calplot table-info' may show what's wrong with it.")]
    Table(String),

    /// An error related to argument files.
    #[error("{0}")]
    ArgFile(String),

    /// Something went wrong while writing the plots.
    #[error("{0}")]
    Draw(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

impl From<PlotArgsError> for CalplotError {
    fn from(e: PlotArgsError) -> Self {
        Self::Plot(e.to_string())
    }
}

impl From<SolutionsError> for CalplotError {
    fn from(e: SolutionsError) -> Self {
        let s = e.to_string();
        match e {
            SolutionsError::UnrecognisedTable(_)
            | SolutionsError::DelayNotComplex(_)
            | SolutionsError::BadCorrelation { .. } => Self::Plot(s),
            SolutionsError::DelayNotPaired(_)
            | SolutionsError::WrongParamColumn { .. }
            | SolutionsError::ShapeMismatch { .. } => Self::Table(s),
        }
    }
}

impl From<CalTableReadError> for CalplotError {
    fn from(e: CalTableReadError) -> Self {
        Self::Table(e.to_string())
    }
}

impl From<CasaReadError> for CalplotError {
    fn from(e: CasaReadError) -> Self {
        Self::Table(e.to_string())
    }
}

impl From<AxisExtentError> for CalplotError {
    fn from(e: AxisExtentError) -> Self {
        Self::Plot(e.to_string())
    }
}

impl From<DrawError> for CalplotError {
    fn from(e: DrawError) -> Self {
        let s = e.to_string();
        match e {
            DrawError::IO(_) => Self::Generic(s),
            DrawError::Panel { .. }
            | DrawError::Json(_)
            | DrawError::NoPlottingFeature
            | DrawError::Plotters(_) => Self::Draw(s),
        }
    }
}

impl From<PlotError> for CalplotError {
    fn from(e: PlotError) -> Self {
        // When changing the error propagation below, ensure `Self::from(e)`
        // uses the correct `e`!
        match e {
            PlotError::Solutions(e) => Self::from(e),
            PlotError::Read(e) => Self::from(e),
            PlotError::Extent(e) => Self::from(e),
            PlotError::Draw(e) => Self::from(e),
        }
    }
}

impl From<GlobError> for CalplotError {
    fn from(e: GlobError) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<std::io::Error> for CalplotError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
