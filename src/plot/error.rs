// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors from assembling and drawing plots.

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub(crate) enum AxisExtentError {
    #[error("No unflagged data was found for the {axis} axis; there is nothing to plot")]
    NoData { axis: &'static str },
}

#[derive(Error, Debug)]
pub(crate) enum DrawError {
    #[error("While plotting the {panel} panel: {message}")]
    Panel {
        panel: super::Panel,
        message: String,
    },

    #[error("Couldn't serialise the plot state: {0}")]
    Json(#[from] serde_json::Error),

    #[error("This binary was not compiled with the 'plotting' feature, so static images can't be written. You will need to compile from source with this feature enabled.")]
    NoPlottingFeature,

    #[error("Error from the plotters library: {0}")]
    Plotters(Box<dyn std::error::Error>),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
