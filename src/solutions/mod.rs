// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calibration-table kinds, and the code to turn their raw solutions into
//! plottable series.

mod error;
mod kind;
mod transform;
#[cfg(test)]
mod tests;

pub(crate) use error::SolutionsError;
pub(crate) use kind::{TableKind, CAL_TABLE_KINDS};
pub(crate) use transform::{transform, DerivedSeries};
#[cfg(test)]
pub(crate) use transform::unwrap_phases;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

lazy_static::lazy_static! {
    pub(crate) static ref DISPLAY_MODES: String = DisplayMode::iter().join(", ");
}

/// How complex-valued solutions are split over the two plot panels.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
pub(crate) enum DisplayMode {
    /// Amplitude on the upper panel, (unwrapped) phase on the lower.
    #[strum(serialize = "ap")]
    #[serde(rename = "ap")]
    AmplitudePhase,

    /// Real part on the upper panel, imaginary part on the lower.
    #[strum(serialize = "ri")]
    #[serde(rename = "ri")]
    RealImaginary,
}

impl Default for DisplayMode {
    fn default() -> Self {
        DisplayMode::AmplitudePhase
    }
}
