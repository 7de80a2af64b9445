// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision.
 */

pub(crate) use std::f64::consts::{PI, TAU};

/// The number of antennas grouped into a single legend (and checkbox).
pub(crate) const LEGEND_BATCH_SIZE: usize = 16;

/// The amount added to both ends of the x axis [same units as the x
/// coordinate].
pub(crate) const X_AXIS_PADDING: f64 = 400.0;

/// The fraction of the y extent's magnitude used to pad the y axes.
pub(crate) const Y_AXIS_PADDING_FRACTION: f64 = 0.1;

/// The default field ID to plot.
pub(crate) const DEFAULT_FIELD: usize = 0;

/// The default correlation index to plot.
pub(crate) const DEFAULT_CORRELATION: usize = 0;

/// The width of each plot panel [pixels].
pub(crate) const PANEL_WIDTH: u32 = 700;

/// The height of each plot panel [pixels].
pub(crate) const PANEL_HEIGHT: u32 = 600;
