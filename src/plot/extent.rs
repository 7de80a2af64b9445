// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Global axis ranges, folded over every antenna's series.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::AxisExtentError;
use crate::constants::{X_AXIS_PADDING, Y_AXIS_PADDING_FRACTION};

/// The range of an axis. A fresh extent is "inverted" (min = +inf, max = -inf)
/// so that the first value folded in sets both bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub(crate) struct AxisExtent {
    pub(crate) min: f64,
    pub(crate) max: f64,
}

impl Default for AxisExtent {
    fn default() -> Self {
        AxisExtent {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl AxisExtent {
    /// Has nothing been folded into this extent?
    pub(crate) fn is_empty(&self) -> bool {
        self.min > self.max
    }

    fn update(&mut self, values: &[f64]) {
        for &v in values.iter().filter(|v| v.is_finite()) {
            self.min = self.min.min(v);
            self.max = self.max.max(v);
        }
    }

    fn pad_additive(self, pad: f64) -> AxisExtent {
        AxisExtent {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    /// Negative minimums are pushed further from zero, positive ones are
    /// pulled towards it. The maximum is always scaled up.
    fn pad_fractional(self, fraction: f64) -> AxisExtent {
        AxisExtent {
            min: if self.min < 0.0 {
                self.min * (1.0 + fraction)
            } else {
                self.min * (1.0 - fraction)
            },
            max: self.max * (1.0 + fraction),
        }
    }

    fn with_overrides(self, min: Option<f64>, max: Option<f64>) -> AxisExtent {
        AxisExtent {
            min: min.unwrap_or(self.min),
            max: max.unwrap_or(self.max),
        }
    }
}

/// User-specified axis bounds. Any bound given here replaces the computed one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct AxisOverrides {
    /// Start of the x axis.
    pub(crate) t0: Option<f64>,
    /// End of the x axis.
    pub(crate) t1: Option<f64>,
    /// Minimum of the upper panel's y axis.
    pub(crate) yu0: Option<f64>,
    /// Maximum of the upper panel's y axis.
    pub(crate) yu1: Option<f64>,
    /// Minimum of the lower panel's y axis.
    pub(crate) yl0: Option<f64>,
    /// Maximum of the lower panel's y axis.
    pub(crate) yl1: Option<f64>,
}

/// The final ranges handed to the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub(crate) struct PlotRanges {
    pub(crate) x: AxisExtent,
    pub(crate) upper: AxisExtent,
    pub(crate) lower: AxisExtent,
}

impl PlotRanges {
    pub(crate) fn y(&self, panel: super::Panel) -> AxisExtent {
        match panel {
            super::Panel::Upper => self.upper,
            super::Panel::Lower => self.lower,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct AxisRangeAggregator {
    x: AxisExtent,
    y1: AxisExtent,
    y2: AxisExtent,
}

impl AxisRangeAggregator {
    pub(crate) fn new() -> AxisRangeAggregator {
        AxisRangeAggregator::default()
    }

    /// Fold an antenna's series into the running extents. Empty series and
    /// non-finite values are ignored.
    pub(crate) fn fold(&mut self, x: &[f64], y1: &[f64], y2: &[f64]) {
        if x.is_empty() {
            return;
        }
        self.x.update(x);
        self.y1.update(y1);
        self.y2.update(y2);
        trace!(
            "Extents now x {:?}, y1 {:?}, y2 {:?}",
            self.x,
            self.y1,
            self.y2
        );
    }

    /// Pad the folded extents and apply any overrides. This doesn't modify the
    /// aggregator, so it can be called any number of times.
    pub(crate) fn finalize(&self, overrides: &AxisOverrides) -> Result<PlotRanges, AxisExtentError> {
        for (extent, axis) in [(self.x, "x"), (self.y1, "upper y"), (self.y2, "lower y")] {
            if extent.is_empty() {
                return Err(AxisExtentError::NoData { axis });
            }
        }

        let ranges = PlotRanges {
            x: self
                .x
                .pad_additive(X_AXIS_PADDING)
                .with_overrides(overrides.t0, overrides.t1),
            upper: self
                .y1
                .pad_fractional(Y_AXIS_PADDING_FRACTION)
                .with_overrides(overrides.yu0, overrides.yu1),
            lower: self
                .y2
                .pad_fractional(Y_AXIS_PADDING_FRACTION)
                .with_overrides(overrides.yl0, overrides.yl1),
        };
        debug!("Plot ranges: {ranges:?}");
        Ok(ranges)
    }
}
